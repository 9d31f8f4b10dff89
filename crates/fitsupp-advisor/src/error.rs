/// Advisor failures.
///
/// Only `EmptyQuestion` and `Busy` are returned to callers of
/// [`crate::advisor::Advisor::ask`]. The others are produced while talking to the chat
/// endpoint and are turned into a textual reply plus a notice.
use reqwest::StatusCode;

use crate::openai::OpenAiClientError;

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("chat API credential is not configured")]
    ConfigurationIncomplete,

    #[error("rate limited by chat API: {0}")]
    RateLimited(String),

    #[error(transparent)]
    Transport(OpenAiClientError),

    #[error("chat API returned no completion text")]
    EmptyCompletion,

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("a question is already being answered")]
    Busy,
}

impl From<OpenAiClientError> for AdvisorError {
    fn from(err: OpenAiClientError) -> Self {
        let message = match &err {
            OpenAiClientError::Upstream { message, .. } => message.to_ascii_lowercase(),
            OpenAiClientError::UpstreamBody { body, .. } => body.to_ascii_lowercase(),
            _ => String::new(),
        };
        match err.status() {
            Some(StatusCode::TOO_MANY_REQUESTS) => return AdvisorError::RateLimited(err.to_string()),
            Some(StatusCode::UNAUTHORIZED) => return AdvisorError::ConfigurationIncomplete,
            _ => {}
        }
        if message.contains("rate limit") {
            AdvisorError::RateLimited(err.to_string())
        } else if message.contains("api key") {
            AdvisorError::ConfigurationIncomplete
        } else {
            AdvisorError::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_upstream_failures() {
        let limited = AdvisorError::from(OpenAiClientError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "slow down".to_string(),
        });
        assert!(matches!(limited, AdvisorError::RateLimited(_)));

        let limited_by_message = AdvisorError::from(OpenAiClientError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "Rate limit exceeded for organization".to_string(),
        });
        assert!(matches!(limited_by_message, AdvisorError::RateLimited(_)));

        let unauthorized = AdvisorError::from(OpenAiClientError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            message: "Incorrect API key provided".to_string(),
        });
        assert!(matches!(unauthorized, AdvisorError::ConfigurationIncomplete));

        let outage = AdvisorError::from(OpenAiClientError::UpstreamBody {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>bad gateway</html>".to_string(),
        });
        assert!(matches!(outage, AdvisorError::Transport(_)));
    }
}
