use crate::openai::OpenAiClientConfig;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Advisor configuration, built once at startup and handed to [`crate::advisor::Advisor`].
///
/// `client` is `None` when no API key is configured; the advisor then answers from
/// its offline rules only.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub client: Option<OpenAiClientConfig>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::offline()
    }
}

impl AdvisorConfig {
    /// Configuration with no credential.
    pub fn offline() -> Self {
        Self {
            client: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `OPENAI_API_KEY`: chat credential (omit or leave blank for offline mode)
    /// - `OPENAI_MODEL`: model id (default: "gpt-3.5-turbo")
    /// - transport overrides read by [`OpenAiClientConfig::from_env`]
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let model = std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            client: api_key.map(OpenAiClientConfig::from_env),
            model,
            ..Self::offline()
        }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_defaults() {
        let config = AdvisorConfig::offline();
        assert!(!config.is_online());
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 500);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn debug_never_prints_the_credential() {
        let config = AdvisorConfig {
            client: Some(OpenAiClientConfig::from_env("sk-test-do-not-print".to_string())),
            ..AdvisorConfig::offline()
        };
        assert!(config.is_online());
        assert!(!format!("{config:?}").contains("sk-test-do-not-print"));
    }
}
