/// Supplement advisor chat session.
///
/// One `Advisor` serves one user session. Each accepted question produces exactly one
/// reply, whether it comes from the model, the offline rules, or a rate-limit notice.
/// A second question submitted while one is outstanding is rejected with
/// [`AdvisorError::Busy`].
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chat_log::{ChatEntry, ChatLog};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::fallback::fallback_answer;
use crate::openai::{ChatCompletionRequest, Message, OpenAiClient, OpenAiClientError};
use crate::prompt::{build_system_prompt, AdvisorContext};

pub const NOT_CONFIGURED_PREFIX: &str = "API key not configured. Please add your OpenAI API key \
to use the AI copilot. In the meantime, here are some general recommendations:\n\n";
pub const NOT_CONFIGURED_NOTICE: &str =
    "Please set your OpenAI API key in the OPENAI_API_KEY environment variable";
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit reached. Please try again in a moment.";
pub const OFFLINE_NOTICE: &str = "Unable to connect to AI service. Using offline mode.";

/// Something that can turn a chat completion request into reply text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, AdvisorError>;
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, AdvisorError> {
        let response = self.chat_completions(&request).await?;
        if let Some(total) = response.usage.as_ref().and_then(|u| u.total_tokens) {
            info!(model = %request.model, total_tokens = total, "chat completion received");
        }
        response
            .first_content()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or(AdvisorError::EmptyCompletion)
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Fallback,
    RateLimited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AdvisorReply {
    pub text: String,
    /// Short warning to show next to the reply when the model could not answer.
    pub notice: Option<String>,
    pub source: ReplySource,
}

pub struct Advisor {
    config: AdvisorConfig,
    backend: Option<Arc<dyn ChatBackend>>,
    log: Mutex<ChatLog>,
    pending: AtomicBool,
}

impl Advisor {
    /// Build an advisor from configuration. Without a credential no HTTP client is
    /// created and every answer comes from the offline rules.
    pub fn new(config: AdvisorConfig) -> Result<Self, OpenAiClientError> {
        let backend = match &config.client {
            Some(client_config) => {
                let client = OpenAiClient::new(client_config.clone())?;
                Some(Arc::new(client) as Arc<dyn ChatBackend>)
            }
            None => None,
        };
        Ok(Self::with_backend(config, backend))
    }

    pub fn with_backend(config: AdvisorConfig, backend: Option<Arc<dyn ChatBackend>>) -> Self {
        Self {
            config,
            backend,
            log: Mutex::new(ChatLog::new()),
            pending: AtomicBool::new(false),
        }
    }

    pub fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub async fn history(&self) -> Vec<ChatEntry> {
        self.log.lock().await.entries().to_vec()
    }

    /// Answer `question` in the light of `ctx`.
    ///
    /// Transport failures, rate limiting and a missing credential all yield `Ok` with a
    /// notice; only an empty question or a concurrent submission is an `Err`.
    pub async fn ask(
        &self,
        question: &str,
        ctx: &AdvisorContext,
    ) -> Result<AdvisorReply, AdvisorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AdvisorError::EmptyQuestion);
        }
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AdvisorError::Busy);
        }
        let _pending = PendingGuard(&self.pending);

        let history = self.log.lock().await.replay();

        let reply = self.answer(question, ctx, history).await;
        info!(
            source = ?reply.source,
            chars = reply.text.len(),
            "advisor replied"
        );

        // Both turns land together; a dropped request logs nothing.
        let mut log = self.log.lock().await;
        log.push_user(question);
        log.push_assistant(reply.text.clone());
        Ok(reply)
    }

    async fn answer(
        &self,
        question: &str,
        ctx: &AdvisorContext,
        history: Vec<Message>,
    ) -> AdvisorReply {
        let Some(backend) = &self.backend else {
            return not_configured(question, ctx);
        };

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(build_system_prompt(ctx)));
        messages.extend(history);
        messages.push(Message::user(question));

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            presence_penalty: Some(self.config.presence_penalty),
            frequency_penalty: Some(self.config.frequency_penalty),
        };

        match backend.complete(request).await {
            Ok(text) => AdvisorReply {
                text,
                notice: None,
                source: ReplySource::Model,
            },
            Err(AdvisorError::RateLimited(detail)) => {
                warn!(detail = %detail, "chat API rate limited");
                AdvisorReply {
                    text: RATE_LIMITED_MESSAGE.to_string(),
                    notice: Some(RATE_LIMITED_MESSAGE.to_string()),
                    source: ReplySource::RateLimited,
                }
            }
            Err(AdvisorError::ConfigurationIncomplete) => {
                warn!("chat API rejected the configured credential");
                not_configured(question, ctx)
            }
            Err(e) => {
                warn!(error = %e, "chat API request failed, answering offline");
                AdvisorReply {
                    text: fallback_answer(question, ctx.experience),
                    notice: Some(OFFLINE_NOTICE.to_string()),
                    source: ReplySource::Fallback,
                }
            }
        }
    }
}

fn not_configured(question: &str, ctx: &AdvisorContext) -> AdvisorReply {
    AdvisorReply {
        text: format!(
            "{NOT_CONFIGURED_PREFIX}{}",
            fallback_answer(question, ctx.experience)
        ),
        notice: Some(NOT_CONFIGURED_NOTICE.to_string()),
        source: ReplySource::Fallback,
    }
}

struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
