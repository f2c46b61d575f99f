/*!
 * Core translation service implementation.
 *
 * The `Translate` trait is the seam between the document drivers and the
 * provider client; the service implementation adds prompt selection, the
 * retry policy, and token accounting on top of the raw provider.
 */

use std::time::{Duration, Instant};

use async_trait::async_trait;
use anyhow::Result;
use log::warn;

use crate::app_config::{PromptsConfig, ProviderConfig};
use crate::chunk::ChunkKind;
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

/// Which system prompt a translation request is sent with.
///
/// Bypass chunks never reach the service, so they have no prompt kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Multi-paragraph plain text
    Text,
    /// Multi-paragraph text with inline markup
    Html,
    /// Opaque markup block (tables, navigation)
    Passthrough,
    /// A single plain-text sentence
    Sentence,
    /// A single sentence with inline markup
    SentenceHtml,
}

impl PromptKind {
    /// The prompt kind a chunk starts out with, before any sentence downgrade
    pub fn for_chunk(kind: ChunkKind) -> Option<PromptKind> {
        match kind {
            ChunkKind::Text => Some(PromptKind::Text),
            ChunkKind::HtmlInline => Some(PromptKind::Html),
            ChunkKind::Sentence => Some(PromptKind::Sentence),
            ChunkKind::SentenceHtml => Some(PromptKind::SentenceHtml),
            ChunkKind::Passthrough => Some(PromptKind::Passthrough),
            ChunkKind::Bypass => None,
        }
    }
}

/// Result of one translation request
#[derive(Debug, Clone, Default)]
pub struct TranslationOutcome {
    /// The translated text
    pub translated: String,
    /// Number of prompt tokens consumed
    pub prompt_tokens: u64,
    /// Number of completion tokens consumed
    pub completion_tokens: u64,
    /// Total tokens consumed
    pub total_tokens: u64,
}

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Start time of token tracking
    pub start_time: Instant,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
        }
    }

    /// Record the usage of one completed request
    pub fn add_outcome(&mut self, outcome: &TranslationOutcome) {
        self.prompt_tokens += outcome.prompt_tokens;
        self.completion_tokens += outcome.completion_tokens;
        self.total_tokens += outcome.total_tokens;
    }

    /// Fold another stats instance into this one
    pub fn absorb(&mut self, other: &TokenUsageStats) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        let minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.total_tokens as f64 / minutes
        } else {
            0.0
        }
    }

    /// One-line usage summary: input / output / total
    pub fn summary(&self) -> String {
        format!(
            "{} input / {} output / {} total",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

/// Interface the document drivers translate through.
///
/// Implementations must not surface transient failures: the batch driver
/// blocks on retry until a request eventually succeeds.
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate one input with the given prompt kind
    async fn translate(&self, input: &str, kind: PromptKind) -> Result<TranslationOutcome>;
}

/// Main translation service backed by an OpenAI-compatible provider
pub struct TranslationService {
    /// Provider client
    client: OpenAI,

    /// Provider settings (model, sampling, retry backoff)
    provider: ProviderConfig,

    /// Prompt templates by kind
    prompts: PromptsConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(provider: ProviderConfig, prompts: PromptsConfig) -> Self {
        let client = OpenAI::new(
            provider.api_key.clone(),
            provider.endpoint.clone(),
            provider.timeout_secs,
        );
        Self {
            client,
            provider,
            prompts,
        }
    }

    /// Resolve the system prompt for a prompt kind
    pub fn prompt_for(&self, kind: PromptKind) -> &str {
        match kind {
            PromptKind::Text => &self.prompts.text,
            PromptKind::Html => &self.prompts.html,
            PromptKind::Passthrough => &self.prompts.passthrough,
            PromptKind::Sentence => &self.prompts.sentence,
            PromptKind::SentenceHtml => &self.prompts.sentence_html,
        }
    }

    /// Verify the provider is reachable and the credentials work
    pub async fn test_connection(&self) -> Result<()> {
        self.client.test_connection(&self.provider.model).await?;
        Ok(())
    }
}

#[async_trait]
impl Translate for TranslationService {
    /// Translate one input, retrying forever on transient failure.
    ///
    /// The Nth retry waits N x the configured backoff before resubmitting the
    /// identical request. The retry counter is local to this call.
    async fn translate(&self, input: &str, kind: PromptKind) -> Result<TranslationOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(TranslationOutcome::default());
        }

        let mut retry_count: u64 = 0;

        loop {
            let request = OpenAIRequest::new(self.provider.model.clone())
                .add_message("system", self.prompt_for(kind))
                .add_message("user", input)
                .temperature(self.provider.temperature)
                .top_p(self.provider.top_p)
                .frequency_penalty(0.0)
                .presence_penalty(0.0);

            match self.client.complete(request).await {
                Ok(response) => {
                    let translated = OpenAI::extract_text(&response);
                    let usage = response.usage.unwrap_or_default();
                    return Ok(TranslationOutcome {
                        translated,
                        prompt_tokens: usage.prompt_tokens,
                        completion_tokens: usage.completion_tokens,
                        total_tokens: usage.total_tokens,
                    });
                }
                Err(e) => {
                    retry_count += 1;
                    let wait_secs = retry_count * self.provider.retry_backoff_secs;
                    warn!(
                        "Translation request failed ({}), retrying in {}s",
                        e, wait_secs
                    );
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                }
            }
        }
    }
}
