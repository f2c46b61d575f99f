use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Translation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Document processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Prompt templates, one per content kind
    #[serde(default)]
    pub prompts: PromptsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the OpenAI-compatible chat completions provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Service URL (set for Azure or self-hosted compatible servers)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Base backoff in seconds; the Nth retry waits N times this
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Nucleus sampling mass
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_backoff_secs: default_retry_backoff_secs(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

/// Settings that steer chunking and reassembly
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Directory scanned for input documents
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Directory receiving translated output
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// How many files are worked on at the same time.
    /// Mainly to avoid hammering the API.
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Character budget for one translation request
    #[serde(default = "default_input_limit")]
    pub input_limit: usize,

    /// Emit the original line before each translated line
    #[serde(default)]
    pub side_by_side: bool,

    /// Strip ruby annotations (`rt`) from translation input
    #[serde(default = "default_true")]
    pub remove_ruby_annotations: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            concurrent_files: default_concurrent_files(),
            input_limit: default_input_limit(),
            side_by_side: false,
            remove_ruby_annotations: true,
        }
    }
}

/// System prompt per content kind.
///
/// The defaults target Japanese light novels; override them in the config
/// file for other material or language pairs.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PromptsConfig {
    #[serde(default = "default_text_prompt")]
    pub text: String,

    #[serde(default = "default_html_prompt")]
    pub html: String,

    #[serde(default = "default_html_prompt")]
    pub passthrough: String,

    #[serde(default = "default_sentence_prompt")]
    pub sentence: String,

    #[serde(default = "default_sentence_html_prompt")]
    pub sentence_html: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            text: default_text_prompt(),
            html: default_html_prompt(),
            passthrough: default_html_prompt(),
            sentence: default_sentence_prompt(),
            sentence_html: default_sentence_html_prompt(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_backoff_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.8
}

fn default_input_dir() -> String {
    "./input".to_string()
}

fn default_output_dir() -> String {
    "./output".to_string()
}

fn default_concurrent_files() -> usize {
    16
}

fn default_input_limit() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

fn default_text_prompt() -> String {
    "Translate the provided passage from a Japanese light novel into English. \
     Maintain the original literary style."
        .to_string()
}

fn default_html_prompt() -> String {
    "Translate the provided passage from a Japanese light novel into English. \
     Maintain the original literary style and keep HTML tags intact."
        .to_string()
}

fn default_sentence_prompt() -> String {
    "Translate the provided sentence from a Japanese light novel into English. \
     Maintain the original literary style."
        .to_string()
}

fn default_sentence_html_prompt() -> String {
    "Translate the provided sentence from a Japanese light novel into English. \
     Maintain the original literary style and keep HTML tags intact."
        .to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read the config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse the config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write this configuration to a JSON file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write the config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values.
    /// Configuration errors are fatal for the whole run.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.provider.api_key.is_empty() {
            return Err(AppError::Config("Provider API key is required".to_string()));
        }

        if self.provider.model.is_empty() {
            return Err(AppError::Config("Provider model name is required".to_string()));
        }

        if self.processing.input_limit == 0 {
            return Err(AppError::Config(
                "Prompt character limit must be greater than zero".to_string(),
            ));
        }

        if self.processing.concurrent_files == 0 {
            return Err(AppError::Config(
                "Concurrent file limit must be greater than zero".to_string(),
            ));
        }

        for (name, prompt) in [
            ("text", &self.prompts.text),
            ("html", &self.prompts.html),
            ("passthrough", &self.prompts.passthrough),
            ("sentence", &self.prompts.sentence),
            ("sentence_html", &self.prompts.sentence_html),
        ] {
            if prompt.trim().is_empty() {
                return Err(AppError::Config(format!("Prompt '{}' must not be empty", name)));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderConfig::default(),
            processing: ProcessingConfig::default(),
            prompts: PromptsConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
