/*!
 * Provider implementations for translation services.
 *
 * Currently a single client: any OpenAI-compatible chat completions server
 * (the public OpenAI API, Azure deployments, or local compatible servers).
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for LLM providers
///
/// This trait defines the interface a provider implementation must follow,
/// allowing providers to be swapped out under the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider with the configured model
    async fn test_connection(&self, model: &str) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod openai;
