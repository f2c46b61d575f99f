/*!
 * # YAET - Yet Another Ebook Translator
 *
 * A Rust library for automatic translation of ebook content using AI.
 *
 * ## Features
 *
 * - Translate unpacked EPUB content: XHTML chapters, OPF and NCX metadata
 * - Translate plain text files
 * - OpenAI-compatible chat completions provider
 * - Chunk documents to fit a configurable request budget
 * - Optional side-by-side output with the original lines preserved
 * - Batch processing with bounded concurrency
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `markup`: Lenient markup parsing and serialization
 * - `chunk`: Document chunking:
 *   - `chunk::classify`: Element categorization
 *   - `chunk::sanitize`: Inline content cleanup
 *   - `chunk::list`: List flattening into numbered/bulleted text
 *   - `chunk::split`: Document traversal into translation chunks
 * - `translation`: AI-powered translation services:
 *   - `translation::core`: Core translation service and prompts
 *   - `translation::documents`: Per-format document drivers
 *   - `translation::concurrency`: Bounded concurrent admission
 * - `providers`: AI provider clients
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 *
 * ## Example
 *
 * ```no_run
 * use yaet::app_config::Config;
 * use yaet::app_controller::Controller;
 *
 * #[tokio::main]
 * async fn main() -> anyhow::Result<()> {
 *     let config = Config::from_file("conf.json")?;
 *     let controller = Controller::with_config(config)?;
 *     controller.run().await
 * }
 * ```
 */

pub mod app_config;
pub mod app_controller;
pub mod chunk;
pub mod errors;
pub mod file_utils;
pub mod markup;
pub mod providers;
pub mod translation;

// Re-export commonly used types
pub use app_config::Config;
pub use app_controller::Controller;
pub use chunk::{Chunk, ChunkKind, ChunkOptions};
pub use errors::{AppError, MarkupError, ProviderError};
pub use translation::{DocumentTranslator, TranslationService};
