/*!
 * Translation services for ebook documents using AI providers.
 *
 * This module contains the functionality for translating document chunks
 * through an AI provider. It is split into several submodules:
 *
 * - `core`: Core translation service, prompts, and token accounting
 * - `documents`: Per-format document drivers and chunk recombination
 * - `concurrency`: Bounded admission for concurrent document processing
 */

// Re-export main types for easier usage
pub use self::concurrency::ConcurrencyGate;
pub use self::core::{PromptKind, TokenUsageStats, Translate, TranslationOutcome, TranslationService};
pub use self::documents::{DocumentTranslator, TranslatedDocument};

// Submodules
pub mod concurrency;
pub mod core;
pub mod documents;
