/*!
 * Chunk segmentation engine.
 *
 * Turns a parsed markup tree into an ordered sequence of typed chunks ready
 * for translation:
 *
 * - `classify`: element behavior classes and options
 * - `sanitize`: inline subtree cleanup and text normalization
 * - `list`: ordered/unordered list rendering to linear text
 * - `split`: the main traversal emitting chunks
 */

pub use self::classify::{classify, is_block_element, is_newline_element, Category, ChunkOptions};
pub use self::list::{render_list, render_list_with};
pub use self::sanitize::{clean_text, sanitize};
pub use self::split::{split_document, split_markup, Chunk, ChunkKind};

pub mod classify;
pub mod list;
pub mod sanitize;
pub mod split;
