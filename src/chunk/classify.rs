// @module: Element classification for the chunk splitter

/// Options that influence classification and sanitization.
///
/// Classification is a pure function of the element name and these flags, so a
/// flag change between runs is always picked up. Ruby annotations are the
/// pronunciation guides used in East Asian typesetting; stripping them usually
/// improves translation input.
#[derive(Debug, Clone, Copy)]
pub struct ChunkOptions {
    /// Strip ruby annotation text (`rt`) instead of passing it through inline
    pub remove_ruby: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        ChunkOptions { remove_ruby: true }
    }
}

/// Behavior class of an element, decided by name alone.
///
/// The classes are disjoint; `classify` checks them in declaration order and
/// the first match wins. Block and newline elements are separate pre-action
/// predicates (`is_block_element`, `is_newline_element`) because they overlap
/// with these classes: a heading both flushes the buffer and serializes inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Dropped entirely with its subtree, never traversed or serialized
    Removable,
    /// Ordered/unordered list, rendered to linear text by the list renderer
    List,
    /// Serialized verbatim and translated as one opaque block
    Passthrough,
    /// Sanitized and appended inline to the running buffer
    InlineAllowed,
    /// Serialized verbatim and never translated
    Bypass,
    /// Not serialized itself; children are traversed in its place
    Opaque,
}

/// Elements that force the current buffer to flush before processing
pub fn is_block_element(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p")
}

/// Elements that append a literal newline to the active buffer
pub fn is_newline_element(name: &str) -> bool {
    name == "br"
}

/// Inline elements allowed in translation input.
///
/// Should not include elements likely to wrap non-styling markup.
fn is_allowed_element(name: &str, opts: &ChunkOptions) -> bool {
    let allowed = matches!(
        name,
        "a" | "b"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "hr"
            | "s"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "u"
            | "var"
    );
    if allowed {
        return true;
    }
    !opts.remove_ruby && matches!(name, "ruby" | "rt")
}

/// Elements removed entirely, including their children
fn is_removed_element(name: &str, opts: &ChunkOptions) -> bool {
    match name {
        "script" | "style" => true,
        "rt" => opts.remove_ruby,
        _ => false,
    }
}

/// Classify an element by name under the given options
pub fn classify(name: &str, opts: &ChunkOptions) -> Category {
    if is_removed_element(name, opts) {
        Category::Removable
    } else if matches!(name, "ol" | "ul") {
        Category::List
    } else if matches!(name, "nav" | "table") {
        Category::Passthrough
    } else if is_allowed_element(name, opts) {
        Category::InlineAllowed
    } else if matches!(
        name,
        "audio" | "canvas" | "code" | "iframe" | "img" | "picture" | "svg" | "video"
    ) {
        Category::Bypass
    } else {
        Category::Opaque
    }
}
