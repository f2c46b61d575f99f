use std::collections::VecDeque;

use anyhow::Result;

use crate::chunk::classify::{classify, is_block_element, is_newline_element, Category, ChunkOptions};
use crate::chunk::list::render_list_with;
use crate::chunk::sanitize::{clean_text, sanitize};
use crate::markup::{self, MarkupNode};

// @module: Chunk splitting - the main body traversal

/// How a chunk should be translated and reassembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// Plain running text, possibly spanning several paragraphs
    Text,
    /// Running text carrying inline markup
    HtmlInline,
    /// A single line of plain text (sentence-level prompt)
    Sentence,
    /// A single line carrying inline markup (sentence-level prompt)
    SentenceHtml,
    /// Markup copied verbatim, never translated
    Bypass,
    /// Markup translated as one opaque block, no line-level recombination
    Passthrough,
}

/// One unit of content headed for the translation service.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub data: String,
}

impl Chunk {
    pub fn new(kind: ChunkKind, data: impl Into<String>) -> Self {
        Chunk {
            kind,
            data: data.into(),
        }
    }

    fn empty_text() -> Self {
        Chunk::new(ChunkKind::Text, String::new())
    }
}

/// Fallback title when the document has no `<title>` element
const DEFAULT_TITLE: &str = "Title";

/// Split a parsed document into an ordered chunk sequence.
///
/// The first chunk is always a `Sentence` carrying the document title. The
/// traversal consumes the body's children through a front-removable work list:
/// unrecognized (opaque) elements are replaced by their children at the front
/// of the list, preserving pre-order document order without recursion.
/// `Bypass` and `Passthrough` chunks always come out as singletons; empty
/// buffers are silently dropped.
pub fn split_document(nodes: Vec<MarkupNode>, opts: &ChunkOptions) -> Result<Vec<Chunk>> {
    let title = nodes
        .iter()
        .find_map(|n| n.find_element("title"))
        .map(|el| markup::serialize_all(&el.children))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let has_body = nodes.iter().any(|n| n.find_element("body").is_some());
    let body_children = if has_body {
        take_body_children(nodes).unwrap_or_default()
    } else {
        nodes
    };

    let mut queue: VecDeque<MarkupNode> = body_children.into();
    let mut result = vec![Chunk::new(ChunkKind::Sentence, title)];
    let mut buffer = Chunk::empty_text();

    while let Some(node) = queue.pop_front() {
        match node {
            MarkupNode::Text(data) => buffer.data.push_str(&clean_text(&data)),
            MarkupNode::Element(el) => {
                if is_block_element(&el.name) {
                    flush(&mut buffer, &mut result);
                }

                if is_newline_element(&el.name) {
                    buffer.data.push('\n');
                }

                match classify(&el.name, opts) {
                    Category::Removable => continue,
                    Category::List => {
                        flush(&mut buffer, &mut result);
                        buffer = Chunk::new(ChunkKind::HtmlInline, render_list_with(&el, "", opts)?);
                        flush(&mut buffer, &mut result);
                    }
                    Category::Passthrough => {
                        flush(&mut buffer, &mut result);
                        buffer = Chunk::new(
                            ChunkKind::Passthrough,
                            markup::serialize(&MarkupNode::Element(el)),
                        );
                        flush(&mut buffer, &mut result);
                    }
                    Category::InlineAllowed => {
                        buffer.kind = ChunkKind::HtmlInline;
                        let cleaned = sanitize(&el, opts);
                        buffer
                            .data
                            .push_str(&markup::serialize(&MarkupNode::Element(cleaned)));
                    }
                    Category::Bypass => {
                        flush(&mut buffer, &mut result);
                        buffer = Chunk::new(
                            ChunkKind::Bypass,
                            markup::serialize(&MarkupNode::Element(el)),
                        );
                        flush(&mut buffer, &mut result);
                    }
                    Category::Opaque => {
                        // The element itself produces no output; its children
                        // go to the front of the work list in document order
                        for child in el.children.into_iter().rev() {
                            queue.push_front(child);
                        }
                    }
                }
            }
        }
    }

    flush(&mut buffer, &mut result);

    Ok(result)
}

/// Parse and split in one step
pub fn split_markup(input: &str, opts: &ChunkOptions) -> Result<Vec<Chunk>> {
    let nodes = markup::parse(input)?;
    split_document(nodes, opts)
}

/// Trim the buffer; push it if non-empty, discard silently otherwise. Either
/// way the buffer resets to an empty `Text` chunk.
fn flush(buffer: &mut Chunk, result: &mut Vec<Chunk>) {
    let trimmed = buffer.data.trim().to_string();
    if !trimmed.is_empty() {
        let mut chunk = std::mem::replace(buffer, Chunk::empty_text());
        chunk.data = trimmed;
        result.push(chunk);
    } else {
        *buffer = Chunk::empty_text();
    }
}

/// Pull the children out of the first `<body>` element, consuming the tree
fn take_body_children(nodes: Vec<MarkupNode>) -> Option<Vec<MarkupNode>> {
    for node in nodes {
        if let MarkupNode::Element(el) = node {
            if el.name == "body" {
                return Some(el.children);
            }
            if let Some(found) = take_body_children(el.children) {
                return Some(found);
            }
        }
    }
    None
}
