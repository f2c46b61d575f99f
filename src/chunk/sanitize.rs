use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunk::classify::{is_block_element, is_newline_element, classify, Category, ChunkOptions};
use crate::markup::{ElementNode, MarkupNode};

// @module: Inline element sanitization and text normalization

// @const: Runs of carriage returns / line feeds
static LINE_BREAK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

// @const: Runs of space characters
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

/// Normalize text before it enters a buffer or a sanitized copy.
///
/// Trims, deletes every CR/LF run, then collapses space runs to a single
/// space. Source line-wrapping must not leak into translation input or skew
/// the chunk-size accounting. Idempotent.
pub fn clean_text(input: &str) -> String {
    let trimmed = input.trim();
    let no_breaks = LINE_BREAK_RUNS.replace_all(trimmed, "");
    SPACE_RUNS.replace_all(&no_breaks, " ").into_owned()
}

/// Produce a cleaned copy of an inline element subtree.
///
/// Text is normalized, removable subtrees are excised, and any descendant that
/// is not a block, newline, or inline-allowed element is replaced by its own
/// (sanitized) children. That flattens disallowed wrappers while keeping their
/// textual content and any allowed descendants further down. The input is
/// never mutated.
pub fn sanitize(el: &ElementNode, opts: &ChunkOptions) -> ElementNode {
    ElementNode {
        name: el.name.clone(),
        attrs: el.attrs.clone(),
        children: sanitize_children(&el.children, opts),
    }
}

fn sanitize_children(children: &[MarkupNode], opts: &ChunkOptions) -> Vec<MarkupNode> {
    let mut out = Vec::with_capacity(children.len());

    for child in children {
        match child {
            MarkupNode::Text(data) => out.push(MarkupNode::Text(clean_text(data))),
            MarkupNode::Element(el) => {
                if classify(&el.name, opts) == Category::Removable {
                    continue;
                }

                let keep = is_block_element(&el.name)
                    || is_newline_element(&el.name)
                    || classify(&el.name, opts) == Category::InlineAllowed;

                if keep {
                    out.push(MarkupNode::Element(sanitize(el, opts)));
                } else {
                    // Promote the wrapper's children into its position
                    out.extend(sanitize_children(&el.children, opts));
                }
            }
        }
    }

    out
}
