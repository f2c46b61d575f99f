use std::collections::VecDeque;

use crate::chunk::classify::{classify, is_block_element, is_newline_element, Category, ChunkOptions};
use crate::chunk::sanitize::{clean_text, sanitize};
use crate::errors::MarkupError;
use crate::markup::{ElementNode, MarkupNode};

// @module: List rendering to translator-friendly linear text

/// Indent step for nested lists. Non-breaking-space entities survive
/// whitespace-collapsing renderers, where plain spaces would not.
const INDENT_STEP: &str = "&#160;&#160;&#160;&#160;";

/// Flatten an `ol`/`ul` tree into an indented plain-text block.
///
/// Each direct `li` starts a new line with the current indent prefix and
/// either a `N. ` counter (ordered, starting at the list's `start` attribute)
/// or a `- ` bullet. Nested lists recurse with the prefix extended by one
/// indent step. Reversed ordered lists are not supported.
///
/// Invoking this on any other element is a programmer error and fails the
/// document.
pub fn render_list(list: &ElementNode, prefix: &str) -> Result<String, MarkupError> {
    render_list_with(list, prefix, &ChunkOptions::default())
}

/// `render_list` with explicit options (ruby handling affects which inline
/// descendants survive).
pub fn render_list_with(
    list: &ElementNode,
    prefix: &str,
    opts: &ChunkOptions,
) -> Result<String, MarkupError> {
    if !matches!(list.name.as_str(), "ol" | "ul") {
        return Err(MarkupError::UnsupportedListElement(list.name.clone()));
    }

    let is_ordered = list.name == "ol";
    let mut count: i64 = if is_ordered {
        list.attr("start")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1)
    } else {
        1
    };

    let mut queue: VecDeque<&MarkupNode> = list.children.iter().collect();
    let mut result = String::new();

    while let Some(node) = queue.pop_front() {
        match node {
            MarkupNode::Text(data) => result.push_str(&clean_text(data)),
            MarkupNode::Element(el) => {
                if classify(&el.name, opts) == Category::Removable {
                    continue;
                }

                if is_block_element(&el.name) {
                    result.push_str("\n\n");
                }

                if is_newline_element(&el.name) {
                    result.push('\n');
                }

                if el.name == "li" {
                    result.push('\n');
                    result.push_str(prefix);
                    if is_ordered {
                        result.push_str(&format!("{}. ", count));
                    } else {
                        result.push_str("- ");
                    }
                    count += 1;
                }

                if classify(&el.name, opts) == Category::InlineAllowed {
                    let cleaned = sanitize(el, opts);
                    result.push_str(&crate::markup::serialize(&MarkupNode::Element(cleaned)));
                    continue;
                }

                if matches!(el.name.as_str(), "ol" | "ul") {
                    let nested_prefix = format!("{}{}", prefix, INDENT_STEP);
                    result.push_str(&render_list_with(el, &nested_prefix, opts)?);
                    continue;
                }

                // Everything else contributes only its children, in order
                for child in el.children.iter().rev() {
                    queue.push_front(child);
                }
            }
        }
    }

    Ok(result)
}
