use anyhow::Result;
use log::debug;

use crate::errors::MarkupError;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

// @module: Markup tree adapter - lenient XHTML/HTML parsing and serialization

/// A single node in a parsed markup tree.
///
/// Nodes exclusively own their children; trees are acyclic and finite. The
/// chunk splitter consumes a tree destructively, so everything here is owned
/// data rather than references into the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    /// Raw character data, entities already decoded
    Text(String),
    /// An element with its attributes and ordered children
    Element(ElementNode),
}

/// Element node: lowercased name, attributes in document order, children.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        ElementNode {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name (case-insensitive, first match)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl MarkupNode {
    pub fn text(data: impl Into<String>) -> Self {
        MarkupNode::Text(data.into())
    }

    pub fn element(el: ElementNode) -> Self {
        MarkupNode::Element(el)
    }

    /// Children of this node; text nodes have none
    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Text(_) => &[],
            MarkupNode::Element(el) => &el.children,
        }
    }

    /// Find the first element with the given name, pre-order, including self
    pub fn find_element(&self, name: &str) -> Option<&ElementNode> {
        match self {
            MarkupNode::Text(_) => None,
            MarkupNode::Element(el) => {
                if el.name == name {
                    return Some(el);
                }
                el.children.iter().find_map(|c| c.find_element(name))
            }
        }
    }
}

/// Parse markup text into a forest of nodes.
///
/// The parser is deliberately forgiving: element names are lowercased,
/// mismatched or stray end tags are tolerated, and comments, doctypes and
/// processing instructions are dropped. EPUB content documents are usually
/// well-formed XHTML, but plain `.html` inputs frequently are not.
pub fn parse(input: &str) -> Result<Vec<MarkupNode>> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    // Stack of open elements; index 0 is a synthetic root collecting the forest
    let mut stack: Vec<ElementNode> = vec![ElementNode::new("#root")];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let el = element_from_start(&e);
                stack.push(el);
            }
            Ok(Event::Empty(e)) => {
                let el = element_from_start(&e);
                let parent = stack.last_mut().unwrap();
                parent.children.push(MarkupNode::Element(el));
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                close_element(&mut stack, &name);
            }
            Ok(Event::Text(e)) => {
                let data = match e.unescape() {
                    Ok(cow) => cow.into_owned(),
                    // Unknown entity references: keep the raw text
                    Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
                };
                if !data.is_empty() {
                    let parent = stack.last_mut().unwrap();
                    parent.children.push(MarkupNode::Text(data));
                }
            }
            Ok(Event::CData(e)) => {
                let data = String::from_utf8_lossy(e.as_ref()).into_owned();
                if !data.is_empty() {
                    let parent = stack.last_mut().unwrap();
                    parent.children.push(MarkupNode::Text(data));
                }
            }
            Ok(Event::Comment(_)) | Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => {
                // Salvage whatever was parsed; fail only when there is nothing
                if stack.len() == 1 && stack[0].children.is_empty() {
                    return Err(MarkupError::Parse(e.to_string()).into());
                }
                debug!("Lenient parse stopping at malformed markup: {}", e);
                break;
            }
        }
    }

    // Unclosed elements at EOF fold into their parents
    while stack.len() > 1 {
        let el = stack.pop().unwrap();
        stack.last_mut().unwrap().children.push(MarkupNode::Element(el));
    }

    let root = stack.pop().unwrap();
    Ok(root.children)
}

fn element_from_start(e: &quick_xml::events::BytesStart) -> ElementNode {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
    let mut el = ElementNode::new(name);

    for attr in e.attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = match attr.unescape_value() {
            Ok(cow) => cow.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        el.attrs.push((key, value));
    }

    el
}

/// Close the innermost open element matching `name`. Intermediate unclosed
/// elements fold into their parents; a stray end tag with no match is dropped.
fn close_element(stack: &mut Vec<ElementNode>, name: &str) {
    let Some(pos) = stack.iter().rposition(|el| el.name == name) else {
        return;
    };
    if pos == 0 {
        return;
    }

    while stack.len() > pos {
        let el = stack.pop().unwrap();
        stack.last_mut().unwrap().children.push(MarkupNode::Element(el));
    }
}

/// Serialize a node back to markup text.
///
/// Entities are re-encoded (`&`, `<`, `>` in text; additionally `"` in
/// attribute values) and childless elements are written self-closing.
pub fn serialize(node: &MarkupNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Serialize an ordered sequence of nodes
pub fn serialize_all(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Text(data) => out.push_str(&escape_text(data)),
        MarkupNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            if el.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &el.children {
                    write_node(out, child);
                }
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
