/*!
 * Tests for markup parsing and serialization
 */

use yaet::markup::{self, MarkupNode};

#[test]
fn test_parse_withSimpleDocument_shouldBuildTree() {
    let nodes = markup::parse("<p>hello <b>world</b></p>").expect("parse should succeed");
    assert_eq!(nodes.len(), 1);

    let p = match &nodes[0] {
        MarkupNode::Element(el) => el,
        other => panic!("Expected element, got {:?}", other),
    };
    assert_eq!(p.name, "p");
    assert_eq!(p.children.len(), 2);
}

#[test]
fn test_parse_withUppercaseTags_shouldLowercaseNames() {
    let nodes = markup::parse("<P>text</P>").expect("parse should succeed");
    match &nodes[0] {
        MarkupNode::Element(el) => assert_eq!(el.name, "p"),
        other => panic!("Expected element, got {:?}", other),
    }
}

#[test]
fn test_parse_withUnclosedElement_shouldFoldAtEof() {
    let nodes = markup::parse("<div><p>text").expect("parse should succeed");
    let div = match &nodes[0] {
        MarkupNode::Element(el) => el,
        other => panic!("Expected element, got {:?}", other),
    };
    assert_eq!(div.name, "div");
    assert_eq!(div.children.len(), 1);
    match &div.children[0] {
        MarkupNode::Element(el) => assert_eq!(el.name, "p"),
        other => panic!("Expected element, got {:?}", other),
    }
}

#[test]
fn test_parse_withComments_shouldDropThem() {
    let nodes = markup::parse("<p><!-- hidden -->visible</p>").expect("parse should succeed");
    let p = match &nodes[0] {
        MarkupNode::Element(el) => el,
        other => panic!("Expected element, got {:?}", other),
    };
    assert_eq!(p.children.len(), 1);
    match &p.children[0] {
        MarkupNode::Text(t) => assert_eq!(t, "visible"),
        other => panic!("Expected text, got {:?}", other),
    }
}

#[test]
fn test_findElement_withNestedTarget_shouldFindInPreOrder() {
    let nodes =
        markup::parse("<html><head><title>Found</title></head></html>").expect("parse should succeed");
    let title = nodes[0]
        .find_element("title")
        .expect("title should be found");
    assert_eq!(markup::serialize_all(&title.children), "Found");
}

#[test]
fn test_attr_withMixedCaseName_shouldMatchCaseInsensitively() {
    let nodes = markup::parse(r#"<ol START="3"><li>x</li></ol>"#).expect("parse should succeed");
    let ol = match &nodes[0] {
        MarkupNode::Element(el) => el,
        other => panic!("Expected element, got {:?}", other),
    };
    assert_eq!(ol.attr("start"), Some("3"));
}

#[test]
fn test_parse_withUnsalvageableInput_shouldReturnParseError() {
    let error = markup::parse("<").expect_err("parse should fail");
    assert!(error.to_string().contains("Markup parse error"));
}

#[test]
fn test_parse_withTrailingGarbage_shouldKeepWhatWasParsed() {
    let nodes = markup::parse("<p>ok</p><").expect("parse should salvage");
    assert_eq!(nodes.len(), 1);
    match &nodes[0] {
        MarkupNode::Element(el) => assert_eq!(el.name, "p"),
        other => panic!("Expected element, got {:?}", other),
    }
}

#[test]
fn test_serialize_withSpecialCharacters_shouldEscapeText() {
    let nodes = markup::parse("<p>a &amp; b</p>").expect("parse should succeed");
    assert_eq!(markup::serialize(&nodes[0]), "<p>a &amp; b</p>");
}

#[test]
fn test_serialize_withEmptyElement_shouldSelfClose() {
    let nodes = markup::parse("<p>a<br/>b</p>").expect("parse should succeed");
    assert_eq!(markup::serialize(&nodes[0]), "<p>a<br/>b</p>");
}
