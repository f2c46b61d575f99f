/*!
 * Tests for the chunk splitting traversal
 */

use yaet::chunk::{split_markup, Chunk, ChunkKind, ChunkOptions};

fn split(input: &str) -> Vec<Chunk> {
    split_markup(input, &ChunkOptions::default()).expect("split should succeed")
}

#[test]
fn test_split_withTitledDocument_shouldEmitTitleFirst() {
    let chunks = split("<html><head><title>第一章</title></head><body><p>text</p></body></html>");
    assert_eq!(chunks[0], Chunk::new(ChunkKind::Sentence, "第一章"));
}

#[test]
fn test_split_withoutTitle_shouldEmitDefaultTitle() {
    let chunks = split("<body><p>text</p></body>");
    assert_eq!(chunks[0], Chunk::new(ChunkKind::Sentence, "Title"));
}

#[test]
fn test_split_withParagraphs_shouldEmitOneTextChunkEach() {
    let chunks = split("<body><p>one</p><p>two</p></body>");
    assert_eq!(
        chunks[1..],
        [
            Chunk::new(ChunkKind::Text, "one"),
            Chunk::new(ChunkKind::Text, "two"),
        ]
    );
}

#[test]
fn test_split_withHeading_shouldKeepInlineMarkup() {
    let chunks = split("<body><h1>Chapter</h1><p>para</p></body>");
    assert_eq!(chunks[1], Chunk::new(ChunkKind::HtmlInline, "<h1>Chapter</h1>"));
    assert_eq!(chunks[2], Chunk::new(ChunkKind::Text, "para"));
}

#[test]
fn test_split_withImage_shouldEmitBypassSingleton() {
    let chunks = split(r#"<body><p>before</p><img src="cover.jpg"/><p>after</p></body>"#);
    assert_eq!(
        chunks[1..],
        [
            Chunk::new(ChunkKind::Text, "before"),
            Chunk::new(ChunkKind::Bypass, r#"<img src="cover.jpg"/>"#),
            Chunk::new(ChunkKind::Text, "after"),
        ]
    );
}

#[test]
fn test_split_withTable_shouldEmitPassthroughSingleton() {
    let chunks = split("<body><table><tr><td>cell</td></tr></table></body>");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].kind, ChunkKind::Passthrough);
    assert!(chunks[1].data.starts_with("<table>"));
    assert!(chunks[1].data.contains("cell"));
}

#[test]
fn test_split_withScript_shouldRemoveContentEntirely() {
    let chunks = split("<body><p>keep</p><script>alert(1)</script></body>");
    assert_eq!(chunks[1..], [Chunk::new(ChunkKind::Text, "keep")]);
    for chunk in &chunks {
        assert!(!chunk.data.contains("alert"));
    }
}

#[test]
fn test_split_withRubyAnnotations_shouldStripReadingsByDefault() {
    let chunks = split("<body><p><ruby>漢字<rt>かんじ</rt></ruby>のみ</p></body>");
    assert_eq!(chunks[1], Chunk::new(ChunkKind::Text, "漢字のみ"));
}

#[test]
fn test_split_withRubyKept_shouldPreserveMarkup() {
    let opts = ChunkOptions { remove_ruby: false };
    let chunks =
        split_markup("<body><p><ruby>漢字<rt>かんじ</rt></ruby></p></body>", &opts)
            .expect("split should succeed");
    assert_eq!(
        chunks[1],
        Chunk::new(ChunkKind::HtmlInline, "<ruby>漢字<rt>かんじ</rt></ruby>")
    );
}

#[test]
fn test_split_withLineBreaks_shouldJoinIntoOneChunk() {
    let chunks = split("<body><p>first<br/>second</p></body>");
    assert_eq!(chunks[1], Chunk::new(ChunkKind::Text, "first\nsecond"));
}

#[test]
fn test_split_withOrderedList_shouldRenderNumberedLines() {
    let chunks = split("<body><ol><li>alpha</li><li>beta</li></ol></body>");
    assert_eq!(
        chunks[1],
        Chunk::new(ChunkKind::HtmlInline, "1. alpha\n2. beta")
    );
}

#[test]
fn test_split_withUnknownWrapper_shouldInlineChildrenInOrder() {
    let chunks = split("<body><div><p>one</p><p>two</p></div><p>three</p></body>");
    assert_eq!(
        chunks[1..],
        [
            Chunk::new(ChunkKind::Text, "one"),
            Chunk::new(ChunkKind::Text, "two"),
            Chunk::new(ChunkKind::Text, "three"),
        ]
    );
}

#[test]
fn test_split_withWhitespaceOnlyContent_shouldEmitNoEmptyChunks() {
    let chunks = split("<body><p>   </p><p>\n\n</p><p>real</p></body>");
    for chunk in &chunks {
        assert!(!chunk.data.is_empty(), "empty chunk emitted: {:?}", chunk);
    }
    assert_eq!(chunks[1..], [Chunk::new(ChunkKind::Text, "real")]);
}

#[test]
fn test_split_withoutBody_shouldTraverseAllNodes() {
    let chunks = split("<p>standalone</p>");
    assert_eq!(chunks[1..], [Chunk::new(ChunkKind::Text, "standalone")]);
}

#[test]
fn test_split_withMessyWhitespace_shouldNormalizeText() {
    let chunks = split("<body><p>a\n   b   c</p></body>");
    assert_eq!(chunks[1], Chunk::new(ChunkKind::Text, "a b c"));
}
