/*!
 * Tests for the per-format document drivers
 */

use yaet::chunk::ChunkOptions;
use yaet::translation::core::PromptKind;
use yaet::translation::documents::DocumentTranslator;

use crate::common::mock_providers::MockTranslator;

fn translator(mock: &MockTranslator, input_limit: usize, side_by_side: bool) -> DocumentTranslator<'_> {
    DocumentTranslator::new(mock, input_limit, side_by_side, ChunkOptions::default())
}

#[tokio::test]
async fn test_translateHtml_withSimpleChapter_shouldWrapParagraphs() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    let input = "<html><head><title>第一章</title></head><body>\
                 <p>one</p><p>two</p></body></html>";
    let result = driver
        .translate_html(input, |_, _| {})
        .await
        .expect("translation should succeed");

    assert!(result.content.contains("<title>T:第一章</title>"));
    assert!(result.content.contains("    <p>T:one</p>\n"));
    assert!(result.content.contains("    <p>T:two</p>\n"));
    assert!(result.content.starts_with("<html xmlns=\"http://www.w3.org/1999/xhtml\""));
    assert!(result.content.ends_with("  </body>\n</html>"));
}

#[tokio::test]
async fn test_translateHtml_withSingleLineInput_shouldDowngradeToSentencePrompt() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    driver
        .translate_html("<body><p>only line</p></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let calls = mock.calls();
    // Title first, then the lone paragraph at sentence level
    assert_eq!(calls[0].kind, PromptKind::Sentence);
    assert_eq!(calls[1].input, "only line");
    assert_eq!(calls[1].kind, PromptKind::Sentence);
}

#[tokio::test]
async fn test_translateHtml_withSingleLineMarkup_shouldDowngradeToSentenceHtml() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    driver
        .translate_html("<body><h2>Lone heading</h2></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let calls = mock.calls();
    assert_eq!(calls[1].input, "<h2>Lone heading</h2>");
    assert_eq!(calls[1].kind, PromptKind::SentenceHtml);
}

#[tokio::test]
async fn test_translateHtml_withMultiLineInput_shouldUseTextPrompt() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    driver
        .translate_html("<body><p>one</p><p>two</p></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let calls = mock.calls();
    assert_eq!(calls[1].input, "one\n\ntwo");
    assert_eq!(calls[1].kind, PromptKind::Text);
}

#[tokio::test]
async fn test_translateHtml_withSmallBudget_shouldSplitIntoSeparateRequests() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 10, false);

    driver
        .translate_html("<body><p>aaaaaa</p><p>bbbbbb</p></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let calls = mock.calls();
    // Title plus one call per paragraph: 6 + 2 + 6 exceeds the 10-char budget
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].input, "aaaaaa");
    assert_eq!(calls[2].input, "bbbbbb");
}

#[tokio::test]
async fn test_translateHtml_withMultiByteText_shouldBudgetByCharacters() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 20, false);

    // Two 6-character paragraphs: 14 characters accumulated (44 UTF-8 bytes),
    // which fits a 20-character budget in a single request
    driver
        .translate_html("<body><p>あいうえおか</p><p>きくけこさし</p></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].input, "あいうえおか\n\nきくけこさし");
}

#[tokio::test]
async fn test_translateTxt_withMultiByteLines_shouldBudgetByCharacters() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 20, false);

    driver
        .translate_txt("あいうえおか\nきくけこさし", |_, _| {})
        .await
        .expect("translation should succeed");

    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.calls()[0].input, "あいうえおか\n\nきくけこさし");
}

#[tokio::test]
async fn test_translateHtml_withBypassContent_shouldCopyVerbatim() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    let result = driver
        .translate_html(
            r#"<body><p>text</p><img src="cover.jpg"/></body>"#,
            |_, _| {},
        )
        .await
        .expect("translation should succeed");

    assert!(result.content.contains("    <img src=\"cover.jpg\"/>\n\n"));
    // The image itself never reaches the service
    for call in mock.calls() {
        assert!(!call.input.contains("img"));
    }
}

#[tokio::test]
async fn test_translateHtml_withTable_shouldUsePassthroughPrompt() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);
    mock.script_response("T:title");
    mock.script_response("<table><tr><td>translated</td></tr></table>");

    let result = driver
        .translate_html("<body><table><tr><td>cell</td></tr></table></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let calls = mock.calls();
    assert_eq!(calls[1].kind, PromptKind::Passthrough);
    // Passthrough output is kept whole, not re-wrapped in <p> lines
    assert!(result
        .content
        .contains("<table><tr><td>translated</td></tr></table>\n"));
    assert!(!result.content.contains("<p><table>"));
}

#[tokio::test]
async fn test_translateHtml_withSideBySide_shouldInterleaveOriginalLines() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, true);

    let result = driver
        .translate_html("<body><p>one</p><p>two</p></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    let body: Vec<&str> = result
        .content
        .lines()
        .filter(|l| l.trim_start().starts_with("<p>"))
        .collect();
    assert_eq!(
        body,
        vec![
            "    <p>one</p>",
            "    <p>T:one</p>",
            "    <p>two</p>",
            "    <p>T:two</p>",
        ]
    );
}

#[tokio::test]
async fn test_translateOpf_withTitles_shouldSubstituteEveryOccurrence() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);
    mock.script_response("My Translated Book");

    let input = r#"<package>
  <metadata>
    <dc:title>私の本</dc:title>
  </metadata>
  <docTitle>私の本</docTitle>
</package>"#;
    let result = driver
        .translate_opf(input, |_, _| {})
        .await
        .expect("translation should succeed");

    // Replace-all: the occurrence outside the matched tag changes too
    assert!(result.content.contains("<dc:title>My Translated Book</dc:title>"));
    assert!(result.content.contains("<docTitle>My Translated Book</docTitle>"));
    assert_eq!(mock.calls().len(), 1);
    assert_eq!(mock.calls()[0].kind, PromptKind::Sentence);
}

#[tokio::test]
async fn test_translateNcx_withTextElements_shouldTranslateEach() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    let input = "<ncx>\n<navPoint><navLabel><text>第一章</text></navLabel></navPoint>\n\
                 <navPoint><navLabel><text>第二章</text></navLabel></navPoint>\n</ncx>";
    let result = driver
        .translate_ncx(input, |_, _| {})
        .await
        .expect("translation should succeed");

    assert!(result.content.contains("<text>T:第一章</text>"));
    assert!(result.content.contains("<text>T:第二章</text>"));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_translateOpf_withEmptyTitle_shouldSkipIt() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    let input = "<package><dc:title></dc:title></package>";
    let result = driver
        .translate_opf(input, |_, _| {})
        .await
        .expect("translation should succeed");

    assert_eq!(result.content, input);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_translateTxt_withParagraphLines_shouldJoinWithBlankLines() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    let result = driver
        .translate_txt("line one\n\nline two\n", |_, _| {})
        .await
        .expect("translation should succeed");

    assert_eq!(result.content, "T:line one\n\nT:line two\n\n");
}

#[tokio::test]
async fn test_translateTxt_withSmallBudget_shouldChunkByLines() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 10, false);

    driver
        .translate_txt("aaaaaa\nbbbbbb\ncccccc", |_, _| {})
        .await
        .expect("translation should succeed");

    assert_eq!(mock.call_count(), 3);
    for call in mock.calls() {
        assert_eq!(call.kind, PromptKind::Sentence);
    }
}

#[tokio::test]
async fn test_translateHtml_shouldAccumulateTokenUsage() {
    let mock = MockTranslator::new();
    let driver = translator(&mock, 1024, false);

    let result = driver
        .translate_html("<body><p>text</p></body>", |_, _| {})
        .await
        .expect("translation should succeed");

    // Title plus one body request, 10 tokens each
    assert_eq!(result.usage.total_tokens, 20);
    assert_eq!(result.usage.prompt_tokens, 10);
    assert_eq!(result.usage.completion_tokens, 10);
}
