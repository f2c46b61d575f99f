/*!
 * Document drivers: feed chunk sequences to the translation service and
 * reassemble the results into complete output documents.
 *
 * Four input shapes are handled: HTML/XHTML bodies (chunked through the
 * splitter), OPF and NCX metadata (regex-matched titles, sentence-translated
 * and substituted back), and plain text (line-budget chunking).
 */

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ProcessingConfig;
use crate::chunk::{split_markup, ChunkKind, ChunkOptions};
use crate::file_utils::DocumentFormat;
use crate::translation::core::{PromptKind, TokenUsageStats, Translate};

// @const: OPF <dc:title> captures
static OPF_TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*dc:title[^>]*>(.*)<\s*/\s*dc:title\s*>").unwrap());

// @const: NCX <text> captures
static NCX_TEXT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*text[^>]*>(.*)<\s*/\s*text\s*>").unwrap());

/// A fully reassembled output document with its token accounting
#[derive(Debug)]
pub struct TranslatedDocument {
    /// The reassembled document text
    pub content: String,
    /// Token usage across every request the document needed
    pub usage: TokenUsageStats,
}

/// Drives chunk translation for one document at a time.
///
/// Within a document, chunks are translated strictly in traversal order; the
/// only suspension points are the service calls themselves.
pub struct DocumentTranslator<'a> {
    service: &'a dyn Translate,
    /// Character budget for one translation request
    input_limit: usize,
    /// Emit the original line before each translated line
    side_by_side: bool,
    /// Chunking options (ruby handling)
    chunk_opts: ChunkOptions,
}

impl<'a> DocumentTranslator<'a> {
    pub fn new(
        service: &'a dyn Translate,
        input_limit: usize,
        side_by_side: bool,
        chunk_opts: ChunkOptions,
    ) -> Self {
        Self {
            service,
            input_limit,
            side_by_side,
            chunk_opts,
        }
    }

    /// Build a translator from the processing configuration
    pub fn from_config(service: &'a dyn Translate, processing: &ProcessingConfig) -> Self {
        Self::new(
            service,
            processing.input_limit,
            processing.side_by_side,
            ChunkOptions {
                remove_ruby: processing.remove_ruby_annotations,
            },
        )
    }

    /// Dispatch on the detected document format
    pub async fn translate_document(
        &self,
        format: DocumentFormat,
        input: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<TranslatedDocument> {
        match format {
            DocumentFormat::Html => self.translate_html(input, progress).await,
            DocumentFormat::Opf => self.translate_opf(input, progress).await,
            DocumentFormat::Ncx => self.translate_ncx(input, progress).await,
            DocumentFormat::Txt => self.translate_txt(input, progress).await,
            DocumentFormat::Unsupported => {
                // Callers filter these out; copying unchanged is their job
                Ok(TranslatedDocument {
                    content: String::new(),
                    usage: TokenUsageStats::new(),
                })
            }
        }
    }

    /// Translate an HTML/XHTML document body.
    ///
    /// Chunks accumulate into one request until a boundary: the accumulated
    /// kind is passthrough, the next chunk is bypass/passthrough, there is no
    /// next chunk, or the next chunk would blow the character budget. An
    /// accumulated input without any newline is downgraded to its sentence
    /// prompt variant before being sent.
    pub async fn translate_html(
        &self,
        input: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<TranslatedDocument> {
        let chunks = split_markup(input, &self.chunk_opts)?;
        let mut usage = TokenUsageStats::new();

        // First chunk is the title
        let title = chunks
            .first()
            .map(|c| c.data.clone())
            .unwrap_or_else(|| "Title".to_string());
        let title_outcome = self.service.translate(&title, PromptKind::Sentence).await?;
        usage.add_outcome(&title_outcome);
        let translated_title = if title_outcome.translated.trim().is_empty() {
            title
        } else {
            title_outcome.translated.trim().to_string()
        };

        let mut result = String::from(
            "<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" xml:lang=\"en\">\n",
        );
        result.push_str("  <head>\n");
        result.push_str("    <meta charset=\"UTF-8\"/>\n");
        result.push_str(&format!("    <title>{}</title>\n", translated_title));
        result.push_str("  </head>\n");
        result.push_str("  <body>\n");

        let mut input_buf = String::new();
        let mut input_kind = ChunkKind::Text;

        for i in 1..chunks.len() {
            let chunk = &chunks[i];
            let next = chunks.get(i + 1);

            if chunk.kind == ChunkKind::Bypass {
                result.push_str("    ");
                result.push_str(&chunk.data);
                result.push_str("\n\n");
            } else if !chunk.data.is_empty() {
                input_buf.push_str(&chunk.data);
                input_buf.push_str("\n\n");
                if chunk.kind == ChunkKind::HtmlInline || chunk.kind == ChunkKind::Passthrough {
                    input_kind = chunk.kind;
                }
            }

            let at_boundary = input_kind == ChunkKind::Passthrough
                || match next {
                    None => true,
                    Some(n) => {
                        n.kind == ChunkKind::Bypass
                            || n.kind == ChunkKind::Passthrough
                            || input_buf.chars().count() + n.data.chars().count()
                                > self.input_limit
                    }
                };

            if at_boundary {
                let pending = input_buf.trim().to_string();
                if pending.is_empty() {
                    input_buf.clear();
                    input_kind = ChunkKind::Text;
                    progress(i, chunks.len());
                    continue;
                }

                let mut prompt_kind =
                    PromptKind::for_chunk(input_kind).unwrap_or(PromptKind::Text);

                // Sentence-level prompts give better single-line fidelity
                if !pending.contains('\n') {
                    prompt_kind = match prompt_kind {
                        PromptKind::Html => PromptKind::SentenceHtml,
                        PromptKind::Text => PromptKind::Sentence,
                        other => other,
                    };
                }

                let outcome = self.service.translate(&pending, prompt_kind).await?;
                usage.add_outcome(&outcome);

                if prompt_kind == PromptKind::Passthrough {
                    result.push_str(&outcome.translated);
                    result.push('\n');
                } else {
                    for line in recombine_lines(&pending, &outcome.translated, self.side_by_side)
                    {
                        result.push_str("    <p>");
                        result.push_str(&line);
                        result.push_str("</p>\n");
                    }
                }

                input_buf.clear();
                input_kind = ChunkKind::Text;

                progress(i, chunks.len());
            }
        }

        result.push_str("  </body>\n</html>");
        progress(chunks.len(), chunks.len());

        Ok(TranslatedDocument {
            content: result,
            usage,
        })
    }

    /// Translate every `<dc:title>` in an OPF package document
    pub async fn translate_opf(
        &self,
        input: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<TranslatedDocument> {
        self.translate_captures(&OPF_TITLE_REGEX, input, progress)
            .await
    }

    /// Translate every `<text>` in an NCX navigation document
    pub async fn translate_ncx(
        &self,
        input: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<TranslatedDocument> {
        self.translate_captures(&NCX_TEXT_REGEX, input, progress)
            .await
    }

    /// Sentence-translate each regex capture and substitute it back.
    ///
    /// Substitution is whole-string replace-all: every occurrence of the
    /// captured text is replaced, not just the matched position.
    async fn translate_captures(
        &self,
        regex: &Regex,
        input: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<TranslatedDocument> {
        let originals: Vec<String> = regex
            .captures_iter(input)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        let mut usage = TokenUsageStats::new();
        let mut result = input.to_string();
        let total = originals.len();

        for (i, original) in originals.iter().enumerate() {
            if original.is_empty() {
                continue;
            }

            let outcome = self.service.translate(original, PromptKind::Sentence).await?;
            usage.add_outcome(&outcome);

            result = result.replace(original.as_str(), &outcome.translated);

            progress(i + 1, total);
        }

        Ok(TranslatedDocument {
            content: result,
            usage,
        })
    }

    /// Translate plain text, accumulating lines up to the character budget
    pub async fn translate_txt(
        &self,
        input: &str,
        progress: impl Fn(usize, usize),
    ) -> Result<TranslatedDocument> {
        let lines: Vec<&str> = input.split('\n').collect();
        let mut usage = TokenUsageStats::new();
        let mut result = String::new();
        let mut chunk = String::new();

        for i in 0..lines.len() {
            let line = lines[i].trim();
            let next_line = lines.get(i + 1);

            if !line.is_empty() {
                chunk.push_str(line);
                chunk.push_str("\n\n");
            }

            let at_boundary = match next_line {
                None => true,
                Some(n) => chunk.chars().count() + n.chars().count() > self.input_limit,
            };

            if at_boundary {
                let pending = chunk.trim().to_string();
                if pending.is_empty() {
                    chunk.clear();
                    progress(i + 1, lines.len());
                    continue;
                }

                let prompt_kind = if pending.contains('\n') {
                    PromptKind::Text
                } else {
                    PromptKind::Sentence
                };

                let outcome = self.service.translate(&pending, prompt_kind).await?;
                usage.add_outcome(&outcome);

                for paired in recombine_lines(&pending, &outcome.translated, self.side_by_side) {
                    result.push_str(&paired);
                    result.push_str("\n\n");
                }

                chunk.clear();

                progress(i + 1, lines.len());
            }
        }

        Ok(TranslatedDocument {
            content: result,
            usage,
        })
    }
}

/// Re-pair input and translated text line by line.
///
/// Both sides are split into non-empty trimmed lines and zipped positionally
/// out to the longer side: the input line is emitted only in side-by-side
/// mode, the translated line whenever one exists at that index.
pub fn recombine_lines(input: &str, translated: &str, side_by_side: bool) -> Vec<String> {
    let input_lines: Vec<&str> = input.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let translated_lines: Vec<&str> = translated
        .split('\n')
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut out = Vec::new();
    for i in 0..input_lines.len().max(translated_lines.len()) {
        if side_by_side {
            if let Some(line) = input_lines.get(i) {
                out.push((*line).to_string());
            }
        }
        if let Some(line) = translated_lines.get(i) {
            out.push((*line).to_string());
        }
    }
    out
}
