use crate::chunker::sanitize::normalize_for_match;
use crate::types::Segment;
use regex::Regex;
use std::sync::LazyLock;

static SIGNATURE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Nơi nhận:.*Lưu:").unwrap());
static APPENDIX_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Phụ lục\s+[IVXLCDM\-A-Za-z0-9.]*").unwrap());

const APPENDIX_BASE_SCORE: u32 = 40;
const APPENDIX_CONTEXT_BONUS: u32 = 10;
const APPENDIX_THRESHOLD: u32 = 50;
const CONTEXT_WINDOW: usize = 3;

const FOLLOWING_CONTEXT_PHRASES: &[&str] = &["banhànhkèm", "cộnghòaxãhội"];
const PRECEDING_CONTEXT_PHRASES: &[&str] = &["nơinhận:", "ghihọtên"];

/// Confidence that `paragraphs[index]` opens a new appendix. `None` when the
/// paragraph does not look like an appendix heading at all.
pub fn appendix_marker_score(paragraphs: &[&str], index: usize) -> Option<u32> {
    let paragraph = paragraphs.get(index)?.trim();
    if !APPENDIX_MARKER_RE.is_match(paragraph) {
        return None;
    }

    let mut score = APPENDIX_BASE_SCORE;

    let following = paragraphs.iter().skip(index + 1).take(CONTEXT_WINDOW);
    if any_contains(following, FOLLOWING_CONTEXT_PHRASES) {
        score += APPENDIX_CONTEXT_BONUS;
    }

    let preceding = paragraphs[..index].iter().rev().take(CONTEXT_WINDOW);
    if any_contains(preceding, PRECEDING_CONTEXT_PHRASES) {
        score += APPENDIX_CONTEXT_BONUS;
    }

    Some(score)
}

fn any_contains<S: AsRef<str>>(paragraphs: impl Iterator<Item = S>, phrases: &[&str]) -> bool {
    paragraphs
        .map(|paragraph| normalize_for_match(paragraph.as_ref()))
        .any(|normalized| phrases.iter().any(|phrase| normalized.contains(phrase)))
}

pub fn is_signature_block(text: &str) -> bool {
    SIGNATURE_BLOCK_RE.is_match(text)
}

struct SegmentBuilder {
    segments: Vec<Segment>,
    current: Segment,
}

impl SegmentBuilder {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            current: Segment {
                doc_number: 1,
                content: String::new(),
            },
        }
    }

    fn push_line(&mut self, paragraph: &str) {
        self.current.content.push_str(paragraph);
        self.current.content.push('\n');
    }

    /// Closes the open segment (dropped if blank) and opens the next one.
    fn close(&mut self) {
        let finished = std::mem::replace(
            &mut self.current,
            Segment {
                doc_number: 0,
                content: String::new(),
            },
        );
        if !finished.content.trim().is_empty() {
            self.segments.push(finished);
        }
        self.current.doc_number = self.segments.len() as u32 + 1;
    }

    fn finish(mut self) -> Vec<Segment> {
        self.close();
        self.segments
    }
}

/// Splits sanitized text into the main document followed by its appendices.
pub fn identify_and_segment_document(content: &str) -> Vec<Segment> {
    let paragraphs: Vec<&str> = content.split('\n').collect();
    let mut builder = SegmentBuilder::new();
    let mut table_depth = 0usize;
    let mut table_text = String::new();

    for (index, raw) in paragraphs.iter().enumerate() {
        let paragraph = raw.trim();
        let opens = paragraph.matches("<table>").count();
        let closes = paragraph.matches("</table>").count();

        if table_depth > 0
            && appendix_marker_score(&paragraphs, index)
                .is_some_and(|score| score >= APPENDIX_THRESHOLD)
        {
            tracing::debug!(
                "[Segmenter] Unclosed table (depth {}) reset at paragraph {}: {}",
                table_depth,
                index,
                paragraph
            );
            table_depth = 0;
            table_text.clear();
        }

        if table_depth > 0 || (opens > closes) {
            builder.push_line(paragraph);
            table_text.push_str(paragraph);
            table_text.push(' ');
            table_depth = (table_depth + opens).saturating_sub(closes);
            if table_depth == 0 {
                if is_signature_block(&table_text) {
                    tracing::debug!(
                        "[Segmenter] Signature table closes segment {}",
                        builder.current.doc_number
                    );
                    builder.close();
                }
                table_text.clear();
            }
            continue;
        }

        if is_signature_block(paragraph) {
            tracing::debug!(
                "[Segmenter] Signature block closes segment {}",
                builder.current.doc_number
            );
            builder.push_line(paragraph);
            builder.close();
            continue;
        }

        if let Some(score) = appendix_marker_score(&paragraphs, index) {
            if score >= APPENDIX_THRESHOLD {
                tracing::debug!(
                    "[Segmenter] Appendix boundary at paragraph {} (score {}): {}",
                    index,
                    score,
                    paragraph
                );
                builder.close();
                builder.push_line(paragraph);
                continue;
            }
            tracing::debug!(
                "[Segmenter] Rejected appendix candidate at paragraph {} (score {}): {}",
                index,
                score,
                paragraph
            );
        }

        builder.push_line(paragraph);
    }

    builder.finish()
}
