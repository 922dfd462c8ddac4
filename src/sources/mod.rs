//! Raw text extraction per input file type.
//!
//! Every extractor produces newline-separated paragraphs. Tables are emitted
//! as tag lines (`<table>`, `<tr>`, `<td>cell</td>`, `</tr>`, `</table>`) so the
//! chunker can keep them verbatim.

use crate::error::{ChunkError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

pub mod docx;
pub mod html;
pub mod pdf;
pub mod txt;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Txt,
    Html,
    Docx,
    Pdf,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(FileKind::Txt),
            "html" | "htm" => Some(FileKind::Html),
            "docx" => Some(FileKind::Docx),
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Txt => "txt",
            FileKind::Html => "html",
            FileKind::Docx => "docx",
            FileKind::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

pub fn extractor_for(kind: FileKind) -> &'static dyn TextExtractor {
    match kind {
        FileKind::Txt => &txt::TXT_EXTRACTOR,
        FileKind::Html => &html::HTML_EXTRACTOR,
        FileKind::Docx => &docx::DOCX_EXTRACTOR,
        FileKind::Pdf => &pdf::PDF_EXTRACTOR,
    }
}

pub fn try_extract_text(path: &Path) -> Result<String> {
    let kind = FileKind::from_path(path).ok_or_else(|| {
        ChunkError::UnsupportedFileType(
            path.extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        )
    })?;
    extractor_for(kind).extract(path)
}

/// Extracts text, logging and returning an empty string on any failure.
pub fn extract_text_from_file(path: &Path) -> String {
    match try_extract_text(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("[Extract] {}", err);
            String::new()
        }
    }
}

/// Decodes the handful of entities seen in gazette markup and collapses whitespace.
pub(crate) fn normalize_text(input: &str) -> String {
    let decoded = input
        .replace("&nbsp;", " ")
        .replace('\u{00A0}', " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RE.replace_all(decoded.trim(), " ").trim().to_string()
}

/// Accumulates paragraphs and table tag lines.
#[derive(Debug, Default)]
pub(crate) struct ParagraphSink {
    lines: Vec<String>,
}

impl ParagraphSink {
    pub fn paragraph(&mut self, text: &str) {
        let text = normalize_text(text);
        if !text.is_empty() {
            self.lines.push(text);
        }
    }

    pub fn tag(&mut self, tag: &str) {
        self.lines.push(tag.to_string());
    }

    pub fn cell(&mut self, text: &str) {
        self.lines.push(format!("<td>{}</td>", normalize_text(text)));
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_extensions_case_insensitively() {
        assert_eq!(FileKind::from_path(Path::new("a/B.DOCX")), Some(FileKind::Docx));
        assert_eq!(FileKind::from_path(Path::new("x.htm")), Some(FileKind::Html));
        assert_eq!(FileKind::from_path(Path::new("x.rtf")), None);
    }

    #[test]
    fn unsupported_files_extract_to_empty_text() {
        assert_eq!(extract_text_from_file(Path::new("/nonexistent/file.rtf")), "");
        assert!(matches!(
            try_extract_text(Path::new("file.rtf")),
            Err(ChunkError::UnsupportedFileType(ext)) if ext == "rtf"
        ));
    }

    #[test]
    fn normalizes_entities_and_spaces() {
        assert_eq!(normalize_text("  Điều&nbsp;1.\n  A &amp; B "), "Điều 1. A & B");
    }
}
