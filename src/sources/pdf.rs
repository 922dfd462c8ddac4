use crate::error::{ChunkError, Result};
use crate::sources::TextExtractor;
use lopdf::Document;
use std::path::Path;

pub struct PdfExtractor;

pub static PDF_EXTRACTOR: PdfExtractor = PdfExtractor;

impl TextExtractor for PdfExtractor {
    /// Page text in page order. Pages that fail to decode are skipped with a warning.
    fn extract(&self, path: &Path) -> Result<String> {
        let doc = Document::load(path)
            .map_err(|e| ChunkError::extraction(path, format!("Invalid PDF: {e}")))?;

        let mut pages_text = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(content) => {
                    let lines = content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .collect::<Vec<_>>();
                    if !lines.is_empty() {
                        pages_text.push(lines.join("\n"));
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "[Extract] Skipping page {} of {}: {}",
                        page_number,
                        path.display(),
                        err
                    );
                }
            }
        }

        Ok(pages_text.join("\n"))
    }
}
