use crate::chunker::metadata::{
    appendix_doc_id, doc_id_from_filename, extract_doc_id, extract_doc_name,
};
use crate::chunker::{
    assign_hierarchy_levels, clean_redundant_content, detect_forms_in_appendix, detect_hierarchy,
    hierarchy::untagged_document, identify_and_segment_document, parse_hierarchy,
    sanitize_content,
};
use crate::error::{ChunkError, Result};
use crate::runtime::config::ChunkerConfig;
use crate::sources::try_extract_text;
use crate::types::{Segment, StructuredDocument, StructuredFile};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Written { documents: usize },
    /// Unsupported type or no extractable text.
    Skipped,
}

/// Runs the whole structuring pipeline over already-extracted text.
pub fn convert_text(doc_filename: &str, raw: &str, config: &ChunkerConfig) -> StructuredFile {
    let content = sanitize_content(raw);
    let segments = identify_and_segment_document(&content);

    let main_id = segments
        .first()
        .and_then(|segment| extract_doc_id(&segment.content))
        .unwrap_or_else(|| doc_id_from_filename(doc_filename));

    tracing::info!(
        "[Chunker] {}: {} segment(s), document id '{}'",
        doc_filename,
        segments.len(),
        main_id
    );

    let documents = segments
        .iter()
        .map(|segment| structure_segment(segment, &main_id, config))
        .collect();

    StructuredFile {
        doc_filename: doc_filename.to_string(),
        documents,
    }
}

fn structure_segment(segment: &Segment, main_id: &str, config: &ChunkerConfig) -> StructuredDocument {
    let doc_id = if segment.is_appendix() {
        appendix_doc_id(main_id, segment.doc_number)
    } else {
        main_id.to_string()
    };

    let catalogue = detect_hierarchy(&segment.content);
    let mut articles = if catalogue.is_empty() {
        tracing::warn!("[Chunker] No hierarchy markers in document '{}'", doc_id);
        untagged_document(&segment.content, &doc_id)
    } else {
        let levels = assign_hierarchy_levels(&catalogue);
        parse_hierarchy(&segment.content, &levels, &doc_id)
    };
    clean_redundant_content(&mut articles);

    let forms = if segment.is_appendix() && config.detect_forms {
        detect_forms_in_appendix(&segment.content)
    } else {
        Vec::new()
    };

    StructuredDocument {
        doc_number: segment.doc_number,
        doc_name: extract_doc_name(&segment.content),
        doc_id,
        articles,
        forms,
    }
}

/// Extracts and structures one raw file. `None` when there is nothing to
/// structure: unsupported, unreadable or corrupt input, or no text.
pub fn convert_path(input: &Path, config: &ChunkerConfig) -> Result<Option<StructuredFile>> {
    let text = match try_extract_text(input) {
        Ok(text) => text,
        Err(ChunkError::UnsupportedFileType(ext)) => {
            tracing::warn!("[Extract] Unsupported file type '{}': {}", ext, input.display());
            return Ok(None);
        }
        Err(err @ (ChunkError::Extraction { .. } | ChunkError::Io { .. })) => {
            tracing::warn!("[Extract] Skipping unreadable file: {}", err);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    if text.trim().is_empty() {
        tracing::warn!("[Extract] No text extracted from {}", input.display());
        return Ok(None);
    }

    let doc_filename = input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Some(convert_text(&doc_filename, &text, config)))
}

/// Serializes with four-space indentation and non-ASCII kept as-is.
pub fn write_structured_file(output: &Path, structured: &StructuredFile) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| ChunkError::io(parent, e))?;
    }

    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    structured
        .serialize(&mut serializer)
        .map_err(|e| ChunkError::json(output, e))?;

    fs::write(output, bytes).map_err(|e| ChunkError::io(output, e))
}

pub fn process_raw_file(input: &Path, output: &Path, config: &ChunkerConfig) -> Result<FileOutcome> {
    let Some(structured) = convert_path(input, config)? else {
        return Ok(FileOutcome::Skipped);
    };

    write_structured_file(output, &structured)?;
    tracing::info!(
        "[Chunker] Wrote {} document(s) from {} to {}",
        structured.documents.len(),
        input.display(),
        output.display()
    );
    Ok(FileOutcome::Written {
        documents: structured.documents.len(),
    })
}
