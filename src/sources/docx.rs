use crate::error::{ChunkError, Result};
use crate::sources::{ParagraphSink, TextExtractor};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

pub static DOCX_EXTRACTOR: DocxExtractor = DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let file = File::open(path).map_err(|e| ChunkError::io(path, e))?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| ChunkError::extraction(path, format!("Invalid DOCX archive: {e}")))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ChunkError::extraction(path, format!("Missing {DOCUMENT_PART}: {e}")))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| ChunkError::io(path, e))?;
        document_xml_to_text(&xml).map_err(|message| ChunkError::extraction(path, message))
    }
}

/// Walks WordprocessingML body events.
///
/// Only top-level tables produce tag lines; a table nested in a cell is
/// flattened into that cell's text.
pub fn document_xml_to_text(xml: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut sink = ParagraphSink::default();
    let mut buf = Vec::new();
    let mut paragraph = String::new();
    let mut cell_parts: Vec<String> = Vec::new();
    let mut table_depth = 0usize;
    let mut in_cell = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        sink.tag("<table>");
                    }
                }
                b"tr" if table_depth == 1 => sink.tag("<tr>"),
                b"tc" if table_depth == 1 => {
                    in_cell = true;
                    cell_parts.clear();
                }
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push(' '),
                b"br" | b"cr" => {
                    if in_cell {
                        paragraph.push(' ');
                    } else {
                        sink.paragraph(&paragraph);
                        paragraph.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| format!("XML text error at {}: {err}", reader.buffer_position()))?;
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if in_cell {
                        if !paragraph.trim().is_empty() {
                            cell_parts.push(paragraph.trim().to_string());
                        }
                    } else {
                        sink.paragraph(&paragraph);
                    }
                    paragraph.clear();
                }
                b"tc" if table_depth == 1 => {
                    sink.cell(&cell_parts.join(" "));
                    cell_parts.clear();
                    in_cell = false;
                }
                b"tr" if table_depth == 1 => sink.tag("</tr>"),
                b"tbl" => {
                    if table_depth == 1 {
                        sink.tag("</table>");
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(format!("XML error at position {}: {err}", reader.error_position()));
            }
        }
        buf.clear();
    }

    Ok(sink.finish())
}
