use crate::error::{ChunkError, Result};
use crate::sources::{ParagraphSink, TextExtractor};
use std::path::Path;
use tl::{NodeHandle, Parser};

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "ul",
];
const SKIPPED_TAGS: &[&str] = &["head", "noscript", "script", "style", "title"];

pub struct HtmlExtractor;

pub static HTML_EXTRACTOR: HtmlExtractor = HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| ChunkError::io(path, e))?;
        let html = String::from_utf8_lossy(&bytes);
        html_to_text(&html).map_err(|message| ChunkError::extraction(path, message))
    }
}

/// Block elements become paragraphs; tables become tag lines.
pub fn html_to_text(html: &str) -> std::result::Result<String, String> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| format!("HTML parse error: {e:?}"))?;
    let parser = dom.parser();

    let mut sink = ParagraphSink::default();
    let mut buffer = String::new();
    for handle in dom.children() {
        walk(*handle, parser, &mut buffer, &mut sink);
    }
    flush(&mut buffer, &mut sink);
    Ok(sink.finish())
}

fn flush(buffer: &mut String, sink: &mut ParagraphSink) {
    if !buffer.trim().is_empty() {
        sink.paragraph(buffer);
    }
    buffer.clear();
}

fn walk(handle: NodeHandle, parser: &Parser, buffer: &mut String, sink: &mut ParagraphSink) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    let tag = match node {
        tl::Node::Raw(raw) => {
            buffer.push_str(&raw.as_utf8_str());
            return;
        }
        tl::Node::Comment(_) => return,
        tl::Node::Tag(tag) => tag,
    };

    let name = tag.name().as_utf8_str().to_ascii_lowercase();
    let children = || tag.children().top().iter().copied().collect::<Vec<_>>();

    match name.as_str() {
        n if SKIPPED_TAGS.contains(&n) => {}
        "br" => {
            flush(buffer, sink);
            for child in children() {
                walk(child, parser, buffer, sink);
            }
        }
        "table" | "tr" => {
            flush(buffer, sink);
            sink.tag(&format!("<{name}>"));
            for child in children() {
                walk(child, parser, buffer, sink);
            }
            flush(buffer, sink);
            sink.tag(&format!("</{name}>"));
        }
        "td" | "th" => {
            flush(buffer, sink);
            let mut cell = String::new();
            collect_text(handle, parser, &mut cell);
            sink.cell(&cell);
        }
        n if BLOCK_TAGS.contains(&n) => {
            flush(buffer, sink);
            for child in children() {
                walk(child, parser, buffer, sink);
            }
            flush(buffer, sink);
        }
        _ => {
            for child in children() {
                walk(child, parser, buffer, sink);
            }
        }
    }
}

/// Flattened text of a subtree, with a space at every element boundary.
fn collect_text(handle: NodeHandle, parser: &Parser, output: &mut String) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    if let Some(raw) = node.as_raw() {
        output.push_str(&raw.as_utf8_str());
        return;
    }

    if let Some(tag) = node.as_tag() {
        output.push(' ');
        for child in tag.children().top().iter() {
            collect_text(*child, parser, output);
        }
        output.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_blocks_into_paragraphs() {
        let html = "<html><head><title>x</title></head><body>\
                    <p>Điều 1. <b>Phạm vi</b></p><div>Nội dung<br>dòng hai</div></body></html>";
        assert_eq!(html_to_text(html).unwrap(), "Điều 1. Phạm vi\nNội dung\ndòng hai");
    }

    #[test]
    fn emits_table_tag_lines() {
        let html = "<table><tr><td><p>CHÍNH PHỦ</p></td><td>Số:&nbsp;15/2020/NĐ-CP</td></tr></table>";
        assert_eq!(
            html_to_text(html).unwrap(),
            "<table>\n<tr>\n<td>CHÍNH PHỦ</td>\n<td>Số: 15/2020/NĐ-CP</td>\n</tr>\n</table>"
        );
    }
}
