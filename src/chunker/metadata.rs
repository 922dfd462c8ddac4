use regex::Regex;
use std::sync::LazyLock;

static DOC_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Số|Luật số)[:\s]*([^\s,;]+)").unwrap());
static TABLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<table>.*?</table>").unwrap());
static ID_UNSAFE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

const DOC_ID_SCAN_LINES: usize = 30;

/// Finds the official document number (`Số: 15/2020/NĐ-CP`) near the top of a segment.
pub fn extract_doc_id(segment_text: &str) -> Option<String> {
    for line in segment_text.split('\n').take(DOC_ID_SCAN_LINES) {
        let element = line.trim();
        if matches!(element, "<table>" | "</table>" | "<tr>" | "</tr>") {
            continue;
        }
        let text = element
            .strip_prefix("<td>")
            .and_then(|rest| rest.strip_suffix("</td>"))
            .map(str::trim)
            .unwrap_or(element);

        if let Some(captures) = DOC_NUMBER_RE.captures(text) {
            let id = captures[1].trim();
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}

/// Fallback document id derived from a file name: stem with whitespace and
/// underscores folded to `-`, so the id never contains the section separator.
pub fn doc_id_from_filename(filename: &str) -> String {
    let stem = std::path::Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    let folded = ID_UNSAFE_RE.replace_all(stem.trim(), "-");
    folded.trim_matches('-').to_string()
}

pub fn appendix_doc_id(main_id: &str, doc_number: u32) -> String {
    format!("{main_id}_appendix_{doc_number:02}")
}

pub fn remove_table_content(text: &str) -> String {
    TABLE_BLOCK_RE.replace_all(text, "").into_owned()
}

/// First two non-empty paragraphs outside tables, space-joined.
pub fn extract_doc_name(segment_text: &str) -> String {
    let cleaned = remove_table_content(segment_text);
    cleaned
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_number_from_table_cell() {
        let text = "<table>\n<tr>\n<td>CHÍNH PHỦ</td>\n<td>Số: 15/2020/NĐ-CP</td>\n</tr>\n</table>";
        assert_eq!(extract_doc_id(text).as_deref(), Some("15/2020/NĐ-CP"));
    }

    #[test]
    fn extracts_law_number() {
        let text = "QUỐC HỘI\nLuật số: 59/2020/QH14\nLUẬT DOANH NGHIỆP";
        assert_eq!(extract_doc_id(text).as_deref(), Some("59/2020/QH14"));
    }

    #[test]
    fn gives_up_after_thirty_lines() {
        let mut text = "x\n".repeat(30);
        text.push_str("Số: 1/2020/TT-BTC\n");
        assert_eq!(extract_doc_id(&text), None);
    }

    #[test]
    fn name_skips_tables() {
        let text = "<table>\n<tr>\n<td>Số: 1</td>\n</tr>\n</table>\nNGHỊ ĐỊNH\nQuy định xử phạt\nĐiều 1.";
        assert_eq!(extract_doc_name(text), "NGHỊ ĐỊNH Quy định xử phạt");
    }

    #[test]
    fn filename_ids_have_no_separator() {
        assert_eq!(doc_id_from_filename("122_2020_TT BTC.docx"), "122-2020-TT-BTC");
    }
}
