use crate::chunker::sanitize::{is_all_uppercase, normalize_for_match};
use crate::types::FormRecord;

const FORM_NUMBER_SCORE: u32 = 40;
const FORM_CONTEXT_BONUS: u32 = 10;
const FORM_THRESHOLD: u32 = 50;

fn is_table_boundary(paragraph: &str) -> bool {
    paragraph.contains("<table>") || paragraph.contains("</table>")
}

/// Form/template score for `paragraphs[index]`.
pub fn form_score(paragraphs: &[&str], index: usize) -> u32 {
    let Some(paragraph) = paragraphs.get(index) else {
        return 0;
    };
    let previous = index.checked_sub(1).and_then(|i| paragraphs.get(i)).map(|p| p.trim());
    let next = paragraphs.get(index + 1).map(|p| p.trim());

    let mut score = 0;
    if normalize_for_match(paragraph).contains("mẫusố") {
        score += FORM_NUMBER_SCORE;
    }
    if let Some(previous) = previous {
        if normalize_for_match(previous).contains("banhànhkèm") {
            score += FORM_CONTEXT_BONUS;
        }
        if is_table_boundary(previous) {
            score += FORM_CONTEXT_BONUS;
        }
    }
    if let Some(next) = next {
        if is_table_boundary(next) {
            score += FORM_CONTEXT_BONUS;
        }
        if is_all_uppercase(next) {
            score += FORM_CONTEXT_BONUS;
        }
        if normalize_for_match(next).contains("cộnghòaxãhội") {
            score += FORM_CONTEXT_BONUS;
        }
    }
    score
}

/// Flags form/template blocks inside an appendix segment.
///
/// Each record spans from its opening paragraph up to (not including) the next
/// record's opening paragraph; the last one runs to the end of the segment.
pub fn detect_forms_in_appendix(text: &str) -> Vec<FormRecord> {
    let paragraphs: Vec<&str> = text.split('\n').collect();
    let mut forms: Vec<FormRecord> = Vec::new();

    for index in 0..paragraphs.len() {
        if form_score(&paragraphs, index) < FORM_THRESHOLD {
            continue;
        }
        if let Some(open) = forms.last_mut() {
            open.end = index;
        }
        forms.push(FormRecord {
            form_id: format!("form_{:02}", forms.len() + 1),
            text: paragraphs[index].trim().to_string(),
            start: index,
            end: paragraphs.len(),
        });
    }

    forms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_number_alone_is_below_threshold() {
        let paragraphs = ["trước", "Mẫu số 01", "nội dung thường"];
        assert_eq!(form_score(&paragraphs, 1), 40);
    }

    #[test]
    fn uppercase_heading_after_form_number_passes() {
        let paragraphs = ["trước", "Mẫu số 01", "TỜ KHAI THUẾ"];
        assert_eq!(form_score(&paragraphs, 1), 50);
    }

    #[test]
    fn table_and_preamble_context_accumulate() {
        let paragraphs = ["</table>", "Mẫu số 02", "CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM"];
        // previous table boundary, next uppercase, next preamble
        assert_eq!(form_score(&paragraphs, 1), 70);
    }
}
