use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static INLINE_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{202F}\u{2007}]+").unwrap());

/// Normalizes extracted text before segmentation.
///
/// Output is NFC, LF-only, one trimmed paragraph per line, with runs of blank
/// lines collapsed to a single blank line and no leading/trailing blank lines.
pub fn sanitize_content(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    let unified = composed
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(['\u{FEFF}', '\u{200B}', '\u{200C}', '\u{200D}'], "");

    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;
    for line in unified.lines() {
        let collapsed = INLINE_WHITESPACE_RE.replace_all(line, " ");
        let trimmed = collapsed.trim();
        if trimmed.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
            continue;
        }
        lines.push(trimmed.to_string());
        previous_blank = false;
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Lowercased with all spaces removed; the form used for phrase matching.
pub fn normalize_for_match(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "")
}

/// True when the text has at least one cased character and no lowercase ones.
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}
