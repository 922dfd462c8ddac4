use crate::error::Result;
use crate::retrieval::locator::{retrieve_section_text_from_folder, SectionHit};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Mã tài liệu:\s*([\w\-/.]+)\s*\]").unwrap());

/// Section ids cited as `[Mã tài liệu: <id>]`, first occurrence order, no duplicates.
pub fn extract_citation_ids(answer: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    CITATION_RE
        .captures_iter(answer)
        .map(|c| c[1].to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

pub fn validate_citation(answer: &str) -> bool {
    CITATION_RE.is_match(answer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationExpansion {
    pub section_id: String,
    pub hit: Option<SectionHit>,
}

/// Resolves every cited id against the structured files in `folder`.
pub fn expand_citations(answer: &str, folder: &Path) -> Result<Vec<CitationExpansion>> {
    let ids = extract_citation_ids(answer);
    if ids.is_empty() {
        tracing::warn!("[Locator] Answer carries no citation markers");
    }

    let mut expansions = Vec::with_capacity(ids.len());
    for section_id in ids {
        let hit = retrieve_section_text_from_folder(&section_id, folder)?;
        expansions.push(CitationExpansion { section_id, hit });
    }
    Ok(expansions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ids_in_order_without_duplicates() {
        let answer = "Theo [Mã tài liệu: 15/2020/NĐ-CP_art003] và [Mã tài liệu:DOC_cl001], \
                      xem lại [Mã tài liệu: 15/2020/NĐ-CP_art003].";
        assert_eq!(extract_citation_ids(answer), vec!["15/2020/NĐ-CP_art003", "DOC_cl001"]);
    }

    #[test]
    fn validates_presence_of_markers() {
        assert!(validate_citation("x [Mã tài liệu: A_art001]"));
        assert!(!validate_citation("Không có trích dẫn"));
    }
}
