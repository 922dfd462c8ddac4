use serde::{Deserialize, Serialize};

/// A contiguous span of a raw document: the main body (`doc_number == 1`) or one appendix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub doc_number: u32,
    pub content: String,
}

impl Segment {
    pub fn is_appendix(&self) -> bool {
        self.doc_number > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub subsections: Vec<SectionNode>,
}

impl SectionNode {
    /// The per-node marker token, e.g. `art003` for `15/2020/NĐ-CP_art003`.
    pub fn marker_token(&self) -> &str {
        marker_token(&self.id)
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a SectionNode, usize)) {
        fn go<'a>(node: &'a SectionNode, depth: usize, visit: &mut dyn FnMut(&'a SectionNode, usize)) {
            visit(node, depth);
            for child in &node.subsections {
                go(child, depth + 1, visit);
            }
        }
        go(self, 0, visit);
    }
}

/// Suffix after the last `_` separator of a section id.
pub fn marker_token(section_id: &str) -> &str {
    match section_id.rsplit_once('_') {
        Some((_, token)) => token,
        None => section_id,
    }
}

/// Half-open paragraph range `[start, end)` flagged as a form/template inside an appendix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub form_id: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub doc_number: u32,
    pub doc_id: String,
    pub doc_name: String,
    pub articles: Vec<SectionNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<FormRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFile {
    pub doc_filename: String,
    pub documents: Vec<StructuredDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_token_uses_last_separator() {
        assert_eq!(marker_token("ND15_appendix_02_art003"), "art003");
        assert_eq!(marker_token("art003"), "art003");
    }

    #[test]
    fn deserializes_nodes_without_optional_fields() {
        let node: SectionNode =
            serde_json::from_str(r#"{"header": "", "title": "", "content": "x", "subsections": []}"#)
                .unwrap();
        assert_eq!(node.id, "");
        assert_eq!(node.content, "x");
    }
}
