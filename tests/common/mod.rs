#![allow(dead_code)]
use std::path::{Path, PathBuf};
use vbpl_ingest::types::{SectionNode, StructuredDocument, StructuredFile};

pub const DECREE_FIXTURE: &str = "nd15_2020.txt";
pub const DECREE_ID: &str = "15/2020/NĐ-CP";

pub fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

pub fn fixture_path(filename: &str) -> PathBuf {
    Path::new(&fixtures_dir()).join(filename)
}

pub fn load_fixture(filename: &str) -> String {
    let path = fixture_path(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Every node id in pre-order across all documents.
pub fn collect_ids(file: &StructuredFile) -> Vec<String> {
    let mut ids = Vec::new();
    for document in &file.documents {
        for article in &document.articles {
            article.walk(&mut |node, _| ids.push(node.id.clone()));
        }
    }
    ids
}

pub fn node(id: &str, header: &str, content: &str, subsections: Vec<SectionNode>) -> SectionNode {
    SectionNode {
        id: id.to_string(),
        header: header.to_string(),
        title: String::new(),
        content: content.to_string(),
        subsections,
    }
}

pub fn document(doc_number: u32, doc_id: &str, articles: Vec<SectionNode>) -> StructuredDocument {
    StructuredDocument {
        doc_number,
        doc_id: doc_id.to_string(),
        doc_name: String::new(),
        articles,
        forms: Vec::new(),
    }
}

pub fn write_json(path: &Path, file: &StructuredFile) {
    let json = serde_json::to_string_pretty(file).expect("serialize structured file");
    std::fs::write(path, json).expect("write structured file");
}
