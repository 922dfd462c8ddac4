mod common;

use common::{collect_ids, load_fixture, DECREE_FIXTURE, DECREE_ID};
use std::collections::HashSet;
use vbpl_ingest::chunker::clean_redundant_content;
use vbpl_ingest::ingest::convert_text;
use vbpl_ingest::retrieval::reconstruct_text;
use vbpl_ingest::runtime::config::ChunkerConfig;

fn convert_decree() -> vbpl_ingest::types::StructuredFile {
    convert_text(DECREE_FIXTURE, &load_fixture(DECREE_FIXTURE), &ChunkerConfig::default())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_decree_documents_and_ids() {
    let file = convert_decree();

    assert_eq!(file.doc_filename, DECREE_FIXTURE);
    let ids: Vec<&str> = file.documents.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            DECREE_ID,
            "15/2020/NĐ-CP_appendix_02",
            "15/2020/NĐ-CP_appendix_03"
        ]
    );
    assert_eq!(
        file.documents[0].doc_name,
        "NGHỊ ĐỊNH Quy định xử phạt vi phạm hành chính trong lĩnh vực bưu chính"
    );
}

#[test]
fn test_main_document_hierarchy() {
    let file = convert_decree();
    let articles = &file.documents[0].articles;

    let roots: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        roots,
        vec!["15/2020/NĐ-CP_txt001", "15/2020/NĐ-CP_chap001", "15/2020/NĐ-CP_chap002"]
    );

    let preamble = &articles[0];
    assert!(preamble.header.is_empty());
    assert!(preamble.content.starts_with("<table>"));
    assert!(preamble.content.ends_with("Quy định xử phạt vi phạm hành chính trong lĩnh vực bưu chính"));

    let chapter = &articles[1];
    assert_eq!(chapter.header, "Chương I");
    assert_eq!(chapter.title, "QUY ĐỊNH CHUNG");
    assert_eq!(chapter.subsections.len(), 2);

    let article = &chapter.subsections[1];
    assert_eq!(article.id, "15/2020/NĐ-CP_art002");
    assert_eq!(article.header, "Điều 2.");
    assert_eq!(article.content, "Đối tượng áp dụng");
    let clauses: Vec<&str> = article.subsections.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(clauses, vec!["15/2020/NĐ-CP_cl001", "15/2020/NĐ-CP_cl002"]);

    let penalty = &articles[2].subsections[0];
    assert_eq!(penalty.id, "15/2020/NĐ-CP_art003");
    let first_clause = &penalty.subsections[0];
    assert_eq!(first_clause.id, "15/2020/NĐ-CP_cl003");
    assert_eq!(first_clause.subsections.len(), 2);
    assert_eq!(first_clause.subsections[0].header, "a)");
    assert_eq!(
        first_clause.subsections[0].content,
        "Không thông báo khi thay đổi nội dung giấy phép;"
    );
}

#[test]
fn test_appendices_and_forms() {
    let file = convert_decree();

    let list = &file.documents[1];
    assert_eq!(list.doc_number, 2);
    assert!(list.forms.is_empty());
    assert_eq!(list.articles[0].id, "15/2020/NĐ-CP_appendix_02_txt001");
    assert_eq!(list.articles[1].id, "15/2020/NĐ-CP_appendix_02_cl001");
    assert_eq!(list.articles[1].content, "Giấy phép bưu chính.");

    let form_appendix = &file.documents[2];
    assert_eq!(form_appendix.articles.len(), 1);
    assert_eq!(form_appendix.forms.len(), 1);
    let form = &form_appendix.forms[0];
    assert_eq!(form.form_id, "form_01");
    assert_eq!(form.text, "Mẫu số 01");
    assert_eq!(form.start, 2);
    assert!(form.end > form.start);
}

#[test]
fn test_forms_can_be_disabled() {
    let config = ChunkerConfig {
        detect_forms: false,
        ..ChunkerConfig::default()
    };
    let file = convert_text(DECREE_FIXTURE, &load_fixture(DECREE_FIXTURE), &config);
    assert!(file.documents.iter().all(|d| d.forms.is_empty()));
}

#[test]
fn test_section_ids_are_unique() {
    let file = convert_decree();
    let ids = collect_ids(&file);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.len() > 10);
}

#[test]
fn test_cleaning_is_idempotent() {
    let file = convert_decree();
    for document in &file.documents {
        let mut again = document.articles.clone();
        clean_redundant_content(&mut again);
        assert_eq!(again, document.articles);
    }
}

#[test]
fn test_sibling_articles() {
    let file = convert_text("mau.txt", "Điều 1. Nội dung A\nĐiều 2. Nội dung B\n", &ChunkerConfig::default());
    let articles = &file.documents[0].articles;

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].id, "mau_art001");
    assert_eq!(articles[0].header, "Điều 1.");
    assert_eq!(articles[0].content, "Nội dung A");
    assert_eq!(articles[1].id, "mau_art002");
    assert!(articles.iter().all(|a| a.subsections.is_empty()));
}

#[test]
fn test_reconstruction_preserves_paragraphs() {
    let raw = load_fixture("thong_tu_prose.txt");
    let file = convert_text("thong_tu_prose.txt", &raw, &ChunkerConfig::default());
    assert_eq!(file.documents[0].doc_id, "thong-tu-prose");

    let text = reconstruct_text(&file);
    let separator = "-".repeat(80);
    let body = text.trim_end().strip_suffix(separator.as_str()).expect("document separator");

    assert_eq!(collapse_whitespace(body), collapse_whitespace(&raw));
}

#[test]
fn test_reconstruction_prefixes_ancestor_headers() {
    let text = reconstruct_text(&convert_decree());
    assert!(text.contains("    Điều 1., Chương I\n    Phạm vi điều chỉnh\n"));
    assert!(text.contains("            a), 1., Điều 3., Chương II\n"));
    assert!(text.contains("CHÍNH PHỦ | CỘNG HÒA XÃ HỘI CHỦ NGHĨA VIỆT NAM\n"));
    assert_eq!(text.matches(&"-".repeat(80)).count(), 3);
}
