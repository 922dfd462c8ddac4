mod common;

use common::{load_fixture, write_json, DECREE_FIXTURE};
use tempfile::TempDir;
use vbpl_ingest::ingest::convert_text;
use vbpl_ingest::retrieval::{expand_citations, extract_citation_ids, validate_citation};
use vbpl_ingest::runtime::config::ChunkerConfig;

#[test]
fn test_expands_cited_sections_from_folder() {
    let dir = TempDir::new().unwrap();
    let file = convert_text(DECREE_FIXTURE, &load_fixture(DECREE_FIXTURE), &ChunkerConfig::default());
    write_json(&dir.path().join("nd15.json"), &file);

    let answer = "Tổ chức bị phạt gấp đôi [Mã tài liệu: 15/2020/NĐ-CP_cl004]. \
                  Xem thêm [Mã tài liệu: 15/2020/NĐ-CP_appendix_02_cl001] và [Mã tài liệu: X_pt099].";
    assert!(validate_citation(answer));
    assert_eq!(extract_citation_ids(answer).len(), 3);

    let expansions = expand_citations(answer, dir.path()).unwrap();
    assert_eq!(expansions.len(), 3);

    let first = expansions[0].hit.as_ref().unwrap();
    assert!(first.text.starts_with("2.\nPhạt tiền gấp đôi đối với tổ chức.\n"));
    assert_eq!(
        expansions[1].hit.as_ref().unwrap().text,
        "1.\nGiấy phép bưu chính.\n"
    );
    assert_eq!(expansions[2].section_id, "X_pt099");
    assert!(expansions[2].hit.is_none());
}

#[test]
fn test_answer_without_citations() {
    let dir = TempDir::new().unwrap();
    let answer = "Không tìm thấy thông tin.";
    assert!(!validate_citation(answer));
    assert!(expand_citations(answer, dir.path()).unwrap().is_empty());
}
