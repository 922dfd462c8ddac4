mod common;

use common::{load_fixture, DECREE_FIXTURE};
use std::fs;
use tempfile::TempDir;
use vbpl_ingest::error::ChunkError;
use vbpl_ingest::ingest::{process_raw_file, FileOutcome};
use vbpl_ingest::retrieval::load_structured_file;
use vbpl_ingest::runtime::config::ChunkerConfig;
use vbpl_ingest::runtime::orchestrator::{collect_jobs, process_folder, BatchReport};

fn config(workers: usize) -> ChunkerConfig {
    ChunkerConfig {
        workers,
        ..ChunkerConfig::default()
    }
}

#[test]
fn test_process_raw_file_writes_four_space_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nd15.txt");
    fs::write(&input, load_fixture(DECREE_FIXTURE)).unwrap();
    let output = dir.path().join("out/deep/nd15.txt.json");

    let outcome = process_raw_file(&input, &output, &config(1)).unwrap();
    assert_eq!(outcome, FileOutcome::Written { documents: 3 });

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.starts_with("{\n    \"doc_filename\": \"nd15.txt\""));
    assert!(json.contains("CỘNG HÒA XÃ HỘI"));

    let file = load_structured_file(&output).unwrap();
    assert_eq!(file.documents.len(), 3);
    assert_eq!(file.documents[2].forms.len(), 1);
    assert!(!json.contains("\"forms\": []"));
}

#[test]
fn test_empty_and_unsupported_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "  \n\n").unwrap();
    let rtf = dir.path().join("notes.rtf");
    fs::write(&rtf, "{\\rtf1}").unwrap();

    let out = dir.path().join("out.json");
    assert_eq!(process_raw_file(&empty, &out, &config(1)).unwrap(), FileOutcome::Skipped);
    assert_eq!(process_raw_file(&rtf, &out, &config(1)).unwrap(), FileOutcome::Skipped);
    assert!(!out.exists());
}

#[test]
fn test_corrupt_and_missing_inputs_are_skipped() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.docx");
    fs::write(&broken, "this is not a zip archive").unwrap();
    let scan = dir.path().join("scan.pdf");
    fs::write(&scan, "not a pdf").unwrap();

    let out = dir.path().join("out.json");
    assert_eq!(process_raw_file(&broken, &out, &config(1)).unwrap(), FileOutcome::Skipped);
    assert_eq!(process_raw_file(&scan, &out, &config(1)).unwrap(), FileOutcome::Skipped);
    assert_eq!(
        process_raw_file(&dir.path().join("gone.txt"), &out, &config(1)).unwrap(),
        FileOutcome::Skipped
    );
    assert!(!out.exists());
}

#[test]
fn test_write_failure_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nd15.txt");
    fs::write(&input, load_fixture(DECREE_FIXTURE)).unwrap();
    let output = dir.path().join("nd15.txt.json");
    fs::create_dir(&output).unwrap();

    assert!(matches!(
        process_raw_file(&input, &output, &config(1)),
        Err(ChunkError::Io { .. })
    ));
}

#[test]
fn test_collect_jobs_filters_extensions_and_mirrors_paths() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(input.join("2020")).unwrap();
    fs::write(input.join("2020/nd15.TXT"), "x").unwrap();
    fs::write(input.join("b.html"), "x").unwrap();
    fs::write(input.join("notes.rtf"), "x").unwrap();

    let output = dir.path().join("out");
    let jobs = collect_jobs(&input, &output, &config(1));
    let outputs: Vec<_> = jobs.iter().map(|j| j.output.clone()).collect();
    assert_eq!(
        outputs,
        vec![output.join("2020/nd15.TXT.json"), output.join("b.html.json")]
    );
}

#[tokio::test]
async fn test_process_folder_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(input.join("nghi-dinh")).unwrap();
    fs::write(input.join("nghi-dinh/nd15.txt"), load_fixture(DECREE_FIXTURE)).unwrap();
    fs::write(input.join("prose.txt"), load_fixture("thong_tu_prose.txt")).unwrap();
    fs::write(input.join("empty.txt"), "").unwrap();
    fs::write(input.join("broken.docx"), "this is not a zip archive").unwrap();
    fs::write(input.join("ignored.rtf"), "x").unwrap();
    let output = dir.path().join("out");
    // A directory where the JSON should go makes that write fail.
    fs::create_dir_all(output.join("prose.txt.json")).unwrap();

    let report = process_folder(&input, &output, &config(2)).await.unwrap();
    assert_eq!(
        report,
        BatchReport {
            processed: 1,
            skipped: 2,
            failed: 1
        }
    );
    assert_eq!(report.total(), 4);

    let decree = load_structured_file(&output.join("nghi-dinh/nd15.txt.json")).unwrap();
    assert_eq!(decree.documents.len(), 3);
    assert!(output.join("prose.txt.json").is_dir());
    assert!(!output.join("empty.txt.json").exists());
    assert!(!output.join("broken.docx.json").exists());
}

#[tokio::test]
async fn test_process_folder_requires_existing_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let result = process_folder(&missing, &dir.path().join("out"), &config(1)).await;
    assert!(matches!(result, Err(ChunkError::FolderNotFound(_))));
}

#[tokio::test]
async fn test_process_folder_rejects_zero_workers() {
    let dir = TempDir::new().unwrap();
    let result = process_folder(dir.path(), &dir.path().join("out"), &config(0)).await;
    assert!(matches!(result, Err(ChunkError::InvalidConfig(_))));
}
