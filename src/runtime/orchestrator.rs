use crate::error::{ChunkError, Result};
use crate::ingest::{process_raw_file, FileOutcome};
use crate::runtime::config::ChunkerConfig;
use crate::runtime::logging::{log_event, LogLevel};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// `input_root/a/b.docx` → `output_root/a/b.docx.json`.
pub fn output_path_for(input_root: &Path, output_root: &Path, file: &Path) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    let mut name = relative.as_os_str().to_owned();
    name.push(".json");
    output_root.join(name)
}

/// Accepted files under `input_root`, in path order.
pub fn collect_jobs(input_root: &Path, output_root: &Path, config: &ChunkerConfig) -> Vec<BatchJob> {
    WalkDir::new(input_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("[Batch] Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| config.accepts(entry.path()))
        .map(|entry| BatchJob {
            output: output_path_for(input_root, output_root, entry.path()),
            input: entry.into_path(),
        })
        .collect()
}

/// Converts every accepted file under `input_root`, mirroring the tree into `output_root`.
///
/// Files run on the blocking pool, at most `config.workers` at a time. A failing
/// file is logged and counted; it never aborts the batch.
pub async fn process_folder(
    input_root: &Path,
    output_root: &Path,
    config: &ChunkerConfig,
) -> Result<BatchReport> {
    if !input_root.is_dir() {
        tracing::error!("[Batch] Input folder does not exist: {}", input_root.display());
        return Err(ChunkError::FolderNotFound(input_root.to_path_buf()));
    }
    config.validate()?;

    let jobs = collect_jobs(input_root, output_root, config);
    tracing::info!(
        "[Batch] Starting conversion of {} file(s) from {}",
        jobs.len(),
        input_root.display()
    );

    let semaphore = Arc::new(Semaphore::new(config.workers));
    let shared_config = Arc::new(config.clone());
    let mut tasks = JoinSet::new();

    for job in jobs {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ChunkError::Task(e.to_string()))?;
        let config = shared_config.clone();
        tasks.spawn_blocking(move || {
            let _permit = permit;
            let result = process_raw_file(&job.input, &job.output, &config);
            (job, result)
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(FileOutcome::Written { .. }))) => report.processed += 1,
            Ok((job, Ok(FileOutcome::Skipped))) => {
                tracing::debug!("[Batch] Skipped {}", job.input.display());
                report.skipped += 1;
            }
            Ok((job, Err(err))) => {
                tracing::error!("[Batch] {} failed: {}", job.input.display(), err);
                report.failed += 1;
            }
            Err(err) => {
                tracing::error!("[Batch] Conversion task panicked or was cancelled: {}", err);
                report.failed += 1;
            }
        }
    }

    let level = if report.failed > 0 {
        LogLevel::Warn
    } else {
        LogLevel::Info
    };
    log_event(
        level,
        "All files complete",
        Some(json!({
            "input": input_root.display().to_string(),
            "output": output_root.display().to_string(),
            "report": report,
        })),
    );
    Ok(report)
}
