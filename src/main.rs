use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use vbpl_ingest::error::Result;
use vbpl_ingest::ingest::{convert_path, process_raw_file, FileOutcome};
use vbpl_ingest::retrieval::{
    load_structured_file, not_found_message, outline, retrieve_section_text_from_folder_with,
    retrieve_section_text_from_path_with, Reconstructor,
};
use vbpl_ingest::runtime::config::ChunkerConfig;
use vbpl_ingest::runtime::logging::init_logging;
use vbpl_ingest::runtime::orchestrator::process_folder;

#[derive(Parser, Debug)]
#[command(
    name = "vbpl-ingest",
    about = "Structure Vietnamese legal documents into addressable JSON sections",
    arg_required_else_help = true
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// JSON configuration file.
    #[arg(long = "config", short = 'c', value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one raw file (txt, docx, pdf, html) into structured JSON.
    Convert { input: PathBuf, output: PathBuf },
    /// Convert a folder tree, mirroring it into the output folder.
    ConvertFolder { input: PathBuf, output: PathBuf },
    /// Print the full-text reconstruction of a structured JSON file.
    Reconstruct { json: PathBuf },
    /// Print one section by id from a JSON file or a folder of JSON files.
    Section {
        id: String,
        #[arg(long, value_name = "FILE", conflicts_with = "folder", required_unless_present = "folder")]
        file: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        folder: Option<PathBuf>,
    },
    /// List forms detected in the appendices of a raw file.
    Forms { input: PathBuf },
    /// Print the section tree of a structured JSON file.
    Outline { json: PathBuf },
}

fn load_config(path: Option<&Path>) -> Result<ChunkerConfig> {
    match path {
        Some(path) => ChunkerConfig::load_from_file(path),
        None => Ok(ChunkerConfig::default()),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config_file.as_deref())?;

    match cli.command {
        Command::Convert { input, output } => match process_raw_file(&input, &output, &config)? {
            FileOutcome::Written { documents } => {
                println!("Wrote {} document(s) to {}", documents, output.display());
            }
            FileOutcome::Skipped => {
                println!("Nothing to convert in {}", input.display());
            }
        },
        Command::ConvertFolder { input, output } => {
            let report = process_folder(&input, &output, &config).await?;
            println!(
                "Processed {}, skipped {}, failed {} (of {})",
                report.processed,
                report.skipped,
                report.failed,
                report.total()
            );
            if report.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Reconstruct { json } => {
            let file = load_structured_file(&json)?;
            print!("{}", Reconstructor::new(config.indent_width).file(&file));
        }
        Command::Section { id, file, folder } => {
            let renderer = Reconstructor::new(config.indent_width);
            let text = match (file, folder) {
                (Some(file), _) => retrieve_section_text_from_path_with(&id, &file, renderer)?,
                (None, Some(folder)) => match retrieve_section_text_from_folder_with(&id, &folder, renderer)? {
                    Some(hit) => Some(hit.text),
                    None => {
                        eprintln!("{}", not_found_message(&id, &folder));
                        return Ok(ExitCode::FAILURE);
                    }
                },
                (None, None) => None,
            };
            match text {
                Some(text) => print!("{text}"),
                None => {
                    eprintln!("Section id '{id}' not found");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Forms { input } => {
            let Some(structured) = convert_path(&input, &config)? else {
                println!("Nothing to convert in {}", input.display());
                return Ok(ExitCode::SUCCESS);
            };
            for document in structured.documents.iter().filter(|d| !d.forms.is_empty()) {
                println!("{} ({})", document.doc_id, document.doc_name);
                for form in &document.forms {
                    println!("  {} [{}..{})", form.form_id, form.start, form.end);
                    for line in form.text.lines().take(3) {
                        println!("    {line}");
                    }
                }
            }
        }
        Command::Outline { json } => {
            let file = load_structured_file(&json)?;
            let mut current_doc: Option<String> = None;
            for entry in outline(&file) {
                if current_doc.as_deref() != Some(entry.doc_id.as_str()) {
                    println!("{}", entry.doc_id);
                    current_doc = Some(entry.doc_id.clone());
                }
                let label = [entry.header.as_str(), entry.title.as_str()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}{} {}", "  ".repeat(entry.depth + 1), entry.id, label);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
