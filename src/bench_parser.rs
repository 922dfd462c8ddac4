use std::time::Instant;
use vbpl_ingest::chunker::{identify_and_segment_document, sanitize_content};
use vbpl_ingest::ingest::convert_text;
use vbpl_ingest::runtime::config::ChunkerConfig;
use vbpl_ingest::sources::extract_text_from_file;

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("Usage: bench_parser <raw_file>");
    let text = extract_text_from_file(std::path::Path::new(&path));
    if text.is_empty() {
        eprintln!("No text extracted from {path}");
        std::process::exit(1);
    }
    let config = ChunkerConfig::default();

    let iterations = 5;

    // Baseline: sanitize + segment only
    let sanitized = sanitize_content(&text);
    let _ = identify_and_segment_document(&sanitized);
    let mut baseline_durations = Vec::new();
    for i in 0..iterations {
        let start = Instant::now();
        let segments = identify_and_segment_document(&sanitize_content(&text));
        let elapsed = start.elapsed();
        baseline_durations.push(elapsed);
        println!(
            "Baseline {}: {:.3}s ({} segments)",
            i + 1,
            elapsed.as_secs_f64(),
            segments.len(),
        );
    }
    let baseline_avg =
        baseline_durations.iter().map(|d| d.as_secs_f64()).sum::<f64>() / iterations as f64;
    let baseline_min = baseline_durations
        .iter()
        .map(|d| d.as_secs_f64())
        .fold(f64::INFINITY, f64::min);
    println!("Baseline avg: {:.3}s, min: {:.3}s\n", baseline_avg, baseline_min);

    // Full pipeline
    let _ = convert_text(&path, &text, &config);
    let mut durations = Vec::new();
    for i in 0..iterations {
        let start = Instant::now();
        let result = convert_text(&path, &text, &config);
        let elapsed = start.elapsed();
        durations.push(elapsed);
        let nodes: usize = result
            .documents
            .iter()
            .flat_map(|d| d.articles.iter())
            .map(|a| {
                let mut count = 0;
                a.walk(&mut |_, _| count += 1);
                count
            })
            .sum();
        println!(
            "Iteration {}: {:.3}s ({} documents, {} sections)",
            i + 1,
            elapsed.as_secs_f64(),
            result.documents.len(),
            nodes,
        );
    }

    let avg = durations.iter().map(|d| d.as_secs_f64()).sum::<f64>() / iterations as f64;
    let min = durations.iter().map(|d| d.as_secs_f64()).fold(f64::INFINITY, f64::min);
    println!("\nPipeline avg: {:.3}s, min: {:.3}s", avg, min);
    println!("Overhead vs baseline: {:.1}x", avg / baseline_avg);
}
