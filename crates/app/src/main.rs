use chrono::Utc;
use clap::Parser;
use section_chunker_core::{
    output_path_for, process_json_dir_best_effort, process_json_file, ChunkEngine,
    ChunkingOptions, DocumentStats,
};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "section-chunker",
    version,
    about = "Chunk hierarchical JSON documents with inherited background context"
)]
struct Cli {
    /// Target chunk size in characters
    #[arg(long, env = "CHUNKER_CHUNK_SIZE", default_value = "5000")]
    chunk_size: usize,

    /// Overlap between neighbouring chunks in characters
    #[arg(long, env = "CHUNKER_OVERLAP", default_value = "200")]
    overlap: usize,

    /// Maximum background size in characters (default: 40% of chunk size)
    #[arg(long, env = "CHUNKER_MAX_BACKGROUND_SIZE")]
    max_background_size: Option<usize>,

    /// Minimum body characters per chunk
    #[arg(long, env = "CHUNKER_MIN_CONTENT_SIZE", default_value = "100")]
    min_content_size: usize,

    /// Folder that contains the structured JSON documents
    #[arg(long, env = "CHUNKER_INPUT_DIR", default_value = "JSON_files")]
    input_dir: PathBuf,

    /// Folder the chunk files are written to
    #[arg(long, env = "CHUNKER_OUTPUT_DIR", default_value = "chunk_files")]
    output_dir: PathBuf,

    /// Process a single file instead of the whole input folder
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let options = ChunkingOptions {
        chunk_size: cli.chunk_size,
        overlap_size: cli.overlap,
        max_background_size: cli.max_background_size,
        min_content_size: cli.min_content_size,
    };
    let mut engine = ChunkEngine::new(options)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        chunk_size = options.chunk_size,
        overlap = options.overlap_size,
        max_background_size = engine.max_background_size(),
        "section-chunker boot"
    );

    match &cli.file {
        Some(input) => {
            fs::create_dir_all(&cli.output_dir)?;
            let output = output_path_for(input, &cli.output_dir)?;
            let stats = process_json_file(&mut engine, input, &output)?;

            println!("Processing complete!");
            print_document_stats(&stats);
        }
        None => {
            let report = process_json_dir_best_effort(&mut engine, &cli.input_dir, &cli.output_dir)?;

            if !report.skipped_files.is_empty() {
                warn!(
                    "skipped_files={} for folder={}",
                    report.skipped_files.len(),
                    cli.input_dir.display()
                );
                for skipped in &report.skipped_files {
                    warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped document");
                }
            }

            if report.stats.is_empty() {
                println!("0 documents chunked (all files were skipped)");
                return Ok(());
            }

            let summary = report.summary();
            println!("Processing complete!");
            println!();
            println!("Summary Statistics:");
            println!("  Files processed: {}", summary.files_processed);
            println!("  Total original entries: {}", summary.total_entries);
            println!("  Total chunks created: {}", summary.total_chunks);
            println!("  Original total characters: {}", summary.original_total_chars);
            println!("  Chunked total characters: {}", summary.chunked_total_chars);
            println!("  Average chunk size: {:.1} characters", summary.average_chunk_size);
            println!("  Target chunk size: {} characters", options.chunk_size);
            println!(
                "  Maximum background size: {} characters",
                engine.max_background_size()
            );
        }
    }

    Ok(())
}

fn print_document_stats(stats: &DocumentStats) {
    println!("  Input: {}", stats.input_file);
    println!("  Output: {}", stats.output_file);
    println!(
        "  Created {} chunks from {} entries",
        stats.total_chunks, stats.original_entries
    );
    println!("  Original characters: {}", stats.original_total_chars);
    println!("  Chunked characters: {}", stats.chunked_total_chars);
    println!("  Average chunk size: {:.1} characters", stats.average_chunk_size);
    println!("  Overlap: {} characters", stats.overlap_size);
    println!("  Input checksum: {}", stats.checksum);
}
