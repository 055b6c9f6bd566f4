use crate::models::average;
use crate::{ChunkEngine, ChunkError, DocumentStats, Entry, RunSummary};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

pub fn discover_json_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_json = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn digest_file(path: &Path) -> Result<String, ChunkError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn load_entries(path: &Path) -> Result<Vec<Entry>, ChunkError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf, ChunkError> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ChunkError::MissingFileName(input.display().to_string()))?;
    Ok(output_dir.join(format!("chunks_{stem}.json")))
}

pub fn process_json_file(
    engine: &mut ChunkEngine,
    input: &Path,
    output: &Path,
) -> Result<DocumentStats, ChunkError> {
    info!(input = %input.display(), "processing document");

    let source_file = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ChunkError::MissingFileName(input.display().to_string()))?;
    let checksum = digest_file(input)?;
    let entries = load_entries(input)?;

    let chunks = engine.chunk_document(&entries, source_file);

    fs::write(output, serde_json::to_string_pretty(&chunks)?)?;

    let original_total_chars = entries
        .iter()
        .map(|entry| entry.content.chars().count())
        .sum();
    let chunked_total_chars = chunks
        .iter()
        .map(|chunk| chunk.content.chars().count())
        .sum();

    let stats = DocumentStats {
        input_file: input.display().to_string(),
        output_file: output.display().to_string(),
        checksum,
        original_entries: entries.len(),
        total_chunks: chunks.len(),
        original_total_chars,
        chunked_total_chars,
        average_chunk_size: average(chunked_total_chars, chunks.len()),
        target_chunk_size: engine.options().chunk_size,
        overlap_size: engine.options().overlap_size,
        processed_at: Utc::now(),
    };

    info!(
        entries = stats.original_entries,
        chunks = stats.total_chunks,
        average_chunk_size = stats.average_chunk_size,
        output = %output.display(),
        "document chunked"
    );

    Ok(stats)
}

pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

pub struct ProcessingReport {
    pub stats: Vec<DocumentStats>,
    pub skipped_files: Vec<SkippedFile>,
}

impl ProcessingReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_stats(&self.stats)
    }
}

pub fn process_json_dir_best_effort(
    engine: &mut ChunkEngine,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<ProcessingReport, ChunkError> {
    let files = discover_json_files(input_dir);

    if files.is_empty() {
        return Err(ChunkError::InvalidArgument(format!(
            "no json files found in {}",
            input_dir.display()
        )));
    }

    fs::create_dir_all(output_dir)?;
    info!(count = files.len(), "found json files to process");

    let mut stats = Vec::new();
    let mut skipped_files = Vec::new();

    for path in files {
        let result = output_path_for(&path, output_dir)
            .and_then(|output| process_json_file(engine, &path, &output));

        match result {
            Ok(file_stats) => stats.push(file_stats),
            Err(error) => skipped_files.push(SkippedFile {
                path,
                reason: error.to_string(),
            }),
        }
    }

    Ok(ProcessingReport {
        stats,
        skipped_files,
    })
}
