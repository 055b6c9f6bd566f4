use crate::background::{build_background, Background, HierarchyCache};
use crate::budget::allocate;
use crate::error::ChunkError;
use crate::models::{Chunk, ChunkMetadata, ChunkingOptions, Entry};
use crate::splitter::split_with_overlap;
use std::path::Path;
use tracing::debug;

const TITLE_ID_MAX_CHARS: usize = 30;

/// Run-wide chunk identifier source. The counter alone makes ids unique; the
/// file stem and title only help a reader trace a chunk back to its entry.
#[derive(Debug, Default)]
pub struct ChunkIdGenerator {
    counter: u64,
}

impl ChunkIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> u64 {
        self.counter
    }

    pub fn next_id(&mut self, source_file: &str, entry_title: &str, segment_index: usize) -> String {
        self.counter = self.counter.saturating_add(1);
        format!(
            "chunk_{:06}_{}_{}_{}",
            self.counter,
            file_stem(source_file),
            sanitize_title(entry_title),
            segment_index
        )
    }
}

fn file_stem(source_file: &str) -> &str {
    Path::new(source_file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source_file)
}

pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    kept.trim()
        .replace(' ', "_")
        .chars()
        .take(TITLE_ID_MAX_CHARS)
        .collect()
}

pub fn assemble_chunk(
    background: &str,
    segment: &str,
    chunk_id: String,
    source_file: &str,
    full_path: &str,
) -> Chunk {
    let content = if background.is_empty() {
        segment.to_string()
    } else {
        format!("{background}\n\n{segment}")
    };

    Chunk {
        metadata: ChunkMetadata {
            chunk_id,
            source_file: source_file.to_string(),
            full_path: full_path.to_string(),
            chunk_size: content.chars().count(),
            background_size: background.chars().count(),
            content_size: segment.chars().count(),
        },
        content,
    }
}

#[derive(Debug)]
pub struct ChunkEngine {
    options: ChunkingOptions,
    max_background_size: usize,
    cache: HierarchyCache,
    ids: ChunkIdGenerator,
}

impl ChunkEngine {
    pub fn new(options: ChunkingOptions) -> Result<Self, ChunkError> {
        options.validate()?;
        Ok(Self {
            max_background_size: options.resolved_max_background_size(),
            options,
            cache: HierarchyCache::new(),
            ids: ChunkIdGenerator::new(),
        })
    }

    pub fn options(&self) -> &ChunkingOptions {
        &self.options
    }

    pub fn max_background_size(&self) -> usize {
        self.max_background_size
    }

    pub fn chunks_issued(&self) -> u64 {
        self.ids.issued()
    }

    pub fn reset_for_document(&mut self) {
        self.cache.clear();
    }

    pub fn background_for(&mut self, entry: &Entry, all_entries: &[Entry]) -> Background {
        build_background(
            entry.hierarchy(),
            all_entries,
            &mut self.cache,
            self.max_background_size,
        )
    }

    pub fn chunk_entry(&mut self, entry: &Entry, all_entries: &[Entry], source_file: &str) -> Vec<Chunk> {
        let background = self.background_for(entry, all_entries);
        let budget = allocate(
            self.options.chunk_size,
            self.options.min_content_size,
            background,
            entry.title(),
        );
        let rendered = budget.background.render();

        split_with_overlap(&entry.content, budget.available_chars, self.options.overlap_size)
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let chunk_id = self.ids.next_id(source_file, entry.title(), index);
                assemble_chunk(&rendered, segment, chunk_id, source_file, entry.full_path())
            })
            .collect()
    }

    pub fn chunk_document(&mut self, entries: &[Entry], source_file: &str) -> Vec<Chunk> {
        self.reset_for_document();

        let total = entries.len();
        let mut chunks = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if index % 10 == 0 {
                debug!(source_file, entry = index + 1, total, "processing entry");
            }
            chunks.extend(self.chunk_entry(entry, entries, source_file));
        }
        chunks
    }
}
