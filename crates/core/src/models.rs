use crate::error::ChunkError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub content: String,
    pub metadata: EntryMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub title: String,
    #[serde(default)]
    pub hierarchy: Vec<String>,
    #[serde(default)]
    pub full_path: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

fn default_level() -> u32 {
    1
}

impl Entry {
    pub fn new(title: impl Into<String>, hierarchy: Vec<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        let full_path = if hierarchy.is_empty() {
            title.clone()
        } else {
            format!("{} > {}", hierarchy.join(" > "), title)
        };
        let level = u32::try_from(hierarchy.len() + 1).unwrap_or(u32::MAX);

        Self {
            content: content.into(),
            metadata: EntryMetadata {
                title,
                hierarchy,
                full_path: Some(full_path),
                level,
                content_length: None,
                word_count: None,
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn hierarchy(&self) -> &[String] {
        &self.metadata.hierarchy
    }

    pub fn full_path(&self) -> &str {
        self.metadata
            .full_path
            .as_deref()
            .unwrap_or(&self.metadata.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub chunk_id: String,
    pub source_file: String,
    pub full_path: String,
    pub chunk_size: usize,
    pub background_size: usize,
    pub content_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingOptions {
    pub chunk_size: usize,
    pub overlap_size: usize,
    pub max_background_size: Option<usize>,
    pub min_content_size: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: 5_000,
            overlap_size: 200,
            max_background_size: None,
            min_content_size: 100,
        }
    }
}

impl ChunkingOptions {
    pub fn new(chunk_size: usize, overlap_size: usize) -> Self {
        Self {
            chunk_size,
            overlap_size,
            ..Self::default()
        }
    }

    pub fn resolved_max_background_size(&self) -> usize {
        // Zero means unset, like an absent cap.
        self.max_background_size
            .filter(|size| *size > 0)
            .unwrap_or(self.chunk_size * 2 / 5)
    }

    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.chunk_size == 0 {
            return Err(ChunkError::InvalidChunkConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.min_content_size == 0 {
            return Err(ChunkError::InvalidChunkConfig(
                "min_content_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStats {
    pub input_file: String,
    pub output_file: String,
    pub checksum: String,
    pub original_entries: usize,
    pub total_chunks: usize,
    pub original_total_chars: usize,
    pub chunked_total_chars: usize,
    pub average_chunk_size: f64,
    pub target_chunk_size: usize,
    pub overlap_size: usize,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub total_entries: usize,
    pub total_chunks: usize,
    pub original_total_chars: usize,
    pub chunked_total_chars: usize,
    pub average_chunk_size: f64,
}

impl RunSummary {
    pub fn from_stats(stats: &[DocumentStats]) -> Self {
        let mut summary = stats.iter().fold(Self::default(), |mut acc, item| {
            acc.files_processed += 1;
            acc.total_entries += item.original_entries;
            acc.total_chunks += item.total_chunks;
            acc.original_total_chars += item.original_total_chars;
            acc.chunked_total_chars += item.chunked_total_chars;
            acc
        });
        summary.average_chunk_size = average(summary.chunked_total_chars, summary.total_chunks);
        summary
    }
}

pub(crate) fn average(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_json_defaults_optional_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let raw = r#"{"content": "body", "metadata": {"title": "Intro"}}"#;
        let entry: Entry = serde_json::from_str(raw)?;

        assert!(entry.hierarchy().is_empty());
        assert_eq!(entry.metadata.level, 1);
        assert_eq!(entry.full_path(), "Intro");
        Ok(())
    }

    #[test]
    fn entry_without_content_is_rejected() {
        let raw = r#"{"metadata": {"title": "Intro"}}"#;
        assert!(serde_json::from_str::<Entry>(raw).is_err());
    }

    #[test]
    fn entry_constructor_builds_display_path() {
        let entry = Entry::new("Setup", vec!["Guide".to_string(), "Install".to_string()], "x");
        assert_eq!(entry.full_path(), "Guide > Install > Setup");
        assert_eq!(entry.metadata.level, 3);
    }

    #[test]
    fn background_cap_defaults_to_forty_percent() {
        let options = ChunkingOptions::new(5_000, 200);
        assert_eq!(options.resolved_max_background_size(), 2_000);

        let explicit = ChunkingOptions {
            max_background_size: Some(750),
            ..options
        };
        assert_eq!(explicit.resolved_max_background_size(), 750);

        let zero = ChunkingOptions {
            max_background_size: Some(0),
            ..options
        };
        assert_eq!(zero.resolved_max_background_size(), 2_000);
    }

    #[test]
    fn zero_chunk_size_is_invalid() {
        let options = ChunkingOptions::new(0, 0);
        assert!(matches!(
            options.validate(),
            Err(ChunkError::InvalidChunkConfig(_))
        ));
    }

    #[test]
    fn summary_averages_over_all_chunks() {
        let stats = |chunks, chars| DocumentStats {
            input_file: "a.json".to_string(),
            output_file: "chunks_a.json".to_string(),
            checksum: String::new(),
            original_entries: 2,
            total_chunks: chunks,
            original_total_chars: chars,
            chunked_total_chars: chars,
            average_chunk_size: average(chars, chunks),
            target_chunk_size: 5_000,
            overlap_size: 200,
            processed_at: Utc::now(),
        };

        let summary = RunSummary::from_stats(&[stats(2, 300), stats(1, 600)]);
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.total_chunks, 3);
        assert!((summary.average_chunk_size - 300.0).abs() < f64::EPSILON);
    }
}
