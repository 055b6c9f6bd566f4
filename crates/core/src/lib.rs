pub mod background;
pub mod budget;
pub mod chunking;
pub mod error;
pub mod ingest;
pub mod models;
pub mod splitter;

pub use background::{build_background, Background, HierarchyCache};
pub use budget::{allocate, Budget};
pub use chunking::{assemble_chunk, sanitize_title, ChunkEngine, ChunkIdGenerator};
pub use error::{ChunkError, Result};
pub use ingest::{
    digest_file, discover_json_files, load_entries, output_path_for, process_json_dir_best_effort,
    process_json_file, ProcessingReport, SkippedFile,
};
pub use models::{
    Chunk, ChunkMetadata, ChunkingOptions, DocumentStats, Entry, EntryMetadata, RunSummary,
};
pub use splitter::{find_break, split_with_overlap, Boundary, BoundaryRule, BOUNDARY_RULES};
