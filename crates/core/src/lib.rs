//! tldw Core Library
//!
//! Turns loosely shaped summary payloads into stable view-models, segments
//! transcripts, lays out mind maps, and keeps an embedded player in sync.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod mindmap;
pub mod normalize;
pub mod player;
pub mod segment;
pub mod session;
pub mod source;
pub mod store;
pub mod timestamp;
pub mod types;

// Re-export commonly used items at crate root
pub use client::{AnalysisBackend, AnalyzeRequest, ChatRequest, HttpBackend};
pub use config::Config;
pub use error::{Result, TldwError};
pub use export::{export_file_name, export_json, save_export};
pub use format::{format_report_readable, format_transcript_with_timestamps};
pub use mindmap::{LayoutConfig, LayoutNode, MindmapNode, ViewTransform, Viewport, layout_forest, layout_tree};
pub use normalize::{normalize, normalize_tagged, to_forest, to_sequence, to_term_sequence};
pub use player::{PlayerApiRegistry, PlayerCommand, PlayerController, PlayerState, SeekOutcome};
pub use segment::{TimeBucket, TextSegments, bucket_transcript, compute_bucket_size, segment_text};
pub use session::{ChatMessage, PersistedState, ResponsePolicy, Role, Session, Tab};
pub use source::{Origin, SourceKind, extract_video_id};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use timestamp::{TimeInput, format_position, format_timestamp, parse_timestamp};
pub use types::{ContentResult, Flashcard, Point, QuizItem, Term, TranscriptLine};
