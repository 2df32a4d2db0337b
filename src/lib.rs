pub mod alignment;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

pub use alignment::report::{compute_report, AlignmentReport, Meta};
pub use config::{AlignerConfig, MatchStrategy, ScoringConfig, WindowConfig};
pub use error::AlignmentError;
pub use output::slides::{
    format_slides_with_text, match_slides_to_segments, parse_slide_timestamps,
    parse_slides_with_text, retime_slides, SlideBoundary, SlideText,
};
pub use output::srt::{parse_srt, to_srt};
pub use pipeline::builder::SubtitleAlignerBuilder;
pub use pipeline::runtime::SubtitleAligner;
pub use pipeline::traits::TimingResolver;
pub use types::{
    AlignmentInput, AlignmentOutput, AsrWord, Chunk, SubtitleSegment, TimeSpan, TimingSource,
};
