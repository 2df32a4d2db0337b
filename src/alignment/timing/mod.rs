use crate::alignment::normalization::normalize_word;
use crate::types::{AsrWord, Chunk, TimeSpan};

mod overlap_repair;
mod proportional;

pub use overlap_repair::repair_overlaps;
pub use proportional::{closest_start_index, proportional_estimate};

/// Incremental matching state threaded explicitly through chunk resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsrCursor {
    /// Next ASR word index to consider.
    pub position: usize,
    /// Word count of the chunk resolved just before the current one.
    pub prev_chunk_word_count: usize,
    /// Chunk characters already timed, for progress estimates.
    pub chars_processed: usize,
}

impl AsrCursor {
    pub(crate) fn advance(&mut self, chunk: &Chunk) {
        self.prev_chunk_word_count = chunk.token_count;
        self.chars_processed += chunk.char_len();
    }
}

/// Per-run view of the ASR stream shared by the resolvers.
#[derive(Debug, Clone)]
pub struct TimingContext<'a> {
    pub words: &'a [AsrWord],
    pub normalized: Vec<String>,
    pub total_chars: usize,
    /// Span from the first word's start to the last word's end.
    pub total_duration: f64,
    pub first_start: f64,
    pub last_end: f64,
}

impl<'a> TimingContext<'a> {
    /// `None` when there are no ASR words to time against.
    pub fn new(words: &'a [AsrWord], chunks: &[Chunk]) -> Option<Self> {
        let first = words.first()?;
        let last = words.last()?;
        Some(Self {
            words,
            normalized: words.iter().map(|w| normalize_word(&w.word)).collect(),
            total_chars: chunks.iter().map(Chunk::char_len).sum(),
            total_duration: last.end - first.start,
            first_start: first.start,
            last_end: last.end,
        })
    }

    /// End time from the chunk's share of script characters, capped at the
    /// last ASR word's end.
    pub fn proportional_end(&self, start: f64, chunk_chars: usize) -> f64 {
        let share = if self.total_chars == 0 {
            0.0
        } else {
            chunk_chars as f64 / self.total_chars as f64
        };
        (start + share * self.total_duration).min(self.last_end)
    }
}

/// Equal slices of `total_duration` in script order.
pub fn even_distribution(chunk_count: usize, total_duration: f64) -> Vec<TimeSpan> {
    if chunk_count == 0 {
        return Vec::new();
    }
    let slice = total_duration / chunk_count as f64;
    (0..chunk_count)
        .map(|i| TimeSpan::new(i as f64 * slice, (i + 1) as f64 * slice))
        .collect()
}

/// Placeholder timing for a chunk with no comparable words.
pub fn empty_chunk_span(prev_end: Option<f64>, duration: f64) -> TimeSpan {
    let start = prev_end.unwrap_or(0.0);
    TimeSpan::new(start, start + duration)
}
