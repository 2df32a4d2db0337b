use crate::alignment::timing::{AsrCursor, TimingContext};
use crate::alignment::windowed::match_chunk;
use crate::config::WindowConfig;
use crate::pipeline::traits::TimingResolver;
use crate::types::{Alignment, AsrWord, Chunk, TimeSpan, TimingSource};

/// Times a chunk from the span of its globally aligned ASR words.
pub struct GlobalAlignmentResolver<'a> {
    alignment: &'a Alignment,
    words: &'a [AsrWord],
}

impl<'a> GlobalAlignmentResolver<'a> {
    pub fn new(alignment: &'a Alignment, words: &'a [AsrWord]) -> Self {
        Self { alignment, words }
    }
}

impl TimingResolver for GlobalAlignmentResolver<'_> {
    fn resolve(&mut self, chunk: &Chunk, cursor: &mut AsrCursor) -> Option<TimeSpan> {
        if chunk.token_count == 0 {
            return None;
        }
        let (first, last) = self.alignment.span(chunk.token_range())?;
        let (first_word, last_word) = (self.words.get(first)?, self.words.get(last)?);
        cursor.position = cursor.position.max(last + 1);
        Some(TimeSpan::new(first_word.start, last_word.end))
    }

    fn source(&self) -> TimingSource {
        TimingSource::GlobalAlignment
    }

    fn next_anchor(&self, chunk: &Chunk) -> Option<usize> {
        let after = chunk.start_token + chunk.token_count;
        self.alignment
            .span(after..self.alignment.len())
            .map(|(first, _)| first)
    }
}

/// Times a chunk by anchoring one of its leading words in a lookahead window.
pub struct WindowedResolver<'a> {
    ctx: &'a TimingContext<'a>,
    window: WindowConfig,
    fuzzy_ratio: f64,
}

impl<'a> WindowedResolver<'a> {
    pub fn new(ctx: &'a TimingContext<'a>, window: WindowConfig, fuzzy_ratio: f64) -> Self {
        Self {
            ctx,
            window,
            fuzzy_ratio,
        }
    }
}

impl TimingResolver for WindowedResolver<'_> {
    fn resolve(&mut self, chunk: &Chunk, cursor: &mut AsrCursor) -> Option<TimeSpan> {
        let chunk_words: Vec<&str> = chunk.words().collect();
        let found = match_chunk(
            &chunk_words,
            self.ctx.words,
            &self.ctx.normalized,
            cursor.position,
            cursor.prev_chunk_word_count,
            &self.window,
            self.fuzzy_ratio,
        );
        if !found.matched {
            return None;
        }
        let start = found.start_time?;
        cursor.position = found.new_cursor;
        Some(TimeSpan::new(
            start,
            self.ctx.proportional_end(start, chunk.char_len()),
        ))
    }

    fn source(&self) -> TimingSource {
        TimingSource::WindowedMatch
    }
}
