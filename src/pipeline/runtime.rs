use crate::alignment::global::align_normalized;
use crate::alignment::segmentation::segment;
use crate::alignment::timing::{
    empty_chunk_span, even_distribution, proportional_estimate, repair_overlaps, AsrCursor,
    TimingContext,
};
use crate::config::{AlignerConfig, MatchStrategy};
use crate::error::AlignmentError;
use crate::pipeline::defaults::{GlobalAlignmentResolver, WindowedResolver};
use crate::pipeline::traits::TimingResolver;
use crate::types::{
    Alignment, AlignmentInput, AlignmentOutput, Chunk, ScriptToken, SubtitleSegment, TimingSource,
};

pub struct SubtitleAligner {
    config: AlignerConfig,
}

impl SubtitleAligner {
    pub(crate) fn from_config(config: AlignerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Segment the script, time every chunk, and restore segment ordering.
    ///
    /// Only a run with no ASR words and no known duration fails.
    pub fn align(&self, input: &AlignmentInput) -> Result<AlignmentOutput, AlignmentError> {
        let (chunks, script_tokens) = segment(&input.script, self.config.max_chars);
        if chunks.is_empty() {
            return Ok(AlignmentOutput::empty());
        }

        let Some(ctx) = TimingContext::new(&input.words, &chunks) else {
            return self.distribute_evenly(chunks, script_tokens, input.total_duration);
        };

        let alignment = match self.config.strategy {
            MatchStrategy::Global => Some(self.global_alignment(&script_tokens, &ctx)),
            MatchStrategy::Windowed => None,
        };

        let (mut segments, sources) = {
            let mut resolver: Box<dyn TimingResolver + '_> = match alignment.as_ref() {
                Some(alignment) => Box::new(GlobalAlignmentResolver::new(alignment, ctx.words)),
                None => Box::new(WindowedResolver::new(
                    &ctx,
                    self.config.window.clone(),
                    self.config.scoring.fuzzy_ratio,
                )),
            };
            self.resolve_chunks(&chunks, &script_tokens, &ctx, resolver.as_mut())
        };

        repair_overlaps(
            &mut segments,
            self.config.min_gap_secs,
            self.config.min_duration_secs,
        );

        Ok(AlignmentOutput {
            segments,
            sources,
            alignment,
            script_tokens,
            synthetic_timing: false,
        })
    }

    fn global_alignment(&self, script_tokens: &[ScriptToken], ctx: &TimingContext<'_>) -> Alignment {
        let script_norm: Vec<String> = script_tokens.iter().map(|t| t.normalized.clone()).collect();
        let alignment = align_normalized(&script_norm, &ctx.normalized, &self.config.scoring);
        let Some(ratio) = alignment.aligned_ratio(script_tokens) else {
            return alignment;
        };
        if ratio < self.config.low_confidence_ratio {
            tracing::warn!(
                aligned = alignment.aligned_count(),
                total = alignment.len(),
                ratio = format!("{ratio:.3}"),
                "low alignment confidence; many chunks will use estimated timing"
            );
        } else {
            tracing::debug!(
                aligned = alignment.aligned_count(),
                total = alignment.len(),
                ratio = format!("{ratio:.3}"),
                "global alignment ratio"
            );
        }
        alignment
    }

    /// Walk the ladder per chunk: empty-chunk placeholder, resolver,
    /// proportional estimate.
    fn resolve_chunks(
        &self,
        chunks: &[Chunk],
        script_tokens: &[ScriptToken],
        ctx: &TimingContext<'_>,
        resolver: &mut dyn TimingResolver,
    ) -> (Vec<SubtitleSegment>, Vec<TimingSource>) {
        let mut segments: Vec<SubtitleSegment> = Vec::with_capacity(chunks.len());
        let mut sources = Vec::with_capacity(chunks.len());
        let mut cursor = AsrCursor::default();

        for (chunk_idx, chunk) in chunks.iter().enumerate() {
            let (span, source) = if is_empty_chunk(chunk, script_tokens) {
                let prev_end = segments.last().map(|segment| segment.end);
                (
                    empty_chunk_span(prev_end, self.config.empty_chunk_duration_secs),
                    TimingSource::EmptyChunk,
                )
            } else if let Some(span) = resolver.resolve(chunk, &mut cursor) {
                (span, resolver.source())
            } else {
                let prev_end = segments.last().map(|segment| segment.end);
                (
                    proportional_estimate(
                        ctx,
                        chunk.char_len(),
                        &mut cursor,
                        resolver.next_anchor(chunk),
                        prev_end,
                    ),
                    TimingSource::Proportional,
                )
            };

            tracing::debug!(
                chunk = chunk_idx,
                source = source.as_str(),
                start = span.start,
                end = span.end,
                cursor = cursor.position,
                "chunk timed"
            );
            segments.push(SubtitleSegment {
                text: chunk.text.clone(),
                start: span.start,
                end: span.end,
            });
            sources.push(source);
            cursor.advance(chunk);
        }

        (segments, sources)
    }

    fn distribute_evenly(
        &self,
        chunks: Vec<Chunk>,
        script_tokens: Vec<ScriptToken>,
        total_duration: Option<f64>,
    ) -> Result<AlignmentOutput, AlignmentError> {
        let total_duration = total_duration.ok_or(AlignmentError::NoTimingSource)?;
        if !total_duration.is_finite() || total_duration < 0.0 {
            return Err(AlignmentError::invalid_input(format!(
                "total duration must be a non-negative number of seconds, got {total_duration}"
            )));
        }
        tracing::warn!(
            chunks = chunks.len(),
            total_duration,
            "no ASR words; distributing subtitle timing evenly"
        );

        let spans = even_distribution(chunks.len(), total_duration);
        let mut segments: Vec<SubtitleSegment> = chunks
            .into_iter()
            .zip(spans)
            .map(|(chunk, span)| SubtitleSegment {
                text: chunk.text,
                start: span.start,
                end: span.end,
            })
            .collect();
        repair_overlaps(
            &mut segments,
            self.config.min_gap_secs,
            self.config.min_duration_secs,
        );

        Ok(AlignmentOutput {
            sources: vec![TimingSource::EvenDistribution; segments.len()],
            segments,
            alignment: None,
            script_tokens,
            synthetic_timing: true,
        })
    }
}

fn is_empty_chunk(chunk: &Chunk, script_tokens: &[ScriptToken]) -> bool {
    script_tokens
        .get(chunk.token_range())
        .map_or(true, |tokens| tokens.iter().all(|t| t.normalized.is_empty()))
}
