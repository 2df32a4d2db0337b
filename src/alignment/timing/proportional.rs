use super::{AsrCursor, TimingContext};
use crate::types::TimeSpan;

/// Index of the ASR word in `[from, end)` whose start is closest to
/// `target_time`, scanning forward.
///
/// The scan stops at the first strict increase in distance. That assumes the
/// distance curve is unimodal past `from`; disfluent or non-monotonic ASR
/// timing can end the scan early. The fallback is best-effort and keeps this
/// approximation.
pub fn closest_start_index(ctx: &TimingContext<'_>, from: usize, end: usize, target_time: f64) -> usize {
    let end = end.clamp(1, ctx.words.len());
    let mut closest = from.min(end - 1);
    let mut min_diff = (ctx.words[closest].start - target_time).abs();

    for (idx, word) in ctx.words.iter().enumerate().take(end).skip(closest + 1) {
        let diff = (word.start - target_time).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = idx;
        } else if diff > min_diff {
            break;
        }
    }
    closest
}

/// Place a chunk by its character progress through the script.
///
/// `next_anchor` is the first ASR index already claimed by a later chunk;
/// the scan never reaches it and the end is capped at its start. When no
/// word is left before the anchor, the chunk follows `prev_end` instead.
/// Advances `cursor.position` past the chosen ASR word.
pub fn proportional_estimate(
    ctx: &TimingContext<'_>,
    chunk_chars: usize,
    cursor: &mut AsrCursor,
    next_anchor: Option<usize>,
    prev_end: Option<f64>,
) -> TimeSpan {
    let limit = next_anchor.map_or(ctx.words.len(), |anchor| anchor.min(ctx.words.len()));
    let cap = next_anchor
        .and_then(|anchor| ctx.words.get(anchor))
        .map(|word| word.start);
    let capped_end = |start: f64| {
        let end = ctx.proportional_end(start, chunk_chars);
        cap.map_or(end, |cap| end.min(cap))
    };

    if next_anchor.is_some() && cursor.position >= limit {
        let start = prev_end.unwrap_or(0.0);
        tracing::debug!(
            start,
            next_anchor,
            "proportional: no free ASR word before next anchor; following previous chunk"
        );
        return TimeSpan::new(start, capped_end(start));
    }

    let progress = if ctx.total_chars == 0 {
        0.0
    } else {
        cursor.chars_processed as f64 / ctx.total_chars as f64
    };
    let target_time = ctx.first_start + progress * ctx.total_duration;
    let closest = closest_start_index(ctx, cursor.position, limit, target_time);
    let start = ctx.words[closest].start;
    cursor.position = closest + 1;

    tracing::debug!(
        progress = format!("{progress:.3}"),
        target_time = format!("{target_time:.3}"),
        closest,
        "proportional: estimated chunk start"
    );
    TimeSpan::new(start, capped_end(start))
}
