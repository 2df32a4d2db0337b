use crate::types::SubtitleSegment;

/// Left-to-right invariant restorer. Never moves a `start`.
///
/// Segments shorter than `min_duration` are first stretched to it; then any
/// segment running into its successor is cut back to
/// `max(start + min_duration, next.start - min_gap)`. Running it twice
/// changes nothing.
pub fn repair_overlaps(segments: &mut [SubtitleSegment], min_gap: f64, min_duration: f64) {
    for segment in segments.iter_mut() {
        if segment.end < segment.start + min_duration {
            segment.end = segment.start + min_duration;
        }
    }

    for i in 0..segments.len().saturating_sub(1) {
        let next_start = segments[i + 1].start;
        let segment = &mut segments[i];
        if segment.end > next_start {
            let clamped = (segment.start + min_duration).max(next_start - min_gap);
            tracing::debug!(
                index = i,
                end = segment.end,
                next_start,
                clamped,
                "overlap repair: clamped segment end"
            );
            segment.end = clamped;
        }
    }
}
