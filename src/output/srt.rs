//! SRT serialization of subtitle segments.

use std::fmt::Write as _;

use crate::types::SubtitleSegment;

/// `HH:MM:SS,mmm`, rounded to the nearest millisecond. Negative input
/// clamps to zero.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Inverse of [`format_timestamp`]; `None` on malformed input.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let (clock, millis) = value.trim().split_once(',')?;
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let secs: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let millis: u64 = millis.parse().ok()?;
    Some((hours * 3600 + minutes * 60 + secs) as f64 + millis as f64 / 1000.0)
}

pub fn to_srt(segments: &[SubtitleSegment]) -> String {
    let mut out = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text
        );
    }
    out
}

/// Lenient parser: blocks without a valid timestamp line are skipped and
/// multi-line cue text is joined with spaces.
pub fn parse_srt(content: &str) -> Vec<SubtitleSegment> {
    let normalized = content.replace("\r\n", "\n");
    let mut segments = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in normalized.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line.trim());
            continue;
        }
        if let Some(segment) = parse_block(&block) {
            segments.push(segment);
        }
        block.clear();
    }
    segments
}

fn parse_block(lines: &[&str]) -> Option<SubtitleSegment> {
    if lines.len() < 3 {
        return None;
    }
    let (start, end) = lines[1].split_once("-->")?;
    Some(SubtitleSegment {
        start: parse_timestamp(start)?,
        end: parse_timestamp(end)?,
        text: lines[2..].join(" "),
    })
}
