//! Slide boundaries matched against timed subtitle text.

use std::fmt::Write as _;

use serde::Serialize;

use crate::alignment::global::align_normalized;
use crate::alignment::normalization::normalize_word;
use crate::config::ScoringConfig;
use crate::error::AlignmentError;
use crate::types::{AsrWord, SubtitleSegment};

/// Span given to the last slide when there are no subtitles to end it.
const LAST_SLIDE_DEFAULT_SECS: f64 = 10.0;
/// Estimated speaking time per word for slides the aligner could not place.
const SECS_PER_UNALIGNED_WORD: f64 = 0.3;
const EMPTY_SLIDE_SECS: f64 = 1.0;
/// Tail padding so the final slide does not cut off abruptly.
const LAST_SLIDE_PADDING_SECS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct SlideBoundary {
    pub name: String,
    pub start: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideText {
    pub slide: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub word_count: usize,
}

/// `name seconds` per line; blank and single-field lines are ignored.
pub fn parse_slide_timestamps(content: &str) -> Result<Vec<SlideBoundary>, AlignmentError> {
    let mut slides = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(start)) = (parts.next(), parts.next()) else {
            continue;
        };
        let start: f64 = start.parse().map_err(|_| {
            AlignmentError::invalid_input(format!(
                "slide timestamp line {}: '{start}' is not a number",
                line_no + 1
            ))
        })?;
        slides.push(SlideBoundary {
            name: name.to_string(),
            start,
        });
    }
    Ok(slides)
}

/// Collect, for every slide, the text of the subtitles overlapping it.
///
/// Slide `i` runs until slide `i + 1` starts; the last slide runs to the
/// end of the last subtitle.
pub fn match_slides_to_segments(slides: &[SlideBoundary], segments: &[SubtitleSegment]) -> Vec<SlideText> {
    slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| {
            let end = match slides.get(idx + 1) {
                Some(next) => next.start,
                None => segments
                    .last()
                    .map_or(slide.start + LAST_SLIDE_DEFAULT_SECS, |segment| segment.end),
            };
            let text = segments
                .iter()
                .filter(|segment| segment.start < end && segment.end > slide.start)
                .map(|segment| segment.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            SlideText {
                slide: slide.name.clone(),
                start: slide.start,
                end,
                word_count: text.split_whitespace().count(),
                text,
            }
        })
        .collect()
}

/// `name|start-end|text` lines with two-decimal times.
pub fn format_slides_with_text(slides: &[SlideText]) -> String {
    let mut out = String::new();
    for slide in slides {
        let _ = writeln!(
            out,
            "{}|{:.2}-{:.2}|{}",
            slide.slide, slide.start, slide.end, slide.text
        );
    }
    out
}

/// Reads the `name|start-end|text` format. The time field is kept when it
/// parses and zeroed otherwise, since re-timing replaces it anyway.
pub fn parse_slides_with_text(content: &str) -> Vec<SlideText> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.trim().splitn(3, '|');
            let (name, times, text) = (parts.next()?, parts.next()?, parts.next()?);
            let (start, end) = times
                .split_once('-')
                .and_then(|(s, e)| Some((s.parse().ok()?, e.parse().ok()?)))
                .unwrap_or((0.0, 0.0));
            Some(SlideText {
                slide: name.to_string(),
                start,
                end,
                word_count: text.split_whitespace().count(),
                text: text.to_string(),
            })
        })
        .collect()
}

/// Re-time slides against the ASR words of newly synthesized audio.
///
/// All slide texts are aligned in one global pass; each slide then takes
/// the span of its aligned words. Empty slides get a short placeholder
/// after the previous slide, unaligned ones an estimate from their word
/// count.
pub fn retime_slides(slides: &[SlideText], words: &[AsrWord], scoring: &ScoringConfig) -> Vec<SlideText> {
    let script_norm: Vec<String> = slides
        .iter()
        .flat_map(|slide| slide.text.split_whitespace())
        .map(normalize_word)
        .collect();
    let asr_norm: Vec<String> = words.iter().map(|w| normalize_word(&w.word)).collect();
    let alignment = align_normalized(&script_norm, &asr_norm, scoring);
    tracing::info!(
        aligned = alignment.aligned_count(),
        total = alignment.len(),
        "slides: aligned slide text to new audio"
    );

    let mut out: Vec<SlideText> = Vec::with_capacity(slides.len());
    let mut word_idx = 0usize;
    for slide in slides {
        let prev_end = out.last().map_or(0.0, |s| s.end);
        let word_count = slide.text.split_whitespace().count();
        let (start, end) = if word_count == 0 {
            (prev_end, prev_end + EMPTY_SLIDE_SECS)
        } else {
            match alignment.span(word_idx..word_idx + word_count) {
                Some((first, last)) => (words[first].start, words[last].end),
                None => (
                    prev_end,
                    prev_end + word_count as f64 * SECS_PER_UNALIGNED_WORD,
                ),
            }
        };
        word_idx += word_count;
        out.push(SlideText {
            slide: slide.slide.clone(),
            start,
            end,
            text: slide.text.clone(),
            word_count,
        });
    }

    if let Some(last) = out.last_mut() {
        last.end += LAST_SLIDE_PADDING_SECS;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(name: &str, start: f64) -> SlideBoundary {
        SlideBoundary {
            name: name.to_string(),
            start,
        }
    }

    fn seg(text: &str, start: f64, end: f64) -> SubtitleSegment {
        SubtitleSegment {
            text: text.to_string(),
            start,
            end,
        }
    }

    fn slide(name: &str, text: &str) -> SlideText {
        SlideText {
            slide: name.to_string(),
            start: 0.0,
            end: 0.0,
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
        }
    }

    #[test]
    fn parses_timestamp_lines() {
        let slides = parse_slide_timestamps("slide_001.png 0.0\n\nslide_002.png 17.5 extra\nlonely\n")
            .unwrap();
        assert_eq!(slides, vec![boundary("slide_001.png", 0.0), boundary("slide_002.png", 17.5)]);
        assert!(parse_slide_timestamps("slide.png soon").is_err());
    }

    #[test]
    fn slides_collect_overlapping_segments() {
        let slides = vec![boundary("a.png", 0.0), boundary("b.png", 2.0)];
        let segments = vec![
            seg("one two", 0.0, 1.0),
            seg("three", 1.5, 2.5),
            seg("four five six", 3.0, 4.0),
        ];
        let matched = match_slides_to_segments(&slides, &segments);
        assert_eq!(matched[0].text, "one two three");
        assert_eq!(matched[0].end, 2.0);
        assert_eq!(matched[0].word_count, 3);
        assert_eq!(matched[1].text, "three four five six");
        assert_eq!(matched[1].end, 4.0);
    }

    #[test]
    fn last_slide_without_segments_gets_default_span() {
        let matched = match_slides_to_segments(&[boundary("only.png", 5.0)], &[]);
        assert_eq!(matched[0].end, 15.0);
        assert_eq!(matched[0].text, "");
        assert_eq!(matched[0].word_count, 0);
    }

    #[test]
    fn slides_with_text_format_round_trip() {
        let slides = vec![SlideText {
            slide: "s1.png".to_string(),
            start: 0.0,
            end: 17.0,
            text: "a|b c".to_string(),
            word_count: 2,
        }];
        let formatted = format_slides_with_text(&slides);
        assert_eq!(formatted, "s1.png|0.00-17.00|a|b c\n");
        assert_eq!(parse_slides_with_text(&formatted), slides);
    }

    #[test]
    fn retime_uses_alignment_and_fallbacks() {
        let slides = vec![
            slide("s1.png", "hello there"),
            slide("s2.png", ""),
            slide("s3.png", "general kenobi"),
            slide("s4.png", "xylophone quartz"),
        ];
        let words = vec![
            AsrWord::new("hello", 0.2, 0.5),
            AsrWord::new("there", 0.5, 0.9),
            AsrWord::new("general", 1.4, 1.8),
            AsrWord::new("kenobi", 1.8, 2.4),
        ];
        let retimed = retime_slides(&slides, &words, &ScoringConfig::default());
        let spans: Vec<(f64, f64)> = retimed.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(spans[0], (0.2, 0.9));
        assert!((spans[1].0 - 0.9).abs() < 1e-9 && (spans[1].1 - 1.9).abs() < 1e-9);
        assert_eq!(spans[2], (1.4, 2.4));
        // unaligned: 2 words * 0.3s after the previous slide, plus final padding
        assert!((retimed[3].start - 2.4).abs() < 1e-9);
        assert!((retimed[3].end - (2.4 + 0.6 + 0.5)).abs() < 1e-9);
    }
}
