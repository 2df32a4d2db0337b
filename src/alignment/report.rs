use serde::Serialize;

use crate::types::{AlignmentOutput, SubtitleSegment, TimingSource};

const EPS_SEC: f64 = 1e-9;

#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub counts: WordCounts,
    pub sources: SourceCounts,
    pub structural: StructuralMetrics,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub strategy: String,
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WordCounts {
    pub script_words: u32,
    pub aligned_words: u32,
    /// `None` when the global aligner did not run.
    pub aligned_ratio: Option<f32>,
    pub segments: u32,
    /// Segments timed from ASR evidence rather than estimated.
    pub matched_segments: u32,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub global_alignment: u32,
    pub windowed_match: u32,
    pub proportional: u32,
    pub even_distribution: u32,
    pub empty_chunk: u32,
}

impl SourceCounts {
    fn record(&mut self, source: TimingSource) {
        let slot = match source {
            TimingSource::GlobalAlignment => &mut self.global_alignment,
            TimingSource::WindowedMatch => &mut self.windowed_match,
            TimingSource::Proportional => &mut self.proportional,
            TimingSource::EvenDistribution => &mut self.even_distribution,
            TimingSource::EmptyChunk => &mut self.empty_chunk,
        };
        *slot += 1;
    }

    /// Chunks that were placed from ASR evidence rather than estimated.
    pub fn matched(&self) -> u32 {
        self.global_alignment + self.windowed_match
    }
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct StructuralMetrics {
    pub overlap_pair_count: u32,
    pub short_segment_count: u32,
    pub non_monotonic_start_count: u32,
    pub total_gap_secs: f32,
}

pub fn compute_report(
    output: &AlignmentOutput,
    min_duration_secs: f64,
    low_confidence_ratio: f64,
) -> AlignmentReport {
    let mut notes = Vec::new();
    let mut sources = SourceCounts::default();
    for &source in &output.sources {
        sources.record(source);
    }

    let aligned_words = output
        .alignment
        .as_ref()
        .map(|alignment| alignment.aligned_count())
        .unwrap_or(0);
    let aligned_ratio = output
        .alignment
        .as_ref()
        .and_then(|alignment| alignment.aligned_ratio(&output.script_tokens));

    if output.segments.is_empty() {
        notes.push("no_segments".to_string());
    }
    if output.synthetic_timing {
        notes.push("synthetic_timing".to_string());
    }
    if let Some(ratio) = aligned_ratio {
        if ratio < low_confidence_ratio {
            notes.push(format!("low_alignment_confidence={ratio:.3}"));
        }
    }
    if sources.proportional > 0 {
        notes.push(format!("proportional_chunks={}", sources.proportional));
    }

    AlignmentReport {
        schema_version: 1,
        meta: None,
        counts: WordCounts {
            script_words: to_u32(output.script_tokens.len()),
            aligned_words: to_u32(aligned_words),
            aligned_ratio: aligned_ratio.map(|r| r as f32),
            segments: to_u32(output.segments.len()),
            matched_segments: sources.matched(),
        },
        sources,
        structural: compute_structural_metrics(&output.segments, min_duration_secs),
        notes,
    }
}

pub fn compute_structural_metrics(segments: &[SubtitleSegment], min_duration_secs: f64) -> StructuralMetrics {
    let mut metrics = StructuralMetrics::default();
    let mut total_gap = 0.0f64;

    for segment in segments {
        if segment.end - segment.start < min_duration_secs - EPS_SEC {
            metrics.short_segment_count += 1;
        }
    }
    for pair in segments.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.end > next.start + EPS_SEC {
            metrics.overlap_pair_count += 1;
        } else {
            total_gap += next.start - current.end;
        }
        if next.start < current.start {
            metrics.non_monotonic_start_count += 1;
        }
    }
    metrics.total_gap_secs = total_gap as f32;
    metrics
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Alignment, ScriptToken};

    fn segment(start: f64, end: f64) -> SubtitleSegment {
        SubtitleSegment {
            text: "x".to_string(),
            start,
            end,
        }
    }

    fn token(word: &str) -> ScriptToken {
        ScriptToken {
            surface: word.to_string(),
            normalized: word.to_string(),
        }
    }

    #[test]
    fn structural_metrics_count_defects() {
        let segments = vec![
            segment(0.0, 1.2),
            segment(1.0, 1.05),
            segment(0.9, 2.0),
            segment(2.5, 3.0),
        ];
        let metrics = compute_structural_metrics(&segments, 0.1);
        assert_eq!(metrics.overlap_pair_count, 2);
        assert_eq!(metrics.short_segment_count, 1);
        assert_eq!(metrics.non_monotonic_start_count, 1);
        assert!((metrics.total_gap_secs - 0.5).abs() < 1e-6);
    }

    #[test]
    fn report_flags_low_confidence_and_counts_sources() {
        let output = AlignmentOutput {
            segments: vec![segment(0.0, 1.0), segment(1.5, 2.0)],
            sources: vec![TimingSource::GlobalAlignment, TimingSource::Proportional],
            alignment: Some(Alignment {
                indices: vec![Some(0), None, None, None],
            }),
            script_tokens: vec![token("a"), token("b"), token("c"), token("d")],
            synthetic_timing: false,
        };
        let report = compute_report(&output, 0.1, 0.5);
        assert_eq!(report.counts.script_words, 4);
        assert_eq!(report.counts.aligned_words, 1);
        assert_eq!(report.counts.aligned_ratio, Some(0.25));
        assert_eq!(report.sources.global_alignment, 1);
        assert_eq!(report.sources.proportional, 1);
        assert_eq!(report.counts.matched_segments, 1);
        assert!(report
            .notes
            .iter()
            .any(|note| note.starts_with("low_alignment_confidence")));
    }

    #[test]
    fn punctuation_tokens_do_not_lower_confidence() {
        let mut dash = token("");
        dash.surface = "--".to_string();
        let output = AlignmentOutput {
            segments: vec![segment(0.0, 1.0)],
            sources: vec![TimingSource::GlobalAlignment],
            alignment: Some(Alignment {
                indices: vec![Some(0), None, None, None, Some(1)],
            }),
            script_tokens: vec![token("wait"), dash.clone(), dash.clone(), dash, token("what")],
            synthetic_timing: false,
        };
        let report = compute_report(&output, 0.1, 0.5);
        assert_eq!(report.counts.aligned_ratio, Some(1.0));
        assert!(!report
            .notes
            .iter()
            .any(|note| note.starts_with("low_alignment_confidence")));
    }

    #[test]
    fn report_notes_synthetic_and_empty_runs() {
        let mut output = AlignmentOutput::empty();
        let report = compute_report(&output, 0.1, 0.5);
        assert_eq!(report.notes, vec!["no_segments".to_string()]);
        assert_eq!(report.counts.aligned_ratio, None);

        output.segments = vec![segment(0.0, 3.0)];
        output.sources = vec![TimingSource::EvenDistribution];
        output.synthetic_timing = true;
        let report = compute_report(&output, 0.1, 0.5);
        assert!(report.notes.contains(&"synthetic_timing".to_string()));
        assert_eq!(report.sources.even_distribution, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert!(json.get("meta").is_none());
    }
}
