use serde::{Deserialize, Serialize};

/// One word reported by the speech recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrWord {
    #[serde(alias = "text")]
    pub word: String,
    /// Seconds from audio start.
    pub start: f64,
    /// Seconds from audio start.
    pub end: f64,
}

impl AsrWord {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// A word of the trusted script, surface form plus comparison form.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptToken {
    pub surface: String,
    pub normalized: String,
}

/// A display-sized run of script tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    /// Index of the chunk's first token in the script token sequence.
    pub start_token: usize,
    pub token_count: usize,
}

impl Chunk {
    pub fn token_range(&self) -> std::ops::Range<usize> {
        self.start_token..self.start_token + self.token_count
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    /// Character length, the unit `max_chars` is measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Script-token-indexed mapping onto ASR word indices.
///
/// Defined entries are weakly increasing with the script index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Alignment {
    pub indices: Vec<Option<usize>>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, script_idx: usize) -> Option<usize> {
        self.indices.get(script_idx).copied().flatten()
    }

    pub fn aligned_count(&self) -> usize {
        self.indices.iter().filter(|idx| idx.is_some()).count()
    }

    /// Aligned share of the tokens that can align at all. Tokens that
    /// normalize to nothing never align and are left out; `None` when no
    /// token is comparable.
    pub fn aligned_ratio(&self, script_tokens: &[ScriptToken]) -> Option<f64> {
        let comparable = script_tokens
            .iter()
            .filter(|token| !token.normalized.is_empty())
            .count();
        if comparable == 0 {
            return None;
        }
        Some(self.aligned_count() as f64 / comparable as f64)
    }

    /// Smallest and largest ASR index aligned within `range` of script tokens.
    pub fn span(&self, range: std::ops::Range<usize>) -> Option<(usize, usize)> {
        let end = range.end.min(self.indices.len());
        let start = range.start.min(end);
        self.indices[start..end]
            .iter()
            .flatten()
            .fold(None, |acc, &idx| match acc {
                None => Some((idx, idx)),
                Some((lo, hi)) => Some((lo.min(idx), hi.max(idx))),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Which rung of the fallback ladder produced a segment's timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingSource {
    GlobalAlignment,
    WindowedMatch,
    Proportional,
    EvenDistribution,
    EmptyChunk,
}

impl TimingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlobalAlignment => "global_alignment",
            Self::WindowedMatch => "windowed_match",
            Self::Proportional => "proportional",
            Self::EvenDistribution => "even_distribution",
            Self::EmptyChunk => "empty_chunk",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub script: String,
    pub words: Vec<AsrWord>,
    /// Audio length in seconds, needed only when `words` is empty.
    pub total_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutput {
    pub segments: Vec<SubtitleSegment>,
    /// Parallel to `segments`.
    pub sources: Vec<TimingSource>,
    /// Present when the global aligner ran.
    pub alignment: Option<Alignment>,
    pub script_tokens: Vec<ScriptToken>,
    /// Every segment was timed by even distribution; no ASR evidence was used.
    pub synthetic_timing: bool,
}

impl AlignmentOutput {
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
            sources: Vec::new(),
            alignment: None,
            script_tokens: Vec::new(),
            synthetic_timing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_span_ignores_gaps_and_clamps_range() {
        let alignment = Alignment {
            indices: vec![Some(0), None, Some(1), Some(3)],
        };
        assert_eq!(alignment.span(0..3), Some((0, 1)));
        assert_eq!(alignment.span(1..2), None);
        assert_eq!(alignment.span(2..10), Some((1, 3)));
        assert_eq!(alignment.span(8..10), None);
        assert_eq!(alignment.aligned_count(), 3);
    }

    #[test]
    fn aligned_ratio_skips_punctuation_tokens() {
        let tokens: Vec<ScriptToken> = ["wait", "--", "what", "now"]
            .iter()
            .map(|surface| ScriptToken {
                surface: surface.to_string(),
                normalized: surface.trim_matches('-').to_string(),
            })
            .collect();
        let alignment = Alignment {
            indices: vec![Some(0), None, Some(1), None],
        };
        let ratio = alignment.aligned_ratio(&tokens).unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(alignment.aligned_ratio(&tokens[1..2]), None);
    }

    #[test]
    fn asr_word_accepts_text_alias() {
        let word: AsrWord =
            serde_json::from_str(r#"{"text": "hi", "start": 0.5, "end": 0.75}"#).unwrap();
        assert_eq!(word, AsrWord::new("hi", 0.5, 0.75));
    }
}
