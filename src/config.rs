use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

/// Which matcher resolves chunk timings before the proportional fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// One Needleman-Wunsch pass over the whole script.
    #[default]
    Global,
    /// Incremental lookahead matching from the last matched ASR word.
    Windowed,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Windowed => "windowed",
        }
    }
}

/// Needleman-Wunsch scoring. The values are empirical; keep them unless
/// you are prepared to re-tune against real transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_penalty: i32,
    /// Fuzzy acceptance: `distance <= max_len * fuzzy_ratio`.
    pub fuzzy_ratio: f64,
}

impl ScoringConfig {
    pub const MATCH_SCORE: i32 = 10;
    pub const MISMATCH_PENALTY: i32 = -5;
    pub const GAP_PENALTY: i32 = -3;
    pub const FUZZY_RATIO: f64 = 0.3;
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: Self::MATCH_SCORE,
            mismatch_penalty: Self::MISMATCH_PENALTY,
            gap_penalty: Self::GAP_PENALTY,
            fuzzy_ratio: Self::FUZZY_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Number of ASR words searched after the cursor floor.
    pub lookahead_words: usize,
    /// Leading chunk words tried before giving up on the chunk.
    pub candidate_words: usize,
    /// Absolute floor of the fuzzy distance threshold.
    pub min_fuzzy_distance: usize,
}

impl WindowConfig {
    pub const LOOKAHEAD_WORDS: usize = 20;
    pub const CANDIDATE_WORDS: usize = 5;
    pub const MIN_FUZZY_DISTANCE: usize = 2;
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookahead_words: Self::LOOKAHEAD_WORDS,
            candidate_words: Self::CANDIDATE_WORDS,
            min_fuzzy_distance: Self::MIN_FUZZY_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    pub max_chars: usize,
    pub min_gap_secs: f64,
    pub min_duration_secs: f64,
    pub empty_chunk_duration_secs: f64,
    /// Aligned/total script word ratio under which a warning is logged.
    pub low_confidence_ratio: f64,
    pub strategy: MatchStrategy,
    pub scoring: ScoringConfig,
    pub window: WindowConfig,
}

impl AlignerConfig {
    pub const DEFAULT_MAX_CHARS: usize = 60;
    pub const DEFAULT_MIN_GAP_SECS: f64 = 0.05;
    pub const DEFAULT_MIN_DURATION_SECS: f64 = 0.1;
    pub const DEFAULT_EMPTY_CHUNK_DURATION_SECS: f64 = 1.0;
    pub const DEFAULT_LOW_CONFIDENCE_RATIO: f64 = 0.5;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", path, e))?;
        let config: Self = serde_json::from_str(&data).map_err(|e| AlignmentError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.max_chars == 0 {
            return Err(AlignmentError::invalid_config("max_chars must be >= 1"));
        }
        if !(self.min_gap_secs >= 0.0 && self.min_duration_secs >= 0.0) {
            return Err(AlignmentError::invalid_config(
                "min_gap_secs and min_duration_secs must be non-negative",
            ));
        }
        if !(self.scoring.fuzzy_ratio >= 0.0) {
            return Err(AlignmentError::invalid_config(
                "scoring.fuzzy_ratio must be non-negative",
            ));
        }
        Ok(())
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            max_chars: Self::DEFAULT_MAX_CHARS,
            min_gap_secs: Self::DEFAULT_MIN_GAP_SECS,
            min_duration_secs: Self::DEFAULT_MIN_DURATION_SECS,
            empty_chunk_duration_secs: Self::DEFAULT_EMPTY_CHUNK_DURATION_SECS,
            low_confidence_ratio: Self::DEFAULT_LOW_CONFIDENCE_RATIO,
            strategy: MatchStrategy::default(),
            scoring: ScoringConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligner_config_default() {
        let config = AlignerConfig::default();
        assert_eq!(config.max_chars, 60);
        assert!((config.min_gap_secs - 0.05).abs() < 1e-12);
        assert!((config.min_duration_secs - 0.1).abs() < 1e-12);
        assert_eq!(config.strategy, MatchStrategy::Global);
        assert_eq!(config.scoring.match_score, 10);
        assert_eq!(config.scoring.mismatch_penalty, -5);
        assert_eq!(config.scoring.gap_penalty, -3);
        assert_eq!(config.window.lookahead_words, 20);
        assert_eq!(config.window.candidate_words, 5);
        assert_eq!(config.window.min_fuzzy_distance, 2);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let json = r#"{ "max_chars": 42, "strategy": "windowed", "scoring": { "gap_penalty": -4 } }"#;
        let config: AlignerConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.max_chars, 42);
        assert_eq!(config.strategy, MatchStrategy::Windowed);
        assert_eq!(config.scoring.gap_penalty, -4);
        assert_eq!(config.scoring.match_score, 10);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn load_reads_file_and_rejects_zero_width() {
        let temp_dir = std::env::temp_dir();
        let good = temp_dir.join("subtitle_align_config_good.json");
        let bad = temp_dir.join("subtitle_align_config_bad.json");
        std::fs::write(&good, r#"{ "max_chars": 30 }"#).expect("write config");
        std::fs::write(&bad, r#"{ "max_chars": 0 }"#).expect("write config");

        assert_eq!(AlignerConfig::load(&good).unwrap().max_chars, 30);
        assert!(matches!(
            AlignerConfig::load(&bad),
            Err(AlignmentError::InvalidConfig { .. })
        ));
        assert!(matches!(
            AlignerConfig::load(&temp_dir.join("subtitle_align_missing.json")),
            Err(AlignmentError::Io { .. })
        ));

        let _ = std::fs::remove_file(&good);
        let _ = std::fs::remove_file(&bad);
    }
}
