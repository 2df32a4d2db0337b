use std::path::Path;

use crate::config::{AlignerConfig, MatchStrategy, ScoringConfig, WindowConfig};
use crate::error::AlignmentError;
use crate::pipeline::runtime::SubtitleAligner;

pub struct SubtitleAlignerBuilder {
    config: AlignerConfig,
}

impl SubtitleAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, AlignmentError> {
        Ok(Self::new(AlignerConfig::load(path)?))
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.config.max_chars = max_chars;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.config.window = window;
        self
    }

    pub fn build(self) -> Result<SubtitleAligner, AlignmentError> {
        self.config.validate()?;
        Ok(SubtitleAligner::from_config(self.config))
    }
}

impl Default for SubtitleAlignerBuilder {
    fn default() -> Self {
        Self::new(AlignerConfig::default())
    }
}
