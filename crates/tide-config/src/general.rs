//! General pipeline configuration.

use serde::{Deserialize, Serialize};

/// How questions are mapped to topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierStrategy {
    /// Deterministic keyword rules; no network round trip.
    Keyword,
    /// Delegate to the model with a constrained label prompt.
    Model,
}

const fn default_narrative_sample_rows() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Topic classification strategy.
    #[serde(default = "ClassifierStrategy::default")]
    pub classifier: ClassifierStrategy,

    /// Rows of a result projected into the narrative grounding sample.
    #[serde(default = "default_narrative_sample_rows")]
    pub narrative_sample_rows: usize,
}

impl Default for ClassifierStrategy {
    fn default() -> Self {
        Self::Keyword
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierStrategy::default(),
            narrative_sample_rows: default_narrative_sample_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.classifier, ClassifierStrategy::Keyword);
        assert_eq!(config.narrative_sample_rows, 100);
    }

    #[test]
    fn strategy_parses_snake_case() {
        let strategy: ClassifierStrategy = serde_json::from_str(r#""model""#).unwrap();
        assert_eq!(strategy, ClassifierStrategy::Model);
    }
}
