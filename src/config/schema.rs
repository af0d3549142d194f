use serde::{Deserialize, Serialize};

use crate::ranking::DEFAULT_WORKERS;
use crate::scoring::ScoringConfig;

const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub ranking: Option<RankingConfig>,
}

/// Engine settings used by the CLI.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RankingConfig {
    /// Results returned by `top` when `-k` is not given (default: 5)
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Concurrent scoring tasks for `top --parallel` (default: 4)
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Config {
    /// Scoring section, or the built-in defaults when absent
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn top_k(&self) -> usize {
        self.ranking
            .as_ref()
            .and_then(|r| r.top_k)
            .unwrap_or(DEFAULT_TOP_K)
    }

    pub fn workers(&self) -> usize {
        self.ranking
            .as_ref()
            .and_then(|r| r.workers)
            .unwrap_or(DEFAULT_WORKERS)
    }
}
