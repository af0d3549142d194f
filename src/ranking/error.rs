use std::fmt;

/// Failure of a ranking call.
#[derive(Debug)]
pub enum RankError {
    /// The call was cancelled before every candidate was scored
    Cancelled,
    /// Top-1 was requested for an empty candidate set
    EmptyCandidates,
    /// The scorer failed; the error is passed through as-is
    Scorer(anyhow::Error),
    /// The scorer returned NaN
    InvalidScore { entity_id: String, score: f64 },
    /// A pool worker panicked or was aborted
    WorkerFailed(String),
}

impl RankError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RankError::Cancelled)
    }
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankError::Cancelled => write!(f, "Ranking cancelled"),
            RankError::EmptyCandidates => write!(f, "No candidates to rank"),
            RankError::Scorer(e) => write!(f, "{}", e),
            RankError::InvalidScore { entity_id, score } => {
                write!(f, "Scorer returned {} for entity {}", score, entity_id)
            }
            RankError::WorkerFailed(msg) => write!(f, "Scoring worker failed: {}", msg),
        }
    }
}

impl std::error::Error for RankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RankError::Scorer(e) => Some(&**e),
            _ => None,
        }
    }
}
