pub mod config;
pub mod engine;
pub mod factors;
pub mod validation;

pub use config::*;
pub use engine::{FactorContribution, FactorScorer, ScoreBreakdown, ScoreResult};
pub use factors::{Effect, RangeOp};
pub use validation::validate_scoring;
