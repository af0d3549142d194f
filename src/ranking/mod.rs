pub mod cancel;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod scorer;

pub use cancel::CancelToken;
pub use engine::RankingEngine;
pub use error::RankError;
pub use parallel::{ParallelRanker, DEFAULT_WORKERS};
pub use scorer::Scorer;
