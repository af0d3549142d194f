//! Candidate entity ranking for entity linking.
//!
//! A [`RankingEngine`] scores every candidate of a surface form with a
//! pluggable [`Scorer`] and returns either the best candidate (memoized per
//! [`CandidatesInfo`]) or the top-k in descending score order. The
//! [`ParallelRanker`] does the same on a bounded worker pool with
//! cooperative cancellation.

pub mod config;
pub mod entity;
pub mod output;
pub mod ranking;
pub mod scoring;

pub use entity::{CandidatesInfo, Entity, EntityContext, EntityScore};
pub use ranking::{CancelToken, ParallelRanker, RankError, RankingEngine, Scorer};
