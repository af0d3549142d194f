use crate::entity::{CandidatesInfo, Entity, EntityContext};

/// Scores one entity against one query.
///
/// Implementations must be deterministic for fixed inputs and return a
/// number for every candidate. Higher is better. `surface_form` and `length`
/// are passed through from the caller untouched.
pub trait Scorer {
    fn score(
        &self,
        entity: &Entity,
        candidates: &CandidatesInfo,
        context: &EntityContext,
        surface_form: &str,
        length: usize,
    ) -> anyhow::Result<f64>;
}

impl<F> Scorer for F
where
    F: Fn(&Entity, &CandidatesInfo, &EntityContext, &str, usize) -> anyhow::Result<f64>,
{
    fn score(
        &self,
        entity: &Entity,
        candidates: &CandidatesInfo,
        context: &EntityContext,
        surface_form: &str,
        length: usize,
    ) -> anyhow::Result<f64> {
        self(entity, candidates, context, surface_form, length)
    }
}
