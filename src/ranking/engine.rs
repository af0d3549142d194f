use super::cancel::CancelToken;
use super::error::RankError;
use super::scorer::Scorer;
use crate::entity::{CandidatesInfo, Entity, EntityContext, EntityScore};

/// Ranks a candidate set with a pluggable scorer.
///
/// Both operations score each candidate exactly once per pass, in input
/// order, on the calling thread.
#[derive(Debug, Clone)]
pub struct RankingEngine<S> {
    scorer: S,
}

impl<S: Scorer> RankingEngine<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Return the best candidate and its score.
    ///
    /// The first successful call on a `CandidatesInfo` injects the candidate
    /// list into `context`, scores every candidate and memoizes the winner;
    /// later calls return the memoized pair without touching the scorer or
    /// the context. Ties go to the earliest candidate.
    pub fn highest_ranked_entity(
        &self,
        candidates: &CandidatesInfo,
        context: &mut EntityContext,
        surface_form: &str,
        length: usize,
    ) -> Result<EntityScore, RankError> {
        if let Some(best) = candidates.max_score() {
            tracing::trace!(surface_form, "top-1 cache hit");
            return Ok(best.clone());
        }

        let best = candidates.get_or_try_init_max_score(|| {
            if candidates.is_empty() {
                return Err(RankError::EmptyCandidates);
            }
            context.set_entities_for_scoring(candidates.shared_entities());

            let mut best_index = 0;
            let mut best_score = f64::NEG_INFINITY;
            for (i, entity) in candidates.entities().iter().enumerate() {
                let s = score_one(&self.scorer, entity, candidates, context, surface_form, length)?;
                if i == 0 || s > best_score {
                    best_score = s;
                    best_index = i;
                }
            }

            let winner = &candidates.entities()[best_index];
            tracing::debug!(
                surface_form,
                candidates = candidates.len(),
                winner = %winner.id,
                score = best_score,
                "top-1 pass complete"
            );
            Ok(EntityScore::new(winner.clone(), best_score))
        })?;

        Ok(best.clone())
    }

    /// Return up to `k` candidates in descending score order.
    ///
    /// Always runs a full scoring pass; the top-1 cache is neither read nor
    /// written. `k` larger than the candidate count is clamped. Equal scores
    /// keep their input order.
    pub fn top_k_entities(
        &self,
        candidates: &CandidatesInfo,
        context: &mut EntityContext,
        surface_form: &str,
        length: usize,
        k: usize,
    ) -> Result<Vec<EntityScore>, RankError> {
        self.score_and_select(candidates, context, surface_form, length, k, None)
    }

    /// Like [`top_k_entities`](Self::top_k_entities), but polls `cancel`
    /// before each candidate. A cancelled call returns
    /// [`RankError::Cancelled`] and no results.
    pub fn top_k_entities_with_cancel(
        &self,
        candidates: &CandidatesInfo,
        context: &mut EntityContext,
        surface_form: &str,
        length: usize,
        k: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<EntityScore>, RankError> {
        self.score_and_select(candidates, context, surface_form, length, k, Some(cancel))
    }

    fn score_and_select(
        &self,
        candidates: &CandidatesInfo,
        context: &mut EntityContext,
        surface_form: &str,
        length: usize,
        k: usize,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<EntityScore>, RankError> {
        context.set_entities_for_scoring(candidates.shared_entities());

        let mut scores = Vec::with_capacity(candidates.len());
        for entity in candidates.entities() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                tracing::debug!(surface_form, scored = scores.len(), "top-k cancelled");
                return Err(RankError::Cancelled);
            }
            scores.push(score_one(&self.scorer, entity, candidates, context, surface_form, length)?);
        }

        let top = select_top_k(candidates.entities(), &scores, k);
        tracing::debug!(
            surface_form,
            candidates = candidates.len(),
            returned = top.len(),
            "top-k pass complete"
        );
        Ok(top)
    }
}

/// Score a single entity, rejecting NaN.
pub(crate) fn score_one<S: Scorer + ?Sized>(
    scorer: &S,
    entity: &Entity,
    candidates: &CandidatesInfo,
    context: &EntityContext,
    surface_form: &str,
    length: usize,
) -> Result<f64, RankError> {
    let score = scorer
        .score(entity, candidates, context, surface_form, length)
        .map_err(RankError::Scorer)?;
    if score.is_nan() {
        return Err(RankError::InvalidScore {
            entity_id: entity.id.clone(),
            score,
        });
    }
    tracing::trace!(entity = %entity.id, score, "scored candidate");
    Ok(score)
}

/// Indices of `scores` ordered by descending score; equal scores keep index order.
pub(crate) fn rank_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// Materialize the first `min(k, n)` entries of the ranking.
pub(crate) fn select_top_k(entities: &[Entity], scores: &[f64], k: usize) -> Vec<EntityScore> {
    debug_assert_eq!(entities.len(), scores.len());
    rank_order(scores)
        .into_iter()
        .take(k)
        .map(|i| EntityScore::new(entities[i].clone(), scores[i]))
        .collect()
}
