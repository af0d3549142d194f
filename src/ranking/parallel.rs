use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::cancel::CancelToken;
use super::engine::{score_one, select_top_k};
use super::error::RankError;
use super::scorer::Scorer;
use crate::entity::{CandidatesInfo, EntityContext, EntityScore};

/// Default number of candidates scored at the same time
pub const DEFAULT_WORKERS: usize = 4;

/// Top-k ranking with scoring spread over a bounded set of blocking tasks.
///
/// Scores are stored by candidate index, so the result is identical to
/// [`RankingEngine::top_k_entities`](super::RankingEngine::top_k_entities)
/// regardless of the order in which workers finish.
pub struct ParallelRanker<S> {
    scorer: Arc<S>,
    workers: usize,
}

type ScoreTask = JoinHandle<(usize, Result<f64, RankError>)>;

impl<S> ParallelRanker<S>
where
    S: Scorer + Send + Sync + 'static,
{
    pub fn new(scorer: S) -> Self {
        Self::from_shared(Arc::new(scorer))
    }

    pub fn from_shared(scorer: Arc<S>) -> Self {
        Self {
            scorer,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Set the worker bound (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Return up to `k` candidates in descending score order, cancellable.
    ///
    /// The candidate list is injected into `context` before any worker
    /// starts; workers read an immutable snapshot of it. Once `cancel` is set
    /// no further candidates are submitted, running workers finish, and the
    /// call returns [`RankError::Cancelled`] unless every score was already
    /// in. The first scorer failure stops submission the same way and is
    /// returned.
    pub async fn top_k_entities(
        &self,
        candidates: Arc<CandidatesInfo>,
        context: &mut EntityContext,
        surface_form: &str,
        length: usize,
        k: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<EntityScore>, RankError> {
        context.set_entities_for_scoring(candidates.shared_entities());
        let context = Arc::new(context.clone());
        let surface_form: Arc<str> = Arc::from(surface_form);

        let total = candidates.len();
        let mut scores: Vec<Option<f64>> = vec![None; total];
        let mut failure: Option<RankError> = None;
        let mut pending = 0..total;
        let mut in_flight = FuturesUnordered::new();

        // Fill initial batch
        for index in pending.by_ref().take(self.workers) {
            in_flight.push(self.spawn_scoring(index, &candidates, &context, &surface_form, length, cancel));
        }

        // Collect results and feed new tasks
        while let Some(joined) = in_flight.next().await {
            match joined {
                Ok((index, Ok(score))) => scores[index] = Some(score),
                Ok((_, Err(RankError::Cancelled))) => {}
                Ok((_, Err(e))) => {
                    failure.get_or_insert(e);
                }
                Err(e) => {
                    failure.get_or_insert(RankError::WorkerFailed(e.to_string()));
                }
            }

            if failure.is_none() && !cancel.is_cancelled() {
                if let Some(index) = pending.next() {
                    in_flight.push(self.spawn_scoring(
                        index,
                        &candidates,
                        &context,
                        &surface_form,
                        length,
                        cancel,
                    ));
                }
            }
        }

        if let Some(e) = failure {
            tracing::debug!(surface_form = %surface_form, error = %e, "parallel top-k failed");
            return Err(e);
        }

        let scored = scores.iter().filter(|s| s.is_some()).count();
        if scored < total {
            tracing::debug!(surface_form = %surface_form, scored, total, "parallel top-k cancelled");
            return Err(RankError::Cancelled);
        }

        let scores: Vec<f64> = scores.into_iter().flatten().collect();
        let top = select_top_k(candidates.entities(), &scores, k);
        tracing::debug!(
            surface_form = %surface_form,
            candidates = total,
            returned = top.len(),
            workers = self.workers,
            "parallel top-k pass complete"
        );
        Ok(top)
    }

    fn spawn_scoring(
        &self,
        index: usize,
        candidates: &Arc<CandidatesInfo>,
        context: &Arc<EntityContext>,
        surface_form: &Arc<str>,
        length: usize,
        cancel: &CancelToken,
    ) -> ScoreTask {
        let scorer = Arc::clone(&self.scorer);
        let candidates = Arc::clone(candidates);
        let context = Arc::clone(context);
        let surface_form = Arc::clone(surface_form);
        let cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            if cancel.is_cancelled() {
                return (index, Err(RankError::Cancelled));
            }
            let entity = &candidates.entities()[index];
            let result = score_one(
                scorer.as_ref(),
                entity,
                &candidates,
                &context,
                &surface_form,
                length,
            );
            (index, result)
        })
    }
}
