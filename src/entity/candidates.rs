use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::types::{Entity, EntityScore};

/// The candidate set for one surface form.
///
/// The entity list is fixed at construction. The best-scored result is
/// memoized in a write-once slot: the first successful top-1 pass fills it
/// and every later call observes that value.
#[derive(Debug)]
pub struct CandidatesInfo {
    entities: Arc<[Entity]>,
    max_score: OnceLock<EntityScore>,
    // Serializes the scoring pass that fills `max_score`.
    init: Mutex<()>,
}

impl CandidatesInfo {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self::from_shared(entities.into())
    }

    /// Build from an already shared entity list (no copy)
    pub fn from_shared(entities: Arc<[Entity]>) -> Self {
        Self {
            entities,
            max_score: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Cheap handle to the entity list, used for context injection
    pub fn shared_entities(&self) -> Arc<[Entity]> {
        Arc::clone(&self.entities)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The memoized best result, if a top-1 pass has completed
    pub fn max_score(&self) -> Option<&EntityScore> {
        self.max_score.get()
    }

    /// Return the memoized best result, running `compute` to fill it if empty.
    ///
    /// Concurrent callers are serialized: exactly one runs `compute`, the
    /// others wait and then return its value. If `compute` fails the slot
    /// stays empty and the error is returned to that caller.
    pub(crate) fn get_or_try_init_max_score<E, F>(&self, compute: F) -> Result<&EntityScore, E>
    where
        F: FnOnce() -> Result<EntityScore, E>,
    {
        if let Some(best) = self.max_score.get() {
            return Ok(best);
        }

        // The guarded data is `()`, so a poisoned lock carries no broken state.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(best) = self.max_score.get() {
            return Ok(best);
        }

        let best = compute()?;
        Ok(self.max_score.get_or_init(|| best))
    }
}

impl From<Vec<Entity>> for CandidatesInfo {
    fn from(entities: Vec<Entity>) -> Self {
        Self::new(entities)
    }
}
