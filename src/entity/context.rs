use std::collections::HashSet;
use std::sync::Arc;

use super::types::Entity;

/// Per-query state handed to scorers.
///
/// Holds the words surrounding the surface form and the full candidate list
/// of the current ranking call. The engine injects that list before scoring
/// so scorers that need cross-candidate features can see every competitor.
#[derive(Debug, Clone, Default)]
pub struct EntityContext {
    tokens: Vec<String>,
    token_set: HashSet<String>,
    entities_for_scoring: Option<Arc<[Entity]>>,
}

impl EntityContext {
    /// Build a context from free text (query or surrounding sentence)
    pub fn new(text: &str) -> Self {
        Self::with_tokens(tokenize(text))
    }

    pub fn with_tokens(tokens: Vec<String>) -> Self {
        let token_set = tokens.iter().cloned().collect();
        Self {
            tokens,
            token_set,
            entities_for_scoring: None,
        }
    }

    /// Context tokens in their original order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.token_set.contains(token)
    }

    /// Replace the candidate list visible to scorers
    pub fn set_entities_for_scoring(&mut self, entities: Arc<[Entity]>) {
        self.entities_for_scoring = Some(entities);
    }

    /// Candidates of the ranking call in progress, empty before injection
    pub fn entities_for_scoring(&self) -> &[Entity] {
        self.entities_for_scoring.as_deref().unwrap_or(&[])
    }
}

/// Split text into lowercase alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}
