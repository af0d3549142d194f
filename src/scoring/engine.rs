use anyhow::{Context, Result};
use std::collections::HashSet;

use super::config::ScoringConfig;
use super::factors::{Effect, RangeOp};
use super::validation::validate_scoring;
use crate::entity::{tokenize, CandidatesInfo, Entity, EntityContext};
use crate::ranking::Scorer;

const DEFAULT_BASE_SCORE: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Popularity", "Exact match", "Type: Place/*"
    pub description: String, // e.g. "1200 links, +1 per 100 (12 units)"
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub base_score: f64,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Config-driven scorer combining popularity, name match, context and type
/// signals. Construct with [`FactorScorer::new`]; the config is validated
/// and compiled once.
#[derive(Debug, Clone)]
pub struct FactorScorer {
    base_score: f64,
    popularity: Option<Compiled<Effect>>,
    exact_match: Option<Compiled<Effect>>,
    alias_match: Option<Compiled<Effect>>,
    prefix_match: Option<Compiled<Effect>>,
    context_overlap: Option<Compiled<Effect>>,
    types: Vec<(glob::Pattern, Compiled<Effect>)>,
    length: Vec<(Compiled<RangeOp>, Compiled<Effect>)>,
    ambiguity: Option<Compiled<Effect>>,
}

/// A parsed value together with the text it came from (for breakdowns)
#[derive(Debug, Clone)]
struct Compiled<T> {
    source: String,
    value: T,
}

fn compile_effect(source: &Option<String>) -> Result<Option<Compiled<Effect>>> {
    source
        .as_ref()
        .map(|s| -> Result<_> {
            Ok(Compiled {
                value: Effect::parse(s)?,
                source: s.clone(),
            })
        })
        .transpose()
}

impl FactorScorer {
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        if let Err(errors) = validate_scoring(config) {
            anyhow::bail!("Invalid scoring config: {}", errors.join("; "));
        }

        let types = config
            .types
            .iter()
            .flatten()
            .map(|rule| -> Result<_> {
                let pattern = glob::Pattern::new(&rule.pattern)
                    .with_context(|| format!("Invalid type pattern '{}'", rule.pattern))?;
                let effect = Effect::parse(&rule.effect)?;
                Ok((pattern, Compiled { source: rule.effect.clone(), value: effect }))
            })
            .collect::<Result<Vec<_>>>()?;

        let length = config
            .length
            .iter()
            .flatten()
            .map(|bucket| -> Result<_> {
                let range = Compiled {
                    value: RangeOp::parse(&bucket.range)?,
                    source: bucket.range.clone(),
                };
                let effect = Compiled {
                    value: Effect::parse(&bucket.effect)?,
                    source: bucket.effect.clone(),
                };
                Ok((range, effect))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_score: config.base_score.unwrap_or(DEFAULT_BASE_SCORE),
            popularity: compile_effect(&config.popularity)?,
            exact_match: compile_effect(&config.exact_match)?,
            alias_match: compile_effect(&config.alias_match)?,
            prefix_match: compile_effect(&config.prefix_match)?,
            context_overlap: compile_effect(&config.context_overlap)?,
            types,
            length,
            ambiguity: compile_effect(&config.ambiguity)?,
        })
    }

    /// Score an entity and report how each factor moved the score.
    pub fn explain(
        &self,
        entity: &Entity,
        context: &EntityContext,
        surface_form: &str,
        length: usize,
    ) -> ScoreResult {
        let mut tally = Tally::new(self.base_score);

        if let Some(ref effect) = self.popularity {
            tally.apply_count(
                "Popularity",
                effect,
                entity.link_count,
                format!("{} links", entity.link_count),
            );
        }

        // Only the strongest kind of name match applies
        let name_match = if entity.name_matches(surface_form) {
            self.exact_match.as_ref().map(|e| ("Exact match", e))
        } else if entity.alias_matches(surface_form) {
            self.alias_match.as_ref().map(|e| ("Alias match", e))
        } else if entity.prefix_matches(surface_form) {
            self.prefix_match.as_ref().map(|e| ("Prefix match", e))
        } else {
            None
        };
        if let Some((label, effect)) = name_match {
            tally.apply_count(label, effect, 1, format!("'{}'", surface_form));
        }

        if let Some(ref effect) = self.context_overlap {
            let overlap = context_overlap(entity, context, surface_form);
            tally.apply_count(
                "Context overlap",
                effect,
                overlap,
                format!("{} shared tokens", overlap),
            );
        }

        // Multiple matching type rules compound
        for (pattern, effect) in &self.types {
            if let Some(matched) = entity.types.iter().find(|t| pattern.matches(t)) {
                tally.apply_count(
                    format!("Type: {}", pattern.as_str()),
                    effect,
                    1,
                    format!("matched type '{}'", matched),
                );
            }
        }

        // First matching length bucket wins
        if let Some((range, effect)) = self
            .length
            .iter()
            .find(|(range, _)| range.value.matches(length as u64))
        {
            tally.apply_count(
                "Length",
                effect,
                1,
                format!("length {}, matched '{}'", length, range.source),
            );
        }

        if let Some(ref effect) = self.ambiguity {
            let competitors = context.entities_for_scoring().len().saturating_sub(1) as u64;
            tally.apply_count(
                "Ambiguity",
                effect,
                competitors,
                format!("{} competing candidates", competitors),
            );
        }

        tally.finish()
    }
}

impl Scorer for FactorScorer {
    fn score(
        &self,
        entity: &Entity,
        _candidates: &CandidatesInfo,
        context: &EntityContext,
        surface_form: &str,
        length: usize,
    ) -> Result<f64> {
        Ok(self.explain(entity, context, surface_form, length).score)
    }
}

/// Count context tokens (outside the surface form itself) that also occur in
/// the entity's name, aliases or description
fn context_overlap(entity: &Entity, context: &EntityContext, surface_form: &str) -> u64 {
    let mention: HashSet<String> = tokenize(surface_form).into_iter().collect();
    let mut entity_tokens: HashSet<String> = tokenize(&entity.name).into_iter().collect();
    for alias in &entity.aliases {
        entity_tokens.extend(tokenize(alias));
    }
    if let Some(ref description) = entity.description {
        entity_tokens.extend(tokenize(description));
    }

    entity_tokens
        .iter()
        .filter(|t| !mention.contains(*t) && context.contains_token(t))
        .count() as u64
}

/// Running score plus the contributions recorded so far
struct Tally {
    base_score: f64,
    score: f64,
    factors: Vec<FactorContribution>,
}

impl Tally {
    fn new(base_score: f64) -> Self {
        Self {
            base_score,
            score: base_score,
            factors: Vec::new(),
        }
    }

    /// Apply `effect` for `count` observed items; records nothing if it does not fire
    fn apply_count(
        &mut self,
        label: impl Into<String>,
        effect: &Compiled<Effect>,
        count: u64,
        detail: String,
    ) {
        let units = effect.value.units_for(count);
        if units == 0 {
            return;
        }
        let before = self.score;
        self.score = effect.value.apply(self.score, units);
        self.factors.push(FactorContribution {
            label: label.into(),
            description: format!("{} -> {} ({} units)", detail, effect.source, units),
            before,
            after: self.score,
        });
    }

    fn finish(self) -> ScoreResult {
        // Floor at zero
        ScoreResult {
            score: self.score.max(0.0),
            breakdown: ScoreBreakdown {
                base_score: self.base_score,
                factors: self.factors,
            },
        }
    }
}
