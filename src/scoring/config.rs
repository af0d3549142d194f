use serde::{Deserialize, Serialize};

/// Configuration of the built-in factor scorer.
///
/// Each factor is optional. Effects use addition (`+N`) or multiplication
/// (`xN`), optionally per counted unit (`+N per M`).
///
/// Example YAML:
/// ```yaml
/// scoring:
///   base_score: 100
///   popularity: "+1 per 100"
///   exact_match: "x4"
///   alias_match: "x2"
///   context_overlap: "x1.25 per 1"
///   types:
///     - { pattern: "Place/*", effect: "x1.2" }
///   length:
///     - { range: "1", effect: "x0.8" }
///     - { range: ">=3", effect: "x1.5" }
///   ambiguity: "x0.98 per 1"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Score before factors are applied (default: 100.0)
    #[serde(default)]
    pub base_score: Option<f64>,

    /// Effect per entity link count, e.g. "+1 per 100"
    #[serde(default)]
    pub popularity: Option<String>,

    /// Effect when the entity name equals the surface form
    #[serde(default)]
    pub exact_match: Option<String>,

    /// Effect when an alias equals the surface form (only without exact match)
    #[serde(default)]
    pub alias_match: Option<String>,

    /// Effect when the name or an alias starts with the surface form
    /// (only without exact or alias match)
    #[serde(default)]
    pub prefix_match: Option<String>,

    /// Effect per context token shared with the entity's name or description
    #[serde(default)]
    pub context_overlap: Option<String>,

    /// Effects for entity types matching a glob pattern (matches compound)
    #[serde(default)]
    pub types: Option<Vec<TypeEffect>>,

    /// Buckets on the surface form length; first match wins
    #[serde(default)]
    pub length: Option<Vec<LengthBucket>>,

    /// Effect per competing candidate in the same ranking call
    #[serde(default)]
    pub ambiguity: Option<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: Some(100.0),
            popularity: Some("+1 per 100".to_string()),
            exact_match: Some("x4".to_string()),
            alias_match: Some("x2".to_string()),
            prefix_match: Some("x1.5".to_string()),
            context_overlap: Some("x1.25 per 1".to_string()),
            types: None,
            length: None,
            ambiguity: None,
        }
    }
}

impl ScoringConfig {
    /// A config with every factor switched off
    pub fn empty() -> Self {
        Self {
            base_score: None,
            popularity: None,
            exact_match: None,
            alias_match: None,
            prefix_match: None,
            context_overlap: None,
            types: None,
            length: None,
            ambiguity: None,
        }
    }
}

/// Type factor: applies when any entity type matches the glob `pattern`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TypeEffect {
    /// Glob over type names (e.g., "Person", "Place/*")
    pub pattern: String,

    /// Effect on score (e.g., "x1.2")
    pub effect: String,
}

/// Length factor bucket.
///
/// Range format: "<N", "<=N", ">N", ">=N", "N", "N-M" (inclusive range)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LengthBucket {
    pub range: String,
    pub effect: String,
}
