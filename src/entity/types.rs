use serde::{Deserialize, Serialize};

/// A candidate referent for a surface form.
///
/// The ranking engine treats entities as opaque values: it clones them into
/// results but never mutates them. The attributes below exist for scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    /// How often this entity is the target of a link (popularity prior)
    #[serde(default)]
    pub link_count: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Entity {
    /// Create an entity with only an id and a display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            types: Vec::new(),
            link_count: 0,
            description: None,
        }
    }

    /// True if the normalized name equals the normalized surface form
    pub fn name_matches(&self, surface_form: &str) -> bool {
        normalize(&self.name) == normalize(surface_form)
    }

    /// True if any normalized alias equals the normalized surface form
    pub fn alias_matches(&self, surface_form: &str) -> bool {
        let wanted = normalize(surface_form);
        self.aliases.iter().any(|a| normalize(a) == wanted)
    }

    /// True if the name or an alias starts with the surface form
    pub fn prefix_matches(&self, surface_form: &str) -> bool {
        let wanted = normalize(surface_form);
        if wanted.is_empty() {
            return false;
        }
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|n| normalize(n).starts_with(&wanted))
    }
}

/// An entity paired with the score a scorer assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityScore {
    pub entity: Entity,
    pub score: f64,
}

impl EntityScore {
    pub fn new(entity: Entity, score: f64) -> Self {
        Self { entity, score }
    }
}

/// Lowercase and collapse runs of whitespace to a single space
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Entity {
        Entity {
            id: "Q90".to_string(),
            name: "Paris".to_string(),
            aliases: vec!["City of Light".to_string()],
            types: vec!["Place/City".to_string()],
            link_count: 1200,
            description: Some("Capital of France".to_string()),
        }
    }

    #[test]
    fn test_normalize_collapses_case_and_spaces() {
        assert_eq!(normalize("  New   York "), "new york");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_name_match_ignores_case() {
        assert!(paris().name_matches("PARIS"));
        assert!(!paris().name_matches("Pari"));
    }

    #[test]
    fn test_alias_match() {
        assert!(paris().alias_matches("city  of light"));
        assert!(!paris().alias_matches("paris"));
    }

    #[test]
    fn test_prefix_match_covers_aliases() {
        let e = paris();
        assert!(e.prefix_matches("par"));
        assert!(e.prefix_matches("city of"));
        assert!(!e.prefix_matches("light"));
        assert!(!e.prefix_matches("   "));
    }

    #[test]
    fn test_entity_deserializes_with_defaults() {
        let e: Entity = serde_json::from_str(r#"{"id": "Q1", "name": "Universe"}"#).unwrap();
        assert_eq!(e, Entity::new("Q1", "Universe"));
    }
}
