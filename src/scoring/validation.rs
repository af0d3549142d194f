use super::config::ScoringConfig;
use super::factors::{Effect, RangeOp};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(base) = config.base_score {
        if !base.is_finite() || base < 0.0 {
            errors.push("scoring.base_score: must be a non-negative number".to_string());
        }
    }

    let single_effects = [
        ("popularity", &config.popularity),
        ("exact_match", &config.exact_match),
        ("alias_match", &config.alias_match),
        ("prefix_match", &config.prefix_match),
        ("context_overlap", &config.context_overlap),
        ("ambiguity", &config.ambiguity),
    ];
    for (name, value) in single_effects {
        if let Some(effect) = value {
            if let Err(e) = Effect::parse(effect) {
                errors.push(format!("scoring.{}: invalid format '{}' - {}", name, effect, e));
            }
        }
    }

    if let Some(ref types) = config.types {
        for (i, rule) in types.iter().enumerate() {
            if let Err(e) = glob::Pattern::new(&rule.pattern) {
                errors.push(format!(
                    "scoring.types[{}].pattern: invalid '{}' - {}",
                    i, rule.pattern, e
                ));
            }
            if let Err(e) = Effect::parse(&rule.effect) {
                errors.push(format!(
                    "scoring.types[{}].effect: invalid '{}' - {}",
                    i, rule.effect, e
                ));
            }
        }
    }

    if let Some(ref buckets) = config.length {
        for (i, bucket) in buckets.iter().enumerate() {
            if let Err(e) = RangeOp::parse(&bucket.range) {
                errors.push(format!(
                    "scoring.length[{}].range: invalid '{}' - {}",
                    i, bucket.range, e
                ));
            }
            if let Err(e) = Effect::parse(&bucket.effect) {
                errors.push(format!(
                    "scoring.length[{}].effect: invalid '{}' - {}",
                    i, bucket.effect, e
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{LengthBucket, TypeEffect};

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config_valid() {
        assert!(validate_scoring(&ScoringConfig::empty()).is_ok());
    }

    #[test]
    fn test_invalid_single_effect() {
        let config = ScoringConfig {
            exact_match: Some("times four".to_string()),
            ..ScoringConfig::empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("scoring.exact_match"));
    }

    #[test]
    fn test_negative_base_score() {
        let config = ScoringConfig {
            base_score: Some(-1.0),
            ..ScoringConfig::empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("base_score"));
    }

    #[test]
    fn test_invalid_type_pattern() {
        let config = ScoringConfig {
            types: Some(vec![TypeEffect {
                pattern: "Place/[".to_string(),
                effect: "x2".to_string(),
            }]),
            ..ScoringConfig::empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.types[0].pattern"));
    }

    #[test]
    fn test_invalid_length_bucket() {
        let config = ScoringConfig {
            length: Some(vec![LengthBucket {
                range: "short".to_string(),
                effect: "x2".to_string(),
            }]),
            ..ScoringConfig::empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.length[0].range"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            base_score: Some(-10.0),
            popularity: Some("bad".to_string()),
            ambiguity: Some("x0.9 per 0".to_string()),
            ..ScoringConfig::empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
