use anyhow::{bail, Result};

/// Numeric range predicate, e.g. on the surface form length.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if let Some((low, high)) = s.split_once('-') {
            let low: u64 = low.trim().parse()?;
            let high: u64 = high.trim().parse()?;
            if low > high {
                bail!("Range start {} is greater than end {}", low, high);
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => (*low..=*high).contains(&value),
        }
    }
}

/// Score modifier: `+N`, `xN`, `+N per M`, `xN per M`.
///
/// Per-unit effects apply once for every full `M` counted items; flat
/// effects apply once when the counted quantity is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Add(f64),
    Multiply(f64),
    AddPer(f64, u64),
    MultiplyPer(f64, u64),
}

impl Effect {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some((effect_part, per_part)) = s.split_once(" per ") {
            let per: u64 = per_part.trim().parse()?;
            if per == 0 {
                bail!("'per' count must be positive: {}", s);
            }
            Ok(match parse_op(effect_part)? {
                (Op::Add, n) => Effect::AddPer(n, per),
                (Op::Multiply, n) => Effect::MultiplyPer(n, per),
            })
        } else {
            Ok(match parse_op(s)? {
                (Op::Add, n) => Effect::Add(n),
                (Op::Multiply, n) => Effect::Multiply(n),
            })
        }
    }

    /// Apply the effect `units` times
    pub fn apply(&self, score: f64, units: u64) -> f64 {
        match self {
            Effect::Add(n) | Effect::AddPer(n, _) => score + n * units as f64,
            Effect::Multiply(n) | Effect::MultiplyPer(n, _) => score * n.powf(units as f64),
        }
    }

    /// Number of applications for `count` observed items
    pub fn units_for(&self, count: u64) -> u64 {
        match self {
            Effect::AddPer(_, per) | Effect::MultiplyPer(_, per) => count / per,
            Effect::Add(_) | Effect::Multiply(_) => u64::from(count > 0),
        }
    }
}

enum Op {
    Add,
    Multiply,
}

fn parse_op(s: &str) -> Result<(Op, f64)> {
    let s = s.trim();
    if let Some(val) = s.strip_prefix('+') {
        Ok((Op::Add, val.trim().parse()?))
    } else if let Some(val) = s.strip_prefix('x') {
        Ok((Op::Multiply, val.trim().parse()?))
    } else {
        bail!("Effect must start with + or x: {}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_operators() {
        assert!(RangeOp::parse("<3").unwrap().matches(2));
        assert!(!RangeOp::parse("<3").unwrap().matches(3));
        assert!(RangeOp::parse("<=3").unwrap().matches(3));
        assert!(RangeOp::parse(">1").unwrap().matches(2));
        assert!(!RangeOp::parse(">1").unwrap().matches(1));
        assert!(RangeOp::parse(">= 4").unwrap().matches(4));
        assert!(RangeOp::parse("1").unwrap().matches(1));
        assert!(!RangeOp::parse("1").unwrap().matches(2));
    }

    #[test]
    fn test_parse_range_between_inclusive() {
        let range = RangeOp::parse("2-4").unwrap();
        assert_eq!(range, RangeOp::Between(2, 4));
        assert!(!range.matches(1));
        assert!(range.matches(2));
        assert!(range.matches(4));
        assert!(!range.matches(5));
    }

    #[test]
    fn test_parse_range_rejects_garbage() {
        assert!(RangeOp::parse("abc").is_err());
        assert!(RangeOp::parse("5-2").is_err());
        assert!(RangeOp::parse("-3").is_err());
    }

    #[test]
    fn test_parse_effect_flat() {
        assert_eq!(Effect::parse("+10").unwrap(), Effect::Add(10.0));
        assert_eq!(Effect::parse("x0.5").unwrap(), Effect::Multiply(0.5));
        assert_eq!(Effect::parse("+-5").unwrap().apply(100.0, 1), 95.0);
    }

    #[test]
    fn test_parse_effect_per_count() {
        let effect = Effect::parse("+1 per 100").unwrap();
        assert_eq!(effect, Effect::AddPer(1.0, 100));
        assert_eq!(effect.units_for(250), 2);
        assert_eq!(effect.apply(100.0, effect.units_for(250)), 102.0);
    }

    #[test]
    fn test_multiply_per_compounds() {
        let effect = Effect::parse("x1.1 per 1").unwrap();
        let result = effect.apply(100.0, effect.units_for(3));
        assert!((result - 133.1).abs() < 0.1);
    }

    #[test]
    fn test_flat_effect_needs_nonzero_count() {
        let effect = Effect::parse("x2").unwrap();
        assert_eq!(effect.units_for(0), 0);
        assert_eq!(effect.units_for(7), 1);
        assert_eq!(effect.apply(10.0, 0), 10.0);
    }

    #[test]
    fn test_parse_effect_errors() {
        assert!(Effect::parse("10").is_err());
        assert!(Effect::parse("+1 per 0").is_err());
        assert!(Effect::parse("+1 per 1h").is_err());
        assert!(Effect::parse("xabc").is_err());
    }
}
