//! # Body resolver
//!
//! JPL kernels do not store every body relative to the Solar System
//! Barycenter. Earth, for instance, is stored as two series: the Earth-Moon
//! Barycenter relative to the SSB `(0, 3)`, and Earth relative to the
//! Earth-Moon Barycenter `(3, 399)`. The [`BodyResolver`] maps a target to
//! the series to evaluate and the way to combine them ([`Combination`]).
//!
//! ## Default rules
//! -----------------
//! | target                              | rule                            |
//! |-------------------------------------|---------------------------------|
//! | `1..=9` barycenters, `10` Sun       | `Direct((0, n))`                |
//! | `n01..n99` (planets and satellites) | `Sum((0, n), (n, code))`        |
//! | `"geocentric moon"`                 | `Difference((3, 301), (3, 399))`|
//!
//! Custom rules registered with [`BodyResolver::insert`] take precedence
//! over the defaults.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Sub};

use crate::ephem_errors::{EphemError, Result};
use crate::naif_ids::{body_id, normalize, NaifIds};
use crate::spk::SeriesKey;

/// How a target is identified by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetId {
    Code(i32),
    /// Free-text name, matched case-insensitively.
    Name(String),
}

impl From<i32> for TargetId {
    fn from(code: i32) -> Self {
        TargetId::Code(code)
    }
}

impl From<NaifIds> for TargetId {
    fn from(body: NaifIds) -> Self {
        TargetId::Code(body.to_id())
    }
}

impl From<&str> for TargetId {
    fn from(name: &str) -> Self {
        match name.trim().parse::<i32>() {
            Ok(code) => TargetId::Code(code),
            Err(_) => TargetId::Name(name.to_string()),
        }
    }
}

impl From<String> for TargetId {
    fn from(name: String) -> Self {
        TargetId::from(name.as_str())
    }
}

impl From<&TargetId> for TargetId {
    fn from(target: &TargetId) -> Self {
        target.clone()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Code(code) => write!(f, "{code}"),
            TargetId::Name(name) => f.write_str(name),
        }
    }
}

/// Series to evaluate for a target, and how to combine them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    Direct(SeriesKey),
    Sum(SeriesKey, SeriesKey),
    Difference(SeriesKey, SeriesKey),
}

impl Combination {
    /// Series involved, in evaluation order.
    pub fn keys(&self) -> Vec<SeriesKey> {
        match *self {
            Combination::Direct(key) => vec![key],
            Combination::Sum(a, b) | Combination::Difference(a, b) => vec![a, b],
        }
    }

    /// Evaluate every series with `eval` and combine the results.
    ///
    /// Arguments
    /// -----------------
    /// * `eval`: Evaluates one series; its first error is returned as is.
    ///
    /// Return
    /// ----------
    /// * `eval(a)`, `eval(a) + eval(b)` or `eval(a) - eval(b)`.
    pub fn evaluate<T, F>(&self, mut eval: F) -> Result<T>
    where
        T: Add<Output = T> + Sub<Output = T>,
        F: FnMut(SeriesKey) -> Result<T>,
    {
        match *self {
            Combination::Direct(key) => eval(key),
            Combination::Sum(a, b) => Ok(eval(a)? + eval(b)?),
            Combination::Difference(a, b) => Ok(eval(a)? - eval(b)?),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Direct(key) => write!(f, "{key}"),
            Combination::Sum(a, b) => write!(f, "{a} + {b}"),
            Combination::Difference(a, b) => write!(f, "{a} - {b}"),
        }
    }
}

/// Default rule for a NAIF code, if any.
pub fn default_rule(code: i32) -> Option<Combination> {
    match code {
        1..=10 => Some(Combination::Direct(SeriesKey::new(0, code))),
        101..=999 if code % 100 != 0 => {
            let system = code / 100;
            Some(Combination::Sum(
                SeriesKey::new(0, system),
                SeriesKey::new(system, code),
            ))
        }
        _ => None,
    }
}

/// Maps targets to [`Combination`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyResolver {
    by_code: HashMap<i32, Combination>,
    by_name: HashMap<String, Combination>,
}

impl Default for BodyResolver {
    fn default() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert(
            "geocentric moon".to_string(),
            Combination::Difference(SeriesKey::new(3, 301), SeriesKey::new(3, 399)),
        );
        BodyResolver {
            by_code: HashMap::new(),
            by_name,
        }
    }
}

impl BodyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, replacing any previous rule for the same target.
    pub fn insert(&mut self, target: impl Into<TargetId>, rule: Combination) {
        match target.into() {
            TargetId::Code(code) => {
                self.by_code.insert(code, rule);
            }
            TargetId::Name(name) => {
                self.by_name.insert(normalize(&name), rule);
            }
        }
    }

    /// Rule for a target.
    ///
    /// Names are looked up among the named rules first, then resolved to a
    /// NAIF code (`"mars"` → 499).
    ///
    /// Return
    /// ----------
    /// * The rule, or [`EphemError::UnknownTarget`] when the target has
    ///   none.
    pub fn rule(&self, target: &TargetId) -> Result<Combination> {
        let code = match target {
            TargetId::Code(code) => *code,
            TargetId::Name(name) => {
                if let Some(rule) = self.by_name.get(&normalize(name)) {
                    return Ok(*rule);
                }
                body_id(name).ok_or_else(|| {
                    EphemError::UnknownTarget(format!("no body named {name:?}"))
                })?
            }
        };
        self.by_code
            .get(&code)
            .copied()
            .or_else(|| default_rule(code))
            .ok_or_else(|| EphemError::UnknownTarget(format!("no rule for target {target}")))
    }
}

#[cfg(test)]
mod test_resolver {
    use super::*;
    use crate::naif_ids::PlanetMassCenter;

    #[test]
    fn test_default_rules() {
        let resolver = BodyResolver::new();
        let rule = |t: TargetId| resolver.rule(&t).unwrap();

        assert_eq!(rule(10.into()), Combination::Direct(SeriesKey::new(0, 10)));
        assert_eq!(rule(4.into()), Combination::Direct(SeriesKey::new(0, 4)));
        assert_eq!(
            rule(399.into()),
            Combination::Sum(SeriesKey::new(0, 3), SeriesKey::new(3, 399))
        );
        assert_eq!(
            rule("Moon".into()),
            Combination::Sum(SeriesKey::new(0, 3), SeriesKey::new(3, 301))
        );
        assert_eq!(
            rule("mars".into()),
            Combination::Sum(SeriesKey::new(0, 4), SeriesKey::new(4, 499))
        );
        assert_eq!(
            rule(NaifIds::PMC(PlanetMassCenter::Mercury).into()),
            Combination::Sum(SeriesKey::new(0, 1), SeriesKey::new(1, 199))
        );
        assert_eq!(
            rule("emb".into()),
            Combination::Direct(SeriesKey::new(0, 3))
        );
        assert_eq!(
            rule("Geocentric  MOON".into()),
            Combination::Difference(SeriesKey::new(3, 301), SeriesKey::new(3, 399))
        );
        assert_eq!(
            rule("606".into()),
            Combination::Sum(SeriesKey::new(0, 6), SeriesKey::new(6, 606))
        );
    }

    #[test]
    fn test_unknown_targets() {
        let resolver = BodyResolver::new();
        for target in [TargetId::Code(0), 500.into(), 1000.into(), (-82).into()] {
            assert!(matches!(
                resolver.rule(&target),
                Err(EphemError::UnknownTarget(_))
            ));
        }
        assert_eq!(
            resolver.rule(&"Vulcan".into()),
            Err(EphemError::UnknownTarget("no body named \"Vulcan\"".into()))
        );
    }

    #[test]
    fn test_custom_rules() {
        let mut resolver = BodyResolver::new();
        let heliocentric_mars =
            Combination::Difference(SeriesKey::new(0, 4), SeriesKey::new(0, 10));
        resolver.insert("heliocentric mars", heliocentric_mars);
        resolver.insert(-82, Combination::Direct(SeriesKey::new(6, -82)));
        resolver.insert(399, Combination::Direct(SeriesKey::new(0, 399)));

        assert_eq!(
            resolver.rule(&"Heliocentric-Mars".into()).unwrap(),
            heliocentric_mars
        );
        assert_eq!(
            resolver.rule(&(-82).into()).unwrap(),
            Combination::Direct(SeriesKey::new(6, -82))
        );
        assert_eq!(
            resolver.rule(&"earth".into()).unwrap(),
            Combination::Direct(SeriesKey::new(0, 399))
        );
    }

    #[test]
    fn test_combination_evaluate() {
        let eval = |key: SeriesKey| Ok(f64::from(key.target));
        let a = SeriesKey::new(0, 3);
        let b = SeriesKey::new(3, 399);
        assert_eq!(Combination::Direct(a).evaluate(eval).unwrap(), 3.0);
        assert_eq!(Combination::Sum(a, b).evaluate(eval).unwrap(), 402.0);
        assert_eq!(Combination::Difference(b, a).evaluate(eval).unwrap(), 396.0);

        let failing = |key: SeriesKey| -> Result<f64> {
            Err(EphemError::UnknownTarget(key.to_string()))
        };
        assert_eq!(
            Combination::Sum(a, b).evaluate(failing),
            Err(EphemError::UnknownTarget("(0, 3)".into()))
        );
        assert_eq!(Combination::Sum(a, b).to_string(), "(0, 3) + (3, 399)");
    }
}
