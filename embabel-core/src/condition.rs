use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable, interned-free name for a condition. Conditions are compared and
/// ordered by name, not by identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConditionName(pub String);

impl ConditionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Into<String>> From<S> for ConditionName {
    fn from(value: S) -> Self {
        Self::new(value)
    }
}

/// The value of a condition: a three-valued determination.
///
/// `Unknown` means "not determined yet" -- distinct from `False`. In a
/// precondition it means "don't care"; in an effect it means "leaves the
/// condition unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Determination {
    True,
    False,
    #[default]
    Unknown,
}

impl Determination {
    /// Total operator: `TRUE` iff `x == TRUE`, else `FALSE`. Collapses
    /// `Unknown` to `False`.
    pub fn as_true_or_false(self) -> Determination {
        match self {
            Determination::True => Determination::True,
            _ => Determination::False,
        }
    }

    pub fn is_true(self) -> bool {
        matches!(self, Determination::True)
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Determination::Unknown)
    }
}

impl From<bool> for Determination {
    fn from(value: bool) -> Self {
        if value {
            Determination::True
        } else {
            Determination::False
        }
    }
}

impl From<Option<bool>> for Determination {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Determination::True,
            Some(false) => Determination::False,
            None => Determination::Unknown,
        }
    }
}

/// Mapping from condition name to determination.
///
/// Used for both preconditions ("what must hold") and effects ("what is
/// asserted after"). `Unknown` in a precondition means "don't care"; in an
/// effect it means "leaves the condition unknown" (so effect maps normally
/// omit `Unknown` entries -- there's nothing to assert -- but the type allows
/// them for symmetry with preconditions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffectSpec {
    entries: BTreeMap<ConditionName, Determination>,
}

impl EffectSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<ConditionName>, value: impl Into<Determination>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &ConditionName) -> Determination {
        self.entries.get(name).copied().unwrap_or(Determination::Unknown)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConditionName, &Determination)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(ConditionName, Determination)> for EffectSpec {
    fn from_iter<T: IntoIterator<Item = (ConditionName, Determination)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determination_round_trip() {
        assert_eq!(Determination::from(true), Determination::True);
        assert_eq!(Determination::from(false), Determination::False);
        assert_eq!(Determination::from(None::<bool>), Determination::Unknown);

        assert_eq!(Determination::True.as_true_or_false(), Determination::True);
        assert_eq!(Determination::False.as_true_or_false(), Determination::False);
        assert_eq!(Determination::Unknown.as_true_or_false(), Determination::False);
    }

    #[test]
    fn effect_spec_missing_is_unknown() {
        let spec = EffectSpec::new().with("hasElephant", true);
        assert_eq!(spec.get(&ConditionName::new("hasElephant")), Determination::True);
        assert_eq!(spec.get(&ConditionName::new("hasZoo")), Determination::Unknown);
    }
}
