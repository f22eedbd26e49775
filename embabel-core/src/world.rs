use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::condition::{ConditionName, Determination, EffectSpec};
use crate::goal::Goal;

/// Partial mapping condition-name -> determination representing current
/// knowledge. Unlike `EffectSpec`, a `WorldState` is a full snapshot used as
/// both GOAP search-node state and the result of blackboard evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldState {
    facts: BTreeMap<ConditionName, Determination>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &ConditionName) -> Determination {
        self.facts.get(name).copied().unwrap_or(Determination::Unknown)
    }

    /// Conditions whose value is known (TRUE or FALSE).
    pub fn known(&self) -> impl Iterator<Item = (&ConditionName, Determination)> {
        self.facts
            .iter()
            .filter(|(_, v)| !v.is_unknown())
            .map(|(k, v)| (k, *v))
    }

    /// Conditions whose value is UNKNOWN.
    pub fn unknown(&self) -> impl Iterator<Item = &ConditionName> {
        self.facts
            .iter()
            .filter(|(_, v)| v.is_unknown())
            .map(|(k, _)| k)
    }

    /// Returns a new world state with `(name -> value)` overridden.
    pub fn with_override(&self, name: ConditionName, value: Determination) -> WorldState {
        let mut facts = self.facts.clone();
        facts.insert(name, value);
        WorldState { facts }
    }

    /// Returns a new world state with every condition named in `effects`
    /// overwritten by its effect value (UNKNOWN effect entries are skipped:
    /// they explicitly "leave the condition unknown", i.e. no-op).
    pub fn apply_effects(&self, effects: &EffectSpec) -> WorldState {
        let mut facts = self.facts.clone();
        for (name, value) in effects.iter() {
            if !value.is_unknown() {
                facts.insert(name.clone(), *value);
            } else {
                facts.remove(name);
            }
        }
        WorldState { facts }
    }

    /// A precondition/goal-precondition `EffectSpec` is satisfied by this
    /// state iff every TRUE/FALSE entry in it matches exactly; UNKNOWN
    /// entries in the spec are "don't care" and always match. UNKNOWN in
    /// *this state* for a condition the spec requires TRUE/FALSE for is not
    /// yet satisfied.
    pub fn satisfies(&self, preconditions: &EffectSpec) -> bool {
        preconditions.iter().all(|(name, required)| match required {
            Determination::Unknown => true,
            _ => self.get(name) == *required,
        })
    }

    pub fn satisfies_goal(&self, goal: &Goal) -> bool {
        self.satisfies(&goal.preconditions)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl FromIterator<(ConditionName, Determination)> for WorldState {
    fn from_iter<T: IntoIterator<Item = (ConditionName, Determination)>>(iter: T) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cn(s: &str) -> ConditionName {
        ConditionName::new(s)
    }

    #[test]
    fn unknown_precondition_is_dont_care() {
        let state = WorldState::new();
        let pre = EffectSpec::new().with("hasZoo", Determination::Unknown);
        assert!(state.satisfies(&pre));
    }

    #[test]
    fn unknown_state_for_required_condition_is_unsatisfied() {
        let state = WorldState::new();
        let pre = EffectSpec::new().with("hasZoo", true);
        assert!(!state.satisfies(&pre));
    }

    #[test]
    fn apply_effects_overwrites_and_skips_unknown() {
        let state = WorldState::new().with_override(cn("hasElephant"), Determination::False);
        let effects = EffectSpec::new()
            .with("hasElephant", true)
            .with("untouched", Determination::Unknown);
        let next = state.apply_effects(&effects);
        assert_eq!(next.get(&cn("hasElephant")), Determination::True);
        assert_eq!(next.get(&cn("untouched")), Determination::Unknown);
    }
}
