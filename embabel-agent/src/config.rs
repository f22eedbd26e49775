//! Ambient, file-loadable defaults for process options: which planner new
//! processes start with, how verbose their output is, which built-in
//! early-termination policies are wired in by default, and how many ticks
//! a driver runs before returning control. Mirrors the shape of other
//! config structs in this codebase's lineage: every field has a free
//! function default so a YAML document only needs to override what it
//! actually wants to change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::process::PlannerType;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlannerTypeConfig {
    Goap,
    Utility,
    /// Anything else a config document names (a typo, a planner this build
    /// doesn't ship). Coerced to `Utility` at load time with a logged
    /// warning rather than rejected outright, since `Utility` is always a
    /// runnable fallback for any agent definition.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

impl PlannerTypeConfig {
    /// Resolve to a concrete `PlannerType`, logging and emitting a
    /// `Logging` event when the configured value had to be coerced.
    pub fn resolve(&self, output_channel: &embabel_events::OutputChannel) -> PlannerType {
        match self {
            PlannerTypeConfig::Goap => PlannerType::Goap,
            PlannerTypeConfig::Utility => PlannerType::Utility,
            PlannerTypeConfig::Unrecognized => {
                tracing::warn!("unrecognized plannerType in config; coercing to UTILITY");
                output_channel.logging(
                    embabel_events::LogLevel::Warn,
                    "unrecognized plannerType in config; coercing to UTILITY",
                );
                PlannerType::Utility
            }
        }
    }
}

impl From<PlannerTypeConfig> for PlannerType {
    fn from(value: PlannerTypeConfig) -> Self {
        match value {
            PlannerTypeConfig::Goap => PlannerType::Goap,
            PlannerTypeConfig::Utility | PlannerTypeConfig::Unrecognized => PlannerType::Utility,
        }
    }
}

fn default_planner_type() -> PlannerTypeConfig {
    PlannerTypeConfig::Goap
}

fn default_max_ticks() -> usize {
    64
}

fn default_on_stuck() -> bool {
    true
}

fn default_show_planning() -> bool {
    false
}

fn default_show_prompts() -> bool {
    false
}

fn default_show_long_plans() -> bool {
    false
}

/// Top-level agent runtime config, loaded from a YAML document. Every
/// field is `#[serde(default)]` so a partial document (or an empty one)
/// still loads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentRuntimeConfig {
    pub planner_type: PlannerTypeConfig,
    pub max_ticks: usize,
    pub on_stuck_terminates: bool,
    pub show_planning: bool,
    pub show_prompts: bool,
    pub show_long_plans: bool,
}

impl Default for AgentRuntimeConfig {
    fn default() -> Self {
        Self {
            planner_type: default_planner_type(),
            max_ticks: default_max_ticks(),
            on_stuck_terminates: default_on_stuck(),
            show_planning: default_show_planning(),
            show_prompts: default_show_prompts(),
            show_long_plans: default_show_long_plans(),
        }
    }
}

#[cfg(feature = "serde")]
impl AgentRuntimeConfig {
    /// Parse a YAML document, filling in defaults for anything it omits.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn empty_document_loads_all_defaults() {
        let config = AgentRuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AgentRuntimeConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = AgentRuntimeConfig::from_yaml("max_ticks: 10\n").unwrap();
        assert_eq!(config.max_ticks, 10);
        assert_eq!(config.planner_type, PlannerTypeConfig::Goap);
    }

    #[test]
    fn unrecognized_planner_type_parses_to_the_fallback_variant() {
        let config = AgentRuntimeConfig::from_yaml("planner_type: quantum\n").unwrap();
        assert_eq!(config.planner_type, PlannerTypeConfig::Unrecognized);
        let channel = embabel_events::OutputChannel::default();
        assert_eq!(config.planner_type.resolve(&channel), PlannerType::Utility);
    }
}
