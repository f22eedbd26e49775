use crate::condition::EffectSpec;
use crate::world::WorldState;

/// Name, preconditions (conditions that, when true, indicate satisfaction),
/// and a cost-computation `value`.
#[derive(Clone)]
pub struct Goal {
    pub name: String,
    pub description: String,
    pub preconditions: EffectSpec,
    value_fn: ValueFn,
}

#[derive(Clone)]
enum ValueFn {
    Constant(f64),
    Dynamic(std::sync::Arc<dyn Fn(&WorldState) -> f64 + Send + Sync>),
}

impl Goal {
    pub fn new(name: impl Into<String>, preconditions: EffectSpec, value: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            preconditions,
            value_fn: ValueFn::Constant(value),
        }
    }

    pub fn with_dynamic_value(
        name: impl Into<String>,
        preconditions: EffectSpec,
        value_fn: impl Fn(&WorldState) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            preconditions,
            value_fn: ValueFn::Dynamic(std::sync::Arc::new(value_fn)),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn value(&self, state: &WorldState) -> f64 {
        match &self.value_fn {
            ValueFn::Constant(v) => *v,
            ValueFn::Dynamic(f) => f(state),
        }
    }

    /// The terminal goal "nothing more to do": empty preconditions (trivially
    /// satisfied by any state) and value 0.
    pub fn nirvana() -> Self {
        Self::new(NIRVANA_NAME, EffectSpec::new(), 0.0)
    }

    pub fn is_nirvana(&self) -> bool {
        self.name == NIRVANA_NAME
    }
}

pub const NIRVANA_NAME: &str = "Nirvana";

impl std::fmt::Debug for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Goal")
            .field("name", &self.name)
            .field("preconditions", &self.preconditions)
            .finish()
    }
}
