//! The "zoo" demo agent: two actions chained by GOAP to build a `Zoo`
//! around an `Elephant`, wired up the same way any Embabel agent definition
//! is -- actions with preconditions/effects, a goal, condition evaluators
//! reading typed blackboard entries.

use std::sync::Arc;

use embabel_agent::action_runtime::{from_fn, BodyOutcome};
use embabel_agent::{AgentBuilder, AgentDefinition};
use embabel_core::condition::EffectSpec;
use embabel_core::{Action, ConditionEvaluator, Determination, Goal};

/// An elephant bound on the blackboard by `makeElephant`. The planner never
/// sees this type directly -- only the conditions evaluated from it.
#[derive(Debug, Clone)]
pub struct Elephant {
    pub name: String,
    pub age: u32,
}

/// A zoo built around one elephant, bound by `makeZoo` once it's achievable.
#[derive(Debug, Clone)]
pub struct Zoo {
    pub elephant_name: String,
}

fn has_elephant() -> ConditionEvaluator {
    ConditionEvaluator::new("hasElephant", |bb| Determination::from(bb.last_of_type::<Elephant>().is_some()))
}

fn elephant_over_twenty() -> ConditionEvaluator {
    ConditionEvaluator::new("elephantAgeOver20", |bb| {
        Determination::from(bb.last_of_type::<Elephant>().map(|e| e.age > 20))
    })
}

fn has_zoo() -> ConditionEvaluator {
    ConditionEvaluator::new("hasZoo", |bb| Determination::from(bb.last_of_type::<Zoo>().is_some()))
}

/// Which elephant `makeElephant` produces -- the CLI's stand-in for an LLM
/// or external system nondeterministically populating the blackboard.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Scenario {
    /// `Elephant("Zaboya", 30)` -- old enough, `makeZoo` succeeds.
    Success,
    /// `Elephant("Dumbo", 15)` -- too young, `makeZoo` stays unachievable.
    Blocked,
}

impl Scenario {
    fn elephant(self) -> Elephant {
        match self {
            Scenario::Success => Elephant { name: "Zaboya".to_string(), age: 30 },
            Scenario::Blocked => Elephant { name: "Dumbo".to_string(), age: 15 },
        }
    }
}

/// Build the zoo agent definition for a given scenario. `without_nirvana` is
/// required here: the default nirvana goal is trivially satisfied by an
/// empty plan, which would mask the STUCK outcome the blocked scenario is
/// meant to demonstrate.
pub fn build(scenario: Scenario) -> AgentDefinition {
    let elephant = scenario.elephant();

    // The planner assumes the elephant it produces will be old enough;
    // the next tick recomputes `elephantAgeOver20` for real from whichever
    // elephant actually landed on the blackboard, so a too-young elephant
    // still blocks `makeZoo` at replan time despite this optimistic effect.
    let make_elephant = Action::new(
        "makeElephant",
        EffectSpec::new(),
        EffectSpec::new().with("hasElephant", true).with("elephantAgeOver20", true),
    )
    .with_description("produce an elephant to build the zoo around")
    .with_cost(0.1)
    .with_value(1.0);
    let make_elephant_body = from_fn(move |bb| {
        bb.add(elephant.clone());
        Ok(BodyOutcome::Succeeded)
    });

    let make_zoo = Action::new(
        "makeZoo",
        EffectSpec::new().with("hasElephant", true).with("elephantAgeOver20", true),
        EffectSpec::new().with("hasZoo", true),
    )
    .with_description("build a zoo around the elephant on the blackboard")
    .with_cost(0.1)
    .with_value(2.0);
    let make_zoo_body = from_fn(|bb| {
        let elephant_name = bb
            .last_of_type::<Elephant>()
            .map(|e| e.name.clone())
            .ok_or_else(|| "makeZoo ran with no elephant on the blackboard".to_string())?;
        bb.add(Zoo { elephant_name });
        Ok(BodyOutcome::Succeeded)
    });

    let have_zoo = Goal::new("haveZoo", EffectSpec::new().with("hasZoo", true), 5.0)
        .with_description("have a zoo built around a sufficiently mature elephant");

    AgentBuilder::new("zoo-demo", "builds a zoo around an elephant via chained GOAP actions", "embabel-cli")
        .with_condition(has_elephant())
        .with_condition(elephant_over_twenty())
        .with_condition(has_zoo())
        .with_action(make_elephant, make_elephant_body)
        .with_action(make_zoo, make_zoo_body)
        .with_goal(have_zoo)
        .without_nirvana()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use embabel_agent::driver::sequential::run;
    use embabel_agent::process::{AgentProcess, ProcessOptions, ProcessStatus};

    #[tokio::test]
    async fn success_scenario_completes_with_a_two_step_plan() {
        let definition = Arc::new(build(Scenario::Success));
        let mut process = AgentProcess::new(definition, ProcessOptions::default());

        let status = run(&mut process, 8).await.unwrap();
        assert_eq!(status, ProcessStatus::Completed);
        assert_eq!(process.history.len(), 2);
        assert_eq!(process.history[0].action_name, "makeElephant");
        assert_eq!(process.history[1].action_name, "makeZoo");
        assert!(process.blackboard.last_of_type::<Zoo>().is_some());
    }

    #[tokio::test]
    async fn blocked_scenario_goes_stuck_after_the_elephant_is_too_young() {
        let definition = Arc::new(build(Scenario::Blocked));
        let mut process = AgentProcess::new(definition, ProcessOptions::default());

        let status = run(&mut process, 8).await.unwrap();
        assert_eq!(status, ProcessStatus::Stuck);
        assert!(process.blackboard.last_of_type::<Elephant>().is_some());
        assert!(process.blackboard.last_of_type::<Zoo>().is_none());
    }
}
