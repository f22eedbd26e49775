use embabel_core::condition::EffectSpec;
use embabel_core::{Action, Blackboard, Goal, PlanningSystem, WorldState};
use embabel_goap::GoapPlanner;

/// End-to-end: "produce an elephant, then build it a zoo" -- the canonical
/// two-step scenario used throughout this core's examples.
#[test]
fn elephant_zoo_two_step_plan_is_minimum_cost() {
    let make_elephant = Action::new(
        "makeElephant",
        EffectSpec::new(),
        EffectSpec::new().with("hasElephant", true),
    )
    .with_cost(2.0);
    let build_zoo = Action::new(
        "buildZoo",
        EffectSpec::new().with("hasElephant", true),
        EffectSpec::new().with("hasZoo", true),
    )
    .with_cost(3.0);
    let teleport_zoo = Action::new("teleportZoo", EffectSpec::new(), EffectSpec::new().with("hasZoo", true))
        .with_cost(100.0);

    let planner = GoapPlanner::new(vec![make_elephant, build_zoo, teleport_zoo]);
    let goal = Goal::new("zoo", EffectSpec::new().with("hasZoo", true), 20.0);

    let plan = planner
        .plan(&PlanningSystem::new(), &Blackboard::new(), &WorldState::new(), &goal)
        .unwrap()
        .expect("a plan exists");

    assert_eq!(plan.actions, vec!["makeElephant".to_string(), "buildZoo".to_string()]);
    assert_eq!(plan.cost, 5.0);
}

/// Multiple goals compete for the same starting state; the planner must
/// maximize net value (`goal.value - plan.cost`), not just minimize cost.
#[test]
fn best_plan_across_goals_maximizes_net_value() {
    let cheap_trick = Action::new("cheapTrick", EffectSpec::new(), EffectSpec::new().with("trickDone", true))
        .with_cost(1.0);
    let grand_tour = Action::new("grandTour", EffectSpec::new(), EffectSpec::new().with("tourDone", true))
        .with_cost(40.0);

    let planner = GoapPlanner::new(vec![cheap_trick, grand_tour]);
    let trick_goal = Goal::new("trick", EffectSpec::new().with("trickDone", true), 5.0);
    let tour_goal = Goal::new("tour", EffectSpec::new().with("tourDone", true), 100.0);

    let plan = planner
        .best_plan(
            &PlanningSystem::new(),
            &Blackboard::new(),
            &WorldState::new(),
            &[trick_goal, tour_goal],
        )
        .unwrap()
        .expect("some goal is achievable");

    // net(trick) = 5 - 1 = 4; net(tour) = 100 - 40 = 60.
    assert_eq!(plan.goal_name, "tour");
}

/// A single UNKNOWN start-state condition, resolvable via a registered
/// evaluator, is determined on demand rather than blocking the plan.
#[test]
fn single_unknown_is_resolved_on_demand() {
    let mut system = PlanningSystem::new();
    system.register(embabel_core::system::ConditionEvaluator::new("hasPermit", |bb| {
        embabel_core::Determination::from(bb.last_of_type::<bool>().map(|v| *v))
    }));

    let mut blackboard = Blackboard::new();
    blackboard.add(true);

    let open_gate = Action::new(
        "openGate",
        EffectSpec::new().with("hasPermit", true),
        EffectSpec::new().with("gateOpen", true),
    );
    let planner = GoapPlanner::new(vec![open_gate]);
    let goal = Goal::new("gateOpen", EffectSpec::new().with("gateOpen", true), 10.0);

    let plan = planner
        .plan(&system, &blackboard, &WorldState::new(), &goal)
        .unwrap()
        .expect("resolved unknown unblocks the plan");

    assert_eq!(plan.actions, vec!["openGate".to_string()]);
}
