use criterion::{black_box, criterion_group, criterion_main, Criterion};
use embabel_core::condition::EffectSpec;
use embabel_core::{Action, Blackboard, Goal, PlanningSystem, WorldState};
use embabel_goap::GoapPlanner;

fn chain_planner(steps: usize) -> (GoapPlanner, Goal) {
    let mut actions = Vec::with_capacity(steps);
    for i in 0..steps {
        let pre = if i == 0 {
            EffectSpec::new()
        } else {
            EffectSpec::new().with(format!("step{}", i - 1), true)
        };
        let eff = EffectSpec::new().with(format!("step{i}"), true);
        actions.push(Action::new(format!("step{i}"), pre, eff));
    }
    let goal = Goal::new(
        "chainDone",
        EffectSpec::new().with(format!("step{}", steps - 1), true),
        1.0,
    );
    (GoapPlanner::new(actions), goal)
}

fn bench_goap_planner(c: &mut Criterion) {
    let (planner, goal) = chain_planner(12);
    let system = PlanningSystem::new();
    let blackboard = Blackboard::new();
    let start = WorldState::new();

    c.bench_function("embabel-goap/planner.plan(chain=12)", |b| {
        b.iter(|| {
            let plan = planner.plan(&system, &blackboard, &start, &goal).unwrap().expect("plan");
            black_box(plan.len());
        })
    });
}

criterion_group!(benches, bench_goap_planner);
criterion_main!(benches);
