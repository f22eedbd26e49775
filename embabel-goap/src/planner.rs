use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::collections::BinaryHeap;

use embabel_core::condition::ConditionName;
use embabel_core::{Action, Blackboard, Goal, GoapError, Plan, PlanningSystem, WorldState};

/// Forward-search A*-shaped planner over named, three-valued world-state
/// conditions. Ties within a goal's candidate plans are broken by (in
/// order): lower cost, higher resulting goal value, shorter plan, then
/// lexicographically smaller action-name sequence.
#[derive(Debug, Clone)]
pub struct GoapPlanner {
    actions: Vec<Action>,
    config: GoapPlannerConfig,
}

/// A fixed bound on how many UNKNOWN start-state conditions the optimizing
/// extension will resolve one at a time before giving up. Enumerating every
/// combination of unknowns is exponential in their count; this core's
/// scenarios never need more than a handful resolved per plan.
pub const MAX_UNKNOWN_RESOLUTIONS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct GoapPlannerConfig {
    pub max_expansions: usize,
}

impl Default for GoapPlannerConfig {
    fn default() -> Self {
        Self { max_expansions: 4096 }
    }
}

/// A search node: the world state reached, plus the set of non-rerunnable
/// action names already used to reach it (so `canRerun=false` actions can be
/// excluded from further expansion along this path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Node {
    world: WorldState,
    used_once: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct HeapEntry {
    cost: f64,
    node: Node,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the lowest cost first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl GoapPlanner {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            config: GoapPlannerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GoapPlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Plan toward `goal`, resolving at most `MAX_UNKNOWN_RESOLUTIONS` start-
    /// state unknowns one at a time via `system`/`blackboard` before giving
    /// up the search. Returns `Ok(None)` if no plan reaches the goal within
    /// the expansion budget; `Err` only for the unknown-resolution bound.
    pub fn plan(
        &self,
        system: &PlanningSystem,
        blackboard: &Blackboard,
        start: &WorldState,
        goal: &Goal,
    ) -> Result<Option<Plan>, GoapError> {
        let mut state = start.clone();
        let mut resolutions = 0usize;

        loop {
            let unknowns = self.relevant_unknowns(goal, &state);
            if unknowns.is_empty() {
                break;
            }
            if resolutions >= MAX_UNKNOWN_RESOLUTIONS {
                return Err(GoapError::MultipleUnknownsUnhandled {
                    goal: goal.name.clone(),
                    unknown_count: unknowns.len(),
                    bound: MAX_UNKNOWN_RESOLUTIONS,
                });
            }
            let name = unknowns[0].clone();
            let determined = system.determine_condition(&name, blackboard);
            if determined.is_unknown() {
                // The evaluator itself can't decide; leave it as a wildcard
                // and let the search's own UNKNOWN handling carry it.
                break;
            }
            state = state.with_override(name, determined);
            resolutions += 1;
        }

        Ok(self.plan_from(&state, goal))
    }

    /// Conditions unknown in `state` that something in the search actually
    /// cares about (named either by the goal's own preconditions or by some
    /// action's preconditions).
    fn relevant_unknowns(&self, goal: &Goal, state: &WorldState) -> Vec<ConditionName> {
        let mut names: BTreeSet<ConditionName> = BTreeSet::new();
        for (name, determination) in goal.preconditions.iter() {
            if !determination.is_unknown() {
                names.insert(name.clone());
            }
        }
        for action in &self.actions {
            for (name, determination) in action.preconditions.iter() {
                if !determination.is_unknown() {
                    names.insert(name.clone());
                }
            }
        }
        names.into_iter().filter(|name| state.get(name).is_unknown()).collect()
    }

    /// Across several goals, plan to each and pick the one maximizing
    /// `goal.value(resultingState) - plan.cost`. Goals with no plan are
    /// skipped; `Ok(None)` if none are achievable. Ties are broken by
    /// lexicographically smaller goal name, for determinism.
    pub fn best_plan(
        &self,
        system: &PlanningSystem,
        blackboard: &Blackboard,
        start: &WorldState,
        goals: &[Goal],
    ) -> Result<Option<Plan>, GoapError> {
        let mut best: Option<(f64, Plan)> = None;
        for goal in goals {
            let Some(plan) = self.plan(system, blackboard, start, goal)? else {
                continue;
            };
            let resulting = plan.resulting_state(&self.registry());
            let net = goal.value(&resulting) - plan.cost;
            let take = match &best {
                None => true,
                Some((best_net, best_plan)) => {
                    net > *best_net || (net == *best_net && plan.goal_name < best_plan.goal_name)
                }
            };
            if take {
                best = Some((net, plan));
            }
        }
        Ok(best.map(|(_, plan)| plan))
    }

    /// Actions that appear in at least one plan to some goal, for
    /// introspection or a reduced-search-space follow-up planner.
    pub fn prune(
        &self,
        system: &PlanningSystem,
        blackboard: &Blackboard,
        start: &WorldState,
        goals: &[Goal],
    ) -> Result<GoapPlanner, GoapError> {
        let mut used: HashSet<String> = HashSet::new();
        for goal in goals {
            if let Some(plan) = self.plan(system, blackboard, start, goal)? {
                used.extend(plan.actions.iter().cloned());
            }
        }
        let kept = self
            .actions
            .iter()
            .filter(|a| used.contains(&a.name))
            .cloned()
            .collect();
        Ok(GoapPlanner {
            actions: kept,
            config: self.config,
        })
    }

    fn registry(&self) -> HashMap<String, Action> {
        self.actions.iter().map(|a| (a.name.clone(), a.clone())).collect()
    }

    /// Uniform-cost forward search from `state` to the minimum-cost state
    /// satisfying `goal`, honoring `canRerun=false`. Among equal-cost
    /// candidates, applies the documented tie-break cascade.
    fn plan_from(&self, state: &WorldState, goal: &Goal) -> Option<Plan> {
        let start_node = Node {
            world: state.clone(),
            used_once: BTreeSet::new(),
        };

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<Node, f64> = HashMap::new();
        let mut came_from: HashMap<Node, (Node, String)> = HashMap::new();
        let mut settled: HashSet<Node> = HashSet::new();

        g_score.insert(start_node.clone(), 0.0);
        open.push(HeapEntry {
            cost: 0.0,
            node: start_node.clone(),
        });

        let mut expansions = 0usize;

        while let Some(HeapEntry { cost, node }) = open.pop() {
            if settled.contains(&node) {
                continue;
            }
            settled.insert(node.clone());

            expansions += 1;
            if expansions > self.config.max_expansions {
                break;
            }

            for action in &self.actions {
                if !action.can_rerun && node.used_once.contains(&action.name) {
                    continue;
                }
                if !node.world.satisfies(&action.preconditions) {
                    continue;
                }

                let next_world = action.apply(&node.world);
                let mut next_used = node.used_once.clone();
                if !action.can_rerun {
                    next_used.insert(action.name.clone());
                }
                let next_node = Node {
                    world: next_world,
                    used_once: next_used,
                };
                if next_node == node {
                    continue;
                }

                let next_cost = cost + action.cost(&node.world);
                let improves = g_score.get(&next_node).is_none_or(|&g| next_cost < g);
                if improves {
                    g_score.insert(next_node.clone(), next_cost);
                    came_from.insert(next_node.clone(), (node.clone(), action.name.clone()));
                    open.push(HeapEntry {
                        cost: next_cost,
                        node: next_node,
                    });
                }
            }
        }

        let mut candidates: Vec<(f64, f64, Vec<String>, Node)> = Vec::new();
        for node in &settled {
            if !node.world.satisfies_goal(goal) {
                continue;
            }
            let cost = *g_score.get(node).expect("settled node has a g-score");
            let actions = reconstruct(&came_from, node);
            let value = goal.value(&node.world);
            candidates.push((cost, value, actions, node.clone()));
        }

        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
                .then_with(|| a.2.len().cmp(&b.2.len()))
                .then_with(|| a.2.cmp(&b.2))
        });

        candidates
            .into_iter()
            .next()
            .map(|(cost, _value, actions, _node)| Plan::new(actions, goal.name.clone(), state.clone(), cost))
    }
}

fn reconstruct(came_from: &HashMap<Node, (Node, String)>, goal_node: &Node) -> Vec<String> {
    let mut actions = Vec::new();
    let mut current = goal_node.clone();
    while let Some((prev, action_name)) = came_from.get(&current) {
        actions.push(action_name.clone());
        current = prev.clone();
    }
    actions.reverse();
    actions
}
