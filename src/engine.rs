use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::Instant;

use tracing::debug;

use crate::stat::Stats;

/// One discovered state plus the bookkeeping needed to rebuild the path.
/// Nodes live in a per-search arena and refer to their parent by index,
/// so the parent chain of any node is the shortest known path to it.
struct SearchNode<S, A> {
    state: S,
    parent: Option<usize>,
    action: Option<A>,
}

/// Breadth-first search over an implicitly defined graph.
///
/// `expand` enumerates `(action, successor)` pairs for a state; illegal
/// moves are simply absent from the enumeration. Returns the action
/// sequence of a shortest plan, or `None` once every reachable state has
/// been visited without satisfying `is_goal`. An empty vector means the
/// initial state already is a goal.
///
/// Because the frontier is strictly FIFO and every edge has unit cost,
/// the first time a state is inserted into the visited table it is via a
/// minimum-action path, so no node is ever re-opened.
pub fn search<S, A>(
    initial: S,
    is_goal: impl Fn(&S) -> bool,
    expand: impl FnMut(&S) -> Vec<(A, S)>,
) -> Option<Vec<A>>
where
    S: Clone + Eq + Hash,
    A: Clone,
{
    search_with_stats(initial, is_goal, expand, &mut Stats::default())
}

/// Same as [`search`] but records expansion counters and timing into
/// `stats` for the caller to report.
pub fn search_with_stats<S, A>(
    initial: S,
    is_goal: impl Fn(&S) -> bool,
    mut expand: impl FnMut(&S) -> Vec<(A, S)>,
    stats: &mut Stats,
) -> Option<Vec<A>>
where
    S: Clone + Eq + Hash,
    A: Clone,
{
    let search_start_time = Instant::now();

    let mut nodes: Vec<SearchNode<S, A>> = Vec::new();
    let mut visited: HashMap<S, usize> = HashMap::new();
    let mut frontier: VecDeque<usize> = VecDeque::new();

    nodes.push(SearchNode {
        state: initial.clone(),
        parent: None,
        action: None,
    });
    visited.insert(initial, 0);
    frontier.push_back(0);

    while let Some(current) = frontier.pop_front() {
        if is_goal(&nodes[current].state) {
            let plan = construct_plan(&nodes, current);
            stats.visited_states = visited.len();
            stats.plan_length = plan.len();
            stats.time_us = search_start_time.elapsed().as_micros() as usize;
            return Some(plan);
        }

        stats.expanded_nodes += 1;
        for (action, next_state) in expand(&nodes[current].state) {
            stats.generated_nodes += 1;
            if visited.contains_key(&next_state) {
                continue;
            }
            let child = nodes.len();
            visited.insert(next_state.clone(), child);
            nodes.push(SearchNode {
                state: next_state,
                parent: Some(current),
                action: Some(action),
            });
            frontier.push_back(child);
        }
    }

    stats.visited_states = visited.len();
    stats.time_us = search_start_time.elapsed().as_micros() as usize;
    debug!("search exhausted {} states without a goal", visited.len());
    None
}

/// [`search`] under an optional node-expansion budget. The cap is
/// imposed on the caller side of the engine contract: once
/// `max_expansions` nodes have been expanded, remaining states stop
/// producing successors and the search drains to `None` ("no path
/// within budget").
pub fn search_bounded<S, A>(
    initial: S,
    is_goal: impl Fn(&S) -> bool,
    mut expand: impl FnMut(&S) -> Vec<(A, S)>,
    max_expansions: Option<usize>,
    stats: &mut Stats,
) -> Option<Vec<A>>
where
    S: Clone + Eq + Hash,
    A: Clone,
{
    let mut expansions = 0;
    search_with_stats(
        initial,
        is_goal,
        |state| {
            if max_expansions.is_some_and(|cap| expansions >= cap) {
                return Vec::new();
            }
            expansions += 1;
            expand(state)
        },
        stats,
    )
}

/// Walk the parent chain from the goal node back to the root, then
/// reverse so the plan runs start to goal.
fn construct_plan<S, A: Clone>(nodes: &[SearchNode<S, A>], mut current: usize) -> Vec<A> {
    let mut plan = Vec::new();
    while let Some(parent) = nodes[current].parent {
        // Every non-root node was created with the action that produced it.
        if let Some(action) = nodes[current].action.clone() {
            plan.push(action);
        }
        current = parent;
    }
    plan.reverse();
    plan
}
