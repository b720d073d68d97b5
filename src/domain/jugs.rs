use anyhow::{bail, Result};

use crate::engine;
use crate::stat::Stats;

/// The six jug operations, in the precedence order the search tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JugAction {
    Empty1,
    Empty2,
    Fill1,
    Fill2,
    Pour1To2,
    Pour2To1,
}

const ACTIONS: [JugAction; 6] = [
    JugAction::Empty1,
    JugAction::Empty2,
    JugAction::Fill1,
    JugAction::Fill2,
    JugAction::Pour1To2,
    JugAction::Pour2To1,
];

/// Two jugs of fixed capacity, starting empty, with a target amount that
/// either jug may end up holding. The reachable state space is bounded by
/// (capacity1 + 1) * (capacity2 + 1).
#[derive(Debug, Clone)]
pub struct JugPuzzle {
    pub capacity1: u32,
    pub capacity2: u32,
    pub goal: u32,
}

impl JugPuzzle {
    pub fn new(capacity1: u32, capacity2: u32, goal: u32) -> Result<Self> {
        if capacity1 == 0 && capacity2 == 0 {
            bail!("both jugs have zero capacity");
        }
        if goal > capacity1.max(capacity2) {
            bail!(
                "goal {goal} exceeds the larger jug capacity {}",
                capacity1.max(capacity2)
            );
        }
        Ok(JugPuzzle {
            capacity1,
            capacity2,
            goal,
        })
    }

    /// Amounts in the two jugs after applying `action`. Total over the
    /// action set: every action is legal in every state (pouring into a
    /// full jug moves zero water).
    pub fn apply(&self, (jug1, jug2): (u32, u32), action: JugAction) -> (u32, u32) {
        match action {
            JugAction::Empty1 => (0, jug2),
            JugAction::Empty2 => (jug1, 0),
            JugAction::Fill1 => (self.capacity1, jug2),
            JugAction::Fill2 => (jug1, self.capacity2),
            JugAction::Pour1To2 => {
                let amount = jug1.min(self.capacity2 - jug2);
                (jug1 - amount, jug2 + amount)
            }
            JugAction::Pour2To1 => {
                let amount = jug2.min(self.capacity1 - jug1);
                (jug1 + amount, jug2 - amount)
            }
        }
    }

    /// Shortest action sequence from empty jugs to either jug holding the
    /// goal amount. `None` when the goal is not a multiple of
    /// gcd(capacity1, capacity2) and therefore unreachable.
    pub fn plan(&self) -> Option<Vec<JugAction>> {
        self.plan_with_stats(None, &mut Stats::default())
    }

    pub fn plan_with_stats(
        &self,
        max_expansions: Option<usize>,
        stats: &mut Stats,
    ) -> Option<Vec<JugAction>> {
        engine::search_bounded(
            (0u32, 0u32),
            |&(jug1, jug2)| jug1 == self.goal || jug2 == self.goal,
            |&state| {
                ACTIONS
                    .iter()
                    .map(|&action| (action, self.apply(state, action)))
                    .collect()
            },
            max_expansions,
            stats,
        )
    }

    pub fn verify_plan(&self, actions: &[JugAction]) -> bool {
        let mut state = (0, 0);
        for &action in actions {
            state = self.apply(state, action);
        }
        state.0 == self.goal || state.1 == self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_oversized_goal() {
        assert!(JugPuzzle::new(3, 5, 6).is_err());
        assert!(JugPuzzle::new(0, 0, 0).is_err());
        assert!(JugPuzzle::new(3, 5, 4).is_ok());
    }

    #[test]
    fn test_pour_moves_min_of_source_and_room() {
        let puzzle = JugPuzzle::new(3, 5, 4).unwrap();
        assert_eq!(puzzle.apply((3, 4), JugAction::Pour1To2), (2, 5));
        assert_eq!(puzzle.apply((1, 5), JugAction::Pour2To1), (3, 3));
        assert_eq!(puzzle.apply((0, 2), JugAction::Pour1To2), (0, 2));
    }

    #[test]
    fn test_classic_three_five_four() {
        let puzzle = JugPuzzle::new(3, 5, 4).unwrap();
        let plan = puzzle.plan().unwrap();
        assert!(plan.len() <= 6);
        assert!(puzzle.verify_plan(&plan));
    }

    #[test]
    fn test_five_seven_six_is_solvable() {
        let puzzle = JugPuzzle::new(5, 7, 6).unwrap();
        let plan = puzzle.plan().unwrap();
        assert!(puzzle.verify_plan(&plan));
    }

    #[test]
    fn test_gcd_blocked_goal_returns_none() {
        // gcd(4, 6) = 2 does not divide 3.
        let puzzle = JugPuzzle::new(4, 6, 3).unwrap();
        assert_eq!(puzzle.plan(), None);
    }

    #[test]
    fn test_zero_goal_is_a_zero_length_plan() {
        let puzzle = JugPuzzle::new(3, 5, 0).unwrap();
        assert_eq!(puzzle.plan(), Some(vec![]));
    }

    #[test]
    fn test_plan_is_optimal_for_three_five_four() {
        // Exhaustive check: no shorter sequence works.
        let puzzle = JugPuzzle::new(3, 5, 4).unwrap();
        let shortest = puzzle.plan().unwrap().len();
        let mut sequences: Vec<Vec<JugAction>> = vec![vec![]];
        for depth in 0..shortest {
            let mut next = Vec::new();
            for seq in &sequences {
                assert!(
                    !puzzle.verify_plan(seq),
                    "found a plan of length {depth} < {shortest}"
                );
                for &action in &ACTIONS {
                    let mut longer = seq.clone();
                    longer.push(action);
                    next.push(longer);
                }
            }
            sequences = next;
        }
    }
}
