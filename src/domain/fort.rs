use crate::engine;
use crate::stat::Stats;

/// Characters in the puzzle, including the counterweight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Character {
    Weight,
    Amelia,
    Olivia,
    Lucas,
}

pub const CHARACTERS: [Character; 4] = [
    Character::Weight,
    Character::Amelia,
    Character::Olivia,
    Character::Lucas,
];

impl Character {
    pub fn kilograms(self) -> u32 {
        match self {
            Character::Weight => 25,
            Character::Amelia => 50,
            Character::Olivia => 75,
            Character::Lucas => 125,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Character::Weight => 0b0001,
            Character::Amelia => 0b0010,
            Character::Olivia => 0b0100,
            Character::Lucas => 0b1000,
        }
    }
}

/// A set of characters, encoded as a bitmask so that equality and
/// hashing are order-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharSet(u8);

impl CharSet {
    pub fn contains(self, ch: Character) -> bool {
        self.0 & ch.bit() != 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn kilograms(self) -> u32 {
        self.iter().map(Character::kilograms).sum()
    }

    pub fn iter(self) -> impl Iterator<Item = Character> {
        CHARACTERS.into_iter().filter(move |ch| self.contains(*ch))
    }

    fn with(self, ch: Character) -> CharSet {
        CharSet(self.0 | ch.bit())
    }

    fn without(self, ch: Character) -> CharSet {
        CharSet(self.0 & !ch.bit())
    }
}

/// Where everyone is: up on the wall, down on the ground, or riding one
/// of the two pulley ends. `end1_up` tracks which end is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FortState {
    pub up: CharSet,
    pub down: CharSet,
    pub end1: CharSet,
    pub end2: CharSet,
    pub end1_up: bool,
}

impl FortState {
    /// Fresh puzzle: everyone up, both baskets empty, end 1 raised.
    pub fn initial() -> Self {
        let everyone = CHARACTERS
            .into_iter()
            .fold(CharSet::default(), CharSet::with);
        FortState {
            up: everyone,
            down: CharSet::default(),
            end1: CharSet::default(),
            end2: CharSet::default(),
            end1_up: true,
        }
    }

    /// Amelia, Olivia and Lucas have all reached the ground.
    pub fn escaped(&self) -> bool {
        self.down.contains(Character::Amelia)
            && self.down.contains(Character::Olivia)
            && self.down.contains(Character::Lucas)
    }

    fn upper_end(&self) -> CharSet {
        if self.end1_up {
            self.end1
        } else {
            self.end2
        }
    }

    fn lower_end(&self) -> CharSet {
        if self.end1_up {
            self.end2
        } else {
            self.end1
        }
    }

    fn with_ends(&self, upper: CharSet, lower: CharSet) -> FortState {
        let (end1, end2) = if self.end1_up {
            (upper, lower)
        } else {
            (lower, upper)
        };
        FortState { end1, end2, ..*self }
    }

    /// Attempt one action. `None` when the action is illegal in this
    /// state: the pulley only swings when the raised end is exactly one
    /// weight unit (25 kg) heavier, and the counterweight can never be
    /// loaded or unloaded without someone on the relevant side to handle
    /// it.
    pub fn apply(&self, action: FortAction) -> Option<FortState> {
        match action {
            FortAction::LowerPulley => {
                let mut diff =
                    self.end1.kilograms() as i32 - self.end2.kilograms() as i32;
                if !self.end1_up {
                    diff = -diff;
                }
                (diff == 25).then(|| FortState {
                    end1_up: !self.end1_up,
                    ..*self
                })
            }
            FortAction::LoadUp(ch) => {
                if !self.up.contains(ch) {
                    return None;
                }
                if ch == Character::Weight && self.up.len() == 1 {
                    return None;
                }
                let next = self.with_ends(self.upper_end().with(ch), self.lower_end());
                Some(FortState {
                    up: self.up.without(ch),
                    ..next
                })
            }
            FortAction::LoadDown(ch) => {
                if !self.down.contains(ch) {
                    return None;
                }
                if ch == Character::Weight && self.down.len() == 1 {
                    return None;
                }
                let next = self.with_ends(self.upper_end(), self.lower_end().with(ch));
                Some(FortState {
                    down: self.down.without(ch),
                    ..next
                })
            }
            FortAction::UnloadUp(ch) => {
                if !self.upper_end().contains(ch) {
                    return None;
                }
                if ch == Character::Weight && self.up.is_empty() {
                    return None;
                }
                let next = self.with_ends(self.upper_end().without(ch), self.lower_end());
                Some(FortState {
                    up: self.up.with(ch),
                    ..next
                })
            }
            FortAction::UnloadDown(ch) => {
                if !self.lower_end().contains(ch) {
                    return None;
                }
                if ch == Character::Weight && self.down.is_empty() {
                    return None;
                }
                let next = self.with_ends(self.upper_end(), self.lower_end().without(ch));
                Some(FortState {
                    down: self.down.with(ch),
                    ..next
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FortAction {
    LowerPulley,
    LoadUp(Character),
    UnloadUp(Character),
    LoadDown(Character),
    UnloadDown(Character),
}

fn all_actions() -> Vec<FortAction> {
    let mut actions = vec![FortAction::LowerPulley];
    for ch in CHARACTERS {
        actions.push(FortAction::LoadUp(ch));
        actions.push(FortAction::UnloadUp(ch));
        actions.push(FortAction::LoadDown(ch));
        actions.push(FortAction::UnloadDown(ch));
    }
    actions
}

fn expand(state: &FortState) -> Vec<(FortAction, FortState)> {
    all_actions()
        .into_iter()
        .filter_map(|action| state.apply(action).map(|next| (action, next)))
        .collect()
}

/// Shortest escape plan for the fixed puzzle instance.
pub fn find_solution() -> Option<Vec<FortAction>> {
    find_solution_with_stats(None, &mut Stats::default())
}

pub fn find_solution_with_stats(
    max_expansions: Option<usize>,
    stats: &mut Stats,
) -> Option<Vec<FortAction>> {
    engine::search_bounded(
        FortState::initial(),
        FortState::escaped,
        expand,
        max_expansions,
        stats,
    )
}

/// Replays the plan from the fresh puzzle and checks everyone escaped.
pub fn verify_solution(actions: &[FortAction]) -> bool {
    let mut state = FortState::initial();
    for &action in actions {
        state = match state.apply(action) {
            Some(next) => next,
            None => return false,
        };
    }
    state.escaped()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowering_needs_exact_weight_difference() {
        let state = FortState::initial();
        // Both ends empty: difference 0, pulley stays put.
        assert_eq!(state.apply(FortAction::LowerPulley), None);

        let loaded = state.apply(FortAction::LoadUp(Character::Weight)).unwrap();
        let lowered = loaded.apply(FortAction::LowerPulley).unwrap();
        assert!(!lowered.end1_up);
        assert!(lowered.end1.contains(Character::Weight));

        // 50 kg up vs nothing down: difference is 50, not 25.
        let amelia = state.apply(FortAction::LoadUp(Character::Amelia)).unwrap();
        assert_eq!(amelia.apply(FortAction::LowerPulley), None);
    }

    #[test]
    fn test_weight_cannot_serve_itself() {
        // Strip everyone but the weight off the wall side.
        let mut state = FortState::initial();
        for ch in [Character::Amelia, Character::Olivia, Character::Lucas] {
            state = state.apply(FortAction::LoadUp(ch)).unwrap();
        }
        assert_eq!(state.up.len(), 1);
        assert_eq!(state.apply(FortAction::LoadUp(Character::Weight)), None);
    }

    #[test]
    fn test_unloading_weight_needs_a_receiver() {
        let state = FortState::initial()
            .apply(FortAction::LoadUp(Character::Weight))
            .unwrap()
            .apply(FortAction::LowerPulley)
            .unwrap();
        // The weight sits in the grounded basket and nobody is down yet.
        assert!(state.lower_end().contains(Character::Weight));
        assert_eq!(state.apply(FortAction::UnloadDown(Character::Weight)), None);
    }

    #[test]
    fn test_set_encoding_is_order_independent() {
        let a = FortState::initial()
            .apply(FortAction::LoadUp(Character::Weight))
            .unwrap()
            .apply(FortAction::LoadUp(Character::Amelia))
            .unwrap();
        let b = FortState::initial()
            .apply(FortAction::LoadUp(Character::Amelia))
            .unwrap()
            .apply(FortAction::LoadUp(Character::Weight))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_expand_is_idempotent() {
        let state = FortState::initial();
        assert_eq!(expand(&state), expand(&state));
    }

    #[test]
    fn test_full_escape() {
        let plan = find_solution().unwrap();
        assert_eq!(plan.len(), 29);
        assert!(verify_solution(&plan));
    }

    #[test]
    fn test_verify_rejects_truncated_plan() {
        let mut plan = find_solution().unwrap();
        plan.pop();
        assert!(!verify_solution(&plan));
    }
}
