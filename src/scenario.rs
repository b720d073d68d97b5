use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use tracing::{info, warn};

use crate::domain::fifteen::FifteenPuzzle;
use crate::domain::fort;
use crate::domain::jugs::JugPuzzle;
use crate::domain::maze::Maze;
use crate::domain::rushhour::RushHourPuzzle;
use crate::domain::snake::SnakePuzzle;
use crate::stat::Stats;

/// One puzzle instance to solve, as listed in a scenario YAML file.
/// File-backed domains name their board file; the rest carry their
/// parameters inline. `snake_random` draws an instance from the run's
/// seeded rng so scenarios stay reproducible.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleJob {
    Maze {
        path: String,
    },
    Snake {
        snake: Vec<[usize; 2]>,
        food: [usize; 2],
    },
    SnakeRandom {
        length: usize,
    },
    Jugs {
        capacity1: u32,
        capacity2: u32,
        goal: u32,
    },
    Fort,
    Fifteen {
        path: String,
    },
    Rushhour {
        path: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    // One-key-map form (`- maze: {path: ...}`) rather than YAML tags.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub puzzles: Vec<PuzzleJob>,
}

/// What one job produced: a verified plan of some length, or an honest
/// "no solution". Malformed inputs never get this far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Solved { plan_length: usize },
    NoSolution,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Scenario> {
        let file =
            File::open(path).with_context(|| format!("failed to open scenario file {path:?}"))?;
        let reader = BufReader::new(file);
        let scenario: Scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("malformed scenario file {path:?}"))?;
        if scenario.puzzles.is_empty() {
            bail!("scenario file {path:?} lists no puzzles");
        }
        Ok(scenario)
    }
}

impl PuzzleJob {
    pub fn name(&self) -> &'static str {
        match self {
            PuzzleJob::Maze { .. } => "maze",
            PuzzleJob::Snake { .. } => "snake",
            PuzzleJob::SnakeRandom { .. } => "snake_random",
            PuzzleJob::Jugs { .. } => "jugs",
            PuzzleJob::Fort => "fort",
            PuzzleJob::Fifteen { .. } => "fifteen",
            PuzzleJob::Rushhour { .. } => "rushhour",
        }
    }

    /// Loads the instance, solves it and replays the returned plan from
    /// the initial state through the same transition rules as an
    /// independent check before reporting it solved.
    pub fn run(&self, max_expansions: Option<usize>, rng: &mut StdRng) -> Result<Outcome> {
        let mut stats = Stats::default();
        let outcome = match self {
            PuzzleJob::Maze { path } => {
                let maze = Maze::from_file(path)?;
                match maze.find_path_with_stats(max_expansions, &mut stats) {
                    Some(path) => {
                        if !maze.verify_path(&path) {
                            bail!("maze plan failed replay verification");
                        }
                        info!("maze path: {path:?}");
                        Outcome::Solved {
                            plan_length: path.len(),
                        }
                    }
                    None => Outcome::NoSolution,
                }
            }
            PuzzleJob::Snake { snake, food } => {
                let cells = snake.iter().map(|&[row, col]| (row, col)).collect();
                let puzzle = SnakePuzzle::new(cells, (food[0], food[1]))?;
                Self::finish_snake(&puzzle, max_expansions, &mut stats)?
            }
            PuzzleJob::SnakeRandom { length } => {
                let puzzle = SnakePuzzle::generate(*length, rng)?;
                Self::finish_snake(&puzzle, max_expansions, &mut stats)?
            }
            PuzzleJob::Jugs {
                capacity1,
                capacity2,
                goal,
            } => {
                let puzzle = JugPuzzle::new(*capacity1, *capacity2, *goal)?;
                match puzzle.plan_with_stats(max_expansions, &mut stats) {
                    Some(plan) => {
                        if !puzzle.verify_plan(&plan) {
                            bail!("jug plan failed replay verification");
                        }
                        info!("jug plan: {plan:?}");
                        Outcome::Solved {
                            plan_length: plan.len(),
                        }
                    }
                    None => Outcome::NoSolution,
                }
            }
            PuzzleJob::Fort => match fort::find_solution_with_stats(max_expansions, &mut stats) {
                Some(plan) => {
                    if !fort::verify_solution(&plan) {
                        bail!("fort plan failed replay verification");
                    }
                    info!("fort plan: {plan:?}");
                    Outcome::Solved {
                        plan_length: plan.len(),
                    }
                }
                None => Outcome::NoSolution,
            },
            PuzzleJob::Fifteen { path } => {
                let puzzle = FifteenPuzzle::from_file(path)?;
                match puzzle.find_instructions_with_stats(max_expansions, &mut stats) {
                    Some(plan) => {
                        if !puzzle.verify_instructions(&plan) {
                            bail!("fifteen-puzzle plan failed replay verification");
                        }
                        info!("fifteen-puzzle plan: {plan:?}");
                        Outcome::Solved {
                            plan_length: plan.len(),
                        }
                    }
                    None => Outcome::NoSolution,
                }
            }
            PuzzleJob::Rushhour { path } => {
                let puzzle = RushHourPuzzle::from_file(path)?;
                match puzzle.find_instructions_with_stats(max_expansions, &mut stats) {
                    Some(plan) => {
                        if !puzzle.verify_instructions(&plan) {
                            bail!("rush-hour plan failed replay verification");
                        }
                        info!("rush-hour plan: {plan:?}");
                        Outcome::Solved {
                            plan_length: plan.len(),
                        }
                    }
                    None => Outcome::NoSolution,
                }
            }
        };

        stats.print(self.name());
        if outcome == Outcome::NoSolution {
            warn!("{}: no solution", self.name());
        }
        Ok(outcome)
    }

    fn finish_snake(
        puzzle: &SnakePuzzle,
        max_expansions: Option<usize>,
        stats: &mut Stats,
    ) -> Result<Outcome> {
        match puzzle.find_directions_with_stats(max_expansions, stats) {
            Some(plan) => {
                if !puzzle.verify_directions(&plan) {
                    bail!("snake plan failed replay verification");
                }
                info!("snake plan: {plan:?}");
                Ok(Outcome::Solved {
                    plan_length: plan.len(),
                })
            }
            None => Ok(Outcome::NoSolution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_parse_scenario_yaml() {
        let yaml = "\
puzzles:
  - maze:
      path: puzzles/mazes/1.txt
  - jugs:
      capacity1: 3
      capacity2: 5
      goal: 4
  - fort
  - snake_random:
      length: 5
  - fifteen:
      path: puzzles/boards/1.json
  - rushhour:
      path: puzzles/challenges/1.json
";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.puzzles.len(), 6);
        assert_eq!(scenario.puzzles[0].name(), "maze");
        assert_eq!(scenario.puzzles[2].name(), "fort");
    }

    #[test]
    fn test_load_default_scenario_file() {
        let scenario = Scenario::load_from_file("puzzles/scenario.yaml").unwrap();
        assert_eq!(scenario.puzzles.len(), 9);
    }

    #[test]
    fn test_inline_jobs_round_trip() {
        let seed = [0u8; 32];
        let mut rng = StdRng::from_seed(seed);

        let job = PuzzleJob::Jugs {
            capacity1: 3,
            capacity2: 5,
            goal: 4,
        };
        match job.run(None, &mut rng).unwrap() {
            Outcome::Solved { plan_length } => assert!(plan_length <= 6),
            Outcome::NoSolution => panic!("jugs (3, 5, 4) is solvable"),
        }

        let job = PuzzleJob::Jugs {
            capacity1: 4,
            capacity2: 6,
            goal: 3,
        };
        assert_eq!(job.run(None, &mut rng).unwrap(), Outcome::NoSolution);

        let job = PuzzleJob::Snake {
            snake: vec![[16, 14], [16, 15], [16, 16]],
            food: [16, 20],
        };
        assert_eq!(
            job.run(None, &mut rng).unwrap(),
            Outcome::Solved { plan_length: 4 }
        );
    }

    #[test]
    fn test_budget_exhaustion_reports_no_solution() {
        let seed = [0u8; 32];
        let mut rng = StdRng::from_seed(seed);
        let job = PuzzleJob::Jugs {
            capacity1: 3,
            capacity2: 5,
            goal: 4,
        };
        assert_eq!(job.run(Some(1), &mut rng).unwrap(), Outcome::NoSolution);
    }

    #[test]
    fn test_malformed_inline_job_fails_fast() {
        let seed = [0u8; 32];
        let mut rng = StdRng::from_seed(seed);
        let job = PuzzleJob::Snake {
            snake: vec![[16, 14], [16, 16]],
            food: [16, 20],
        };
        assert!(job.run(None, &mut rng).is_err());
    }
}
