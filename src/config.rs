use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "BFS puzzle suite",
    about = "Breadth-first solvers for six puzzle domains.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(
        long,
        help = "Path to the YAML scenario file",
        default_value = "puzzles/scenario.yaml"
    )]
    pub scenario_path: String,

    #[arg(
        long,
        help = "Node-expansion budget per search; exceeding it counts as no solution"
    )]
    pub max_expansions: Option<usize>,

    #[arg(
        long,
        help = "Seed for the random number generator",
        default_value_t = 0
    )]
    pub seed: usize,

    #[arg(
        long,
        help = "Abort the run on the first unsolved puzzle",
        default_value_t = false
    )]
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub scenario_path: String,
    pub max_expansions: Option<usize>,
    pub seed: usize,
    pub strict: bool,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            scenario_path: cli.scenario_path.clone(),
            max_expansions: cli.max_expansions,
            seed: cli.seed,
            strict: cli.strict,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_expansions == Some(0) {
            bail!("max expansions must be at least 1 when set");
        }
        Ok(())
    }
}
