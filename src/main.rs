use bfs_rust::config::{Cli, Config};
use bfs_rust::scenario::{Outcome, Scenario};

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();
    let cli = Cli::parse();

    let config = Config::new(&cli);
    config.validate()?;

    let scenario = Scenario::load_from_file(&config.scenario_path)
        .with_context(|| format!("error with scenario file: {}", config.scenario_path))?;
    let mut rng = StdRng::seed_from_u64(config.seed as u64);

    let mut solved = 0;
    let mut unsolved = 0;
    for job in &scenario.puzzles {
        info!("Solving {} puzzle", job.name());
        match job
            .run(config.max_expansions, &mut rng)
            .with_context(|| format!("{} puzzle failed", job.name()))?
        {
            Outcome::Solved { plan_length } => {
                info!("{} solved with a {plan_length}-step plan", job.name());
                solved += 1;
            }
            Outcome::NoSolution => {
                if config.strict {
                    bail!("{} puzzle has no solution", job.name());
                }
                unsolved += 1;
            }
        }
    }

    info!("Scenario finished: {solved} solved, {unsolved} without a solution");
    Ok(())
}
