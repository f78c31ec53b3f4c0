use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use fairsplit_core::BalanceSeed;
use fairsplit_optimizer::{BalanceResult, TeamBalancer};

use crate::{
    schema::record::BalanceRecord,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BalanceArg {
    /// Players JSON file (an array of players)
    #[arg(long)]
    players: PathBuf,
    /// Partial configuration JSON, merged over the defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible run (32 hex digits)
    #[arg(long)]
    seed: Option<BalanceSeed>,
    /// Override the number of Monte Carlo iterations
    #[arg(long)]
    iterations: Option<usize>,
    /// Custom formation catalog JSON (an array of formations)
    #[arg(long)]
    formations: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Do not print the diagnostic report
    #[arg(long)]
    quiet: bool,
}

pub(crate) fn run(arg: &BalanceArg) -> anyhow::Result<()> {
    let BalanceArg {
        players,
        config,
        seed,
        iterations,
        formations,
        output,
        quiet,
    } = arg;

    let mut config = util::load_config(config.as_deref())?;
    if let Some(iterations) = iterations {
        config.monte_carlo.max_iterations = *iterations;
    }
    let catalog = util::load_catalog(formations.as_deref())?;
    let balancer = TeamBalancer::new(config)?.with_catalog(catalog);

    let pool = util::read_players_file(players)?;
    if !quiet {
        eprintln!(
            "Balancing {} players ({} iterations)...",
            pool.len(),
            balancer.config().monte_carlo.max_iterations
        );
    }
    let result = match seed {
        Some(seed) => balancer.balance_with_seed(pool, *seed),
        None => balancer.balance(pool),
    }
    .with_context(|| format!("Failed to balance players from {}", players.display()))?;

    if !quiet {
        print_summary(&result);
    }

    let record = BalanceRecord {
        generated_at: Utc::now(),
        players_file: players.display().to_string(),
        result: &result,
    };
    Output::save_json(&record, output.clone())?;

    if !quiet && let Some(path) = output {
        eprintln!("Teams saved to {}", path.display());
    }
    Ok(())
}

fn print_summary(result: &BalanceResult) {
    eprintln!();
    eprintln!("{}", result.diagnostic_text);
    eprintln!();
    eprintln!("Replay with --seed {}", result.stats.seed);
}
