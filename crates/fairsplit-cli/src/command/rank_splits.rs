use std::path::PathBuf;

use chrono::Utc;
use fairsplit_core::{BalanceSeed, PlayerId};
use fairsplit_optimizer::TeamBalancer;

use crate::{
    schema::record::{SplitEntry, SplitRankingRecord},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RankSplitsArg {
    /// Players JSON file (an array of players)
    #[arg(long)]
    players: PathBuf,
    /// Partial configuration JSON, merged over the defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for split sampling when there are too many splits to enumerate
    #[arg(long)]
    seed: Option<BalanceSeed>,
    /// Number of splits to output
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RankSplitsArg) -> anyhow::Result<()> {
    let RankSplitsArg {
        players,
        config,
        seed,
        top,
        output,
    } = arg;

    let config = util::load_config(config.as_deref())?;
    let pool = util::read_players_file(players)?;
    let ids = pool.iter().map(|p| p.id.clone()).collect::<Vec<PlayerId>>();
    let names = pool.iter().map(|p| p.name.clone()).collect::<Vec<_>>();

    let ranking = TeamBalancer::new(config)?.rank_star_splits(pool, *seed)?;
    let stats = &ranking.stats;

    eprintln!("Stars: {}", stats.star_count);
    for index in &ranking.star_indices {
        eprintln!("  {}", names[*index]);
    }
    eprintln!(
        "Splits: {} evaluated{}",
        stats.evaluated,
        if stats.exhaustive { "" } else { " (sampled)" }
    );
    eprintln!("  Best:  {:.3}", stats.best);
    eprintln!("  Mean:  {:.3}", stats.mean);
    eprintln!("  Worst: {:.3}", stats.worst);
    eprintln!("  Penalty exponent:       {:.2}", stats.penalty_exponent);
    eprintln!("  Sampling concentration: {:.2}", stats.sampling_concentration);

    let join = |members: &[usize]| {
        members
            .iter()
            .map(|i| names[*i].as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    for split in ranking.splits.iter().take(*top) {
        eprintln!(
            "  #{:<3} {:.3}  A: [{}]  B: [{}]",
            split.rank,
            split.quality(),
            join(&split.team_a),
            join(&split.team_b)
        );
    }

    let record = SplitRankingRecord {
        generated_at: Utc::now(),
        seed: *seed,
        stats: *stats,
        splits: ranking
            .splits
            .iter()
            .take(*top)
            .map(|s| SplitEntry::new(s, &ids))
            .collect(),
    };
    Output::save_json(&record, output.clone())?;
    Ok(())
}
