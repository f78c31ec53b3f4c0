use clap::{Parser, Subcommand};

use self::{
    balance::BalanceArg, default_config::DefaultConfigArg, formations::FormationsArg,
    rank_splits::RankSplitsArg,
};

mod balance;
mod default_config;
mod formations;
mod rank_splits;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Split a player pool into two balanced teams
    Balance(#[clap(flatten)] BalanceArg),
    /// Rank the ways of dividing the pool's stars between the teams
    RankSplits(#[clap(flatten)] RankSplitsArg),
    /// List the formation catalog
    Formations(#[clap(flatten)] FormationsArg),
    /// Print the default configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Balance(arg) => balance::run(&arg)?,
        Mode::RankSplits(arg) => rank_splits::run(&arg)?,
        Mode::Formations(arg) => formations::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
