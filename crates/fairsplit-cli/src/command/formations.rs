use std::path::PathBuf;

use fairsplit_core::{Formation, Position};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FormationsArg {
    /// Only list formations for this many players per team
    #[arg(long)]
    team_size: Option<usize>,
    /// Custom formation catalog JSON to inspect instead of the built-in one
    #[arg(long)]
    formations: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FormationEntry<'a> {
    team_size: usize,
    #[serde(flatten)]
    formation: &'a Formation,
}

pub(crate) fn run(arg: &FormationsArg) -> anyhow::Result<()> {
    let FormationsArg {
        team_size,
        formations,
        output,
    } = arg;

    let catalog = util::load_catalog(formations.as_deref())?;
    let sizes = match team_size {
        Some(size) => vec![*size],
        None => catalog.team_sizes().into_iter().collect(),
    };

    let mut entries = vec![];
    for size in sizes {
        let formations = catalog.for_team_size(size);
        if formations.is_empty() {
            eprintln!("{size}-a-side: no formations");
            continue;
        }
        eprintln!("{size}-a-side:");
        for formation in formations {
            let slots = Position::ALL
                .iter()
                .filter(|p| formation.slot_count(**p) > 0)
                .map(|p| format!("{}x{p}", formation.slot_count(*p)))
                .collect::<Vec<_>>()
                .join(" ");
            eprintln!("  {:<8} {slots}", formation.name);
            entries.push(FormationEntry {
                team_size: size,
                formation,
            });
        }
    }

    Output::save_json(&entries, output.clone())?;
    Ok(())
}
