use std::path::PathBuf;

use lawrace_engine::{RaceStandings, cumulative_collection};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RaceArg {
    /// Path to the matches JSON file
    pub matches: PathBuf,

    /// Report standings at this turn instead of the full series
    #[arg(long)]
    pub turn: Option<u32>,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RaceArg) -> anyhow::Result<()> {
    let collection = util::read_matches_file(&arg.matches)?;
    let series = cumulative_collection(&collection.matches)?;

    let Some(turn) = arg.turn else {
        let points = series
            .iter()
            .flat_map(|s| s.flat_points())
            .collect::<Vec<_>>();
        eprintln!("{} series, {} points", series.len(), points.len());
        return Output::save_json(&points, arg.output.as_deref());
    };

    let standings = collection
        .matches
        .iter()
        .filter(|m| !m.players.is_empty())
        .map(|m| RaceStandings::at(&m.match_id, &series, turn))
        .collect::<Result<Vec<_>, _>>()?;
    for race in &standings {
        let leaders = race
            .leaders()
            .map(|s| format!("{} ({})", s.player_id, s.civilization))
            .collect::<Vec<_>>();
        let lead = race.standings.first().and_then(|s| s.cumulative_value);
        match lead {
            Some(value) => eprintln!(
                "{} @ turn {turn}: {} leading with {value}",
                race.match_id,
                leaders.join(", ")
            ),
            None => eprintln!("{} @ turn {turn}: no observations yet", race.match_id),
        }
    }
    Output::save_json(&standings, arg.output.as_deref())
}
