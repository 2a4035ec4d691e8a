use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lawrace_engine::{MatchCollection, MilestoneSet};

use crate::util;

use self::{
    distribution::DistributionArg, efficiency::EfficiencyArg, generate_matches::GenerateMatchesArg,
    heatmap::HeatmapArg, milestones::MilestonesArg, race::RaceArg, report::ReportArg,
    survival::SurvivalArg,
};

mod distribution;
mod efficiency;
mod generate_matches;
mod heatmap;
mod milestones;
mod race;
mod report;
mod survival;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Generate a synthetic match collection
    GenerateMatches(#[clap(flatten)] GenerateMatchesArg),
    /// First turn each player reached each milestone
    Milestones(#[clap(flatten)] MilestonesArg),
    /// Running-maximum counter series, or standings at a turn
    Race(#[clap(flatten)] RaceArg),
    /// Quartile summary of reached turns per milestone
    Distribution(#[clap(flatten)] DistributionArg),
    /// Player-by-match tier matrix for two milestones
    Heatmap(#[clap(flatten)] HeatmapArg),
    /// Paired turns of two milestones with trendline
    Efficiency(#[clap(flatten)] EfficiencyArg),
    /// Kaplan-Meier time-to-milestone curves
    Survival(#[clap(flatten)] SurvivalArg),
    /// Every dataset above in one JSON document
    Report(#[clap(flatten)] ReportArg),
}

/// Input and output options shared by the analysis commands
#[derive(Debug, Clone, Args)]
pub(crate) struct DataArg {
    /// Path to the matches JSON file
    pub matches: PathBuf,

    /// Path to a milestone configuration JSON file (defaults to 4 and 7 laws)
    #[arg(long)]
    pub milestones: Option<PathBuf>,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl DataArg {
    pub fn load(&self) -> anyhow::Result<(MatchCollection, MilestoneSet)> {
        let collection = util::read_matches_file(&self.matches)?;
        let milestones = util::load_milestones(self.milestones.as_deref())?;
        Ok((collection, milestones))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::GenerateMatches(arg) => generate_matches::run(&arg)?,
        Mode::Milestones(arg) => milestones::run(&arg)?,
        Mode::Race(arg) => race::run(&arg)?,
        Mode::Distribution(arg) => distribution::run(&arg)?,
        Mode::Heatmap(arg) => heatmap::run(&arg)?,
        Mode::Efficiency(arg) => efficiency::run(&arg)?,
        Mode::Survival(arg) => survival::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
    }
    Ok(())
}
