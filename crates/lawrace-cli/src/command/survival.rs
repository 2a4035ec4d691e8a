use lawrace_analysis::survival::TimeToMilestone;
use lawrace_engine::MilestoneExtractor;

use crate::{command::DataArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SurvivalArg {
    #[command(flatten)]
    pub data: DataArg,
}

pub(crate) fn print_summary(curves: &[TimeToMilestone]) {
    eprintln!(
        "{:<16} {:>8} {:>8} {:>8} {:>12}",
        "Milestone", "Reached", "Censored", "Skipped", "KM median"
    );
    for ttm in curves {
        let median = ttm
            .median_turn
            .map_or_else(|| "not reached".to_owned(), |t| t.to_string());
        eprintln!(
            "{:<16} {:>8} {:>8} {:>8} {:>12}",
            ttm.milestone_name, ttm.reached_count, ttm.censored_count, ttm.skipped_count, median
        );
    }
}

pub(crate) fn run(arg: &SurvivalArg) -> anyhow::Result<()> {
    let (collection, milestones) = arg.data.load()?;
    let table = MilestoneExtractor::new(milestones).extract(&collection.matches)?;
    let curves = TimeToMilestone::all(&table);

    print_summary(&curves);
    Output::save_json(&curves, arg.data.output.as_deref())
}
