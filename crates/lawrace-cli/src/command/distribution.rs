use lawrace_analysis::distribution;
use lawrace_engine::MilestoneExtractor;

use crate::{command::DataArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DistributionArg {
    #[command(flatten)]
    pub data: DataArg,
}

pub(crate) fn run(arg: &DistributionArg) -> anyhow::Result<()> {
    let (collection, milestones) = arg.data.load()?;
    let table = MilestoneExtractor::new(milestones).extract(&collection.matches)?;
    let summaries = distribution::summarize_all(&table);

    eprintln!(
        "{:<16} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "Milestone", "Reached", "Missed", "Min", "Q1", "Median", "Q3", "Max"
    );
    for summary in &summaries {
        match &summary.turns {
            Some(t) => eprintln!(
                "{:<16} {:>7} {:>7} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1}",
                summary.milestone_name,
                summary.reached_count,
                summary.not_reached_count,
                t.min,
                t.q1,
                t.median,
                t.q3,
                t.max
            ),
            None => eprintln!(
                "{:<16} {:>7} {:>7} (no data)",
                summary.milestone_name, summary.reached_count, summary.not_reached_count
            ),
        }
    }

    Output::save_json(&summaries, arg.data.output.as_deref())
}
