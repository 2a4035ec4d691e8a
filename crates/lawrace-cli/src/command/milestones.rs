use lawrace_engine::MilestoneExtractor;

use crate::{command::DataArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MilestonesArg {
    #[command(flatten)]
    pub data: DataArg,
}

pub(crate) fn run(arg: &MilestonesArg) -> anyhow::Result<()> {
    let (collection, milestones) = arg.data.load()?;
    let table = MilestoneExtractor::new(milestones).extract(&collection.matches)?;
    let records = table.records().collect::<Vec<_>>();

    for (index, milestone) in table.milestones().iter().enumerate() {
        let (reached, total) = table
            .column(index)
            .fold((0, 0), |(reached, total), (_, _, turn)| {
                (reached + usize::from(turn.is_reached()), total + 1)
            });
        eprintln!(
            "{:<16} reached {reached:>5} / {total:<5} (threshold {})",
            milestone.name, milestone.threshold
        );
    }

    Output::save_json(&records, arg.data.output.as_deref())
}
