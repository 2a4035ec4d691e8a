use lawrace_analysis::heatmap::{HeatmapMatrix, Tier};
use lawrace_engine::{MilestoneExtractor, MilestoneSet};

use crate::{
    command::DataArg,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HeatmapArg {
    #[command(flatten)]
    pub data: DataArg,

    /// Lower milestone name (defaults to the lowest configured threshold)
    #[arg(long)]
    pub lower: Option<String>,

    /// Higher milestone name (defaults to the highest configured threshold)
    #[arg(long)]
    pub higher: Option<String>,
}

/// Resolve an explicit milestone pair, or fall back to the configured span
pub(super) fn resolve_pair(
    milestones: &MilestoneSet,
    first: Option<&str>,
    second: Option<&str>,
) -> anyhow::Result<(String, String)> {
    let span = util::milestone_span(milestones);
    let missing = || anyhow::anyhow!("At least two milestones must be configured to pick a pair");
    let first = match (first, span) {
        (Some(name), _) => name.to_owned(),
        (None, Some((low, _))) => low.name.clone(),
        (None, None) => return Err(missing()),
    };
    let second = match (second, span) {
        (Some(name), _) => name.to_owned(),
        (None, Some((_, high))) => high.name.clone(),
        (None, None) => return Err(missing()),
    };
    Ok((first, second))
}

pub(crate) fn run(arg: &HeatmapArg) -> anyhow::Result<()> {
    let (collection, milestones) = arg.data.load()?;
    let (lower, higher) = resolve_pair(&milestones, arg.lower.as_deref(), arg.higher.as_deref())?;
    let table = MilestoneExtractor::new(milestones).extract(&collection.matches)?;
    let heatmap = HeatmapMatrix::build(&table, &lower, &higher)?;

    eprintln!(
        "Heatmap {lower} / {higher}: {} players x {} matches",
        heatmap.player_ids.len(),
        heatmap.match_ids.len()
    );
    for (tier, count) in Tier::ALL.iter().zip(heatmap.tier_counts()) {
        eprintln!("  {:<8} {count:>6}", tier.to_string());
    }

    Output::save_json(&heatmap, arg.data.output.as_deref())
}

#[cfg(test)]
mod tests {
    use lawrace_engine::Milestone;

    use super::*;

    #[test]
    fn test_resolve_pair() {
        let set = MilestoneSet::new(vec![
            Milestone::new("7 laws", 7),
            Milestone::new("4 laws", 4),
            Milestone::new("5 laws", 5),
        ])
        .unwrap();
        assert_eq!(
            resolve_pair(&set, None, None).unwrap(),
            ("4 laws".to_owned(), "7 laws".to_owned())
        );
        assert_eq!(
            resolve_pair(&set, Some("5 laws"), None).unwrap(),
            ("5 laws".to_owned(), "7 laws".to_owned())
        );

        let single = MilestoneSet::new(vec![Milestone::new("4 laws", 4)]).unwrap();
        assert!(resolve_pair(&single, None, None).is_err());
        assert!(resolve_pair(&single, Some("a"), Some("b")).is_ok());
    }
}
