use lawrace_analysis::efficiency::{
    self, CivilizationEfficiency, EfficiencyCorrelation, EfficiencyPair,
};
use lawrace_engine::MilestoneExtractor;
use serde::Serialize;

use crate::{
    command::{DataArg, heatmap::resolve_pair},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EfficiencyArg {
    #[command(flatten)]
    pub data: DataArg,

    /// Milestone on the x axis (defaults to the lowest configured threshold)
    #[arg(long)]
    pub first: Option<String>,

    /// Milestone on the y axis (defaults to the highest configured threshold)
    #[arg(long)]
    pub second: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EfficiencyOutput {
    pub first_milestone: String,
    pub second_milestone: String,
    pub pairs: Vec<EfficiencyPair>,
    pub correlation: EfficiencyCorrelation,
    pub by_civilization: Vec<CivilizationEfficiency>,
}

impl EfficiencyOutput {
    pub fn new(first: String, second: String, pairs: Vec<EfficiencyPair>) -> Self {
        let correlation = EfficiencyCorrelation::from_pairs(&pairs);
        let by_civilization = CivilizationEfficiency::group(&pairs);
        Self {
            first_milestone: first,
            second_milestone: second,
            pairs,
            correlation,
            by_civilization,
        }
    }

    pub fn print_summary(&self) {
        eprintln!(
            "Efficiency {} -> {}: {} pairs, {} complete",
            self.first_milestone,
            self.second_milestone,
            self.correlation.total_pairs,
            self.correlation.complete_pairs
        );
        match &self.correlation.trend {
            Some(fit) => eprintln!(
                "  trend: y = {:.3} x + {:.3} (r = {:.3})",
                fit.slope, fit.intercept, fit.pearson_r
            ),
            None => eprintln!("  trend: insufficient data"),
        }
        for civ in &self.by_civilization {
            eprintln!(
                "  {:<16} {:>4} pairs {:>4} complete  mean {:>6} / {:>6}",
                civ.civilization.as_str(),
                civ.pair_count,
                civ.complete_count,
                fmt_mean(civ.mean_turn_a),
                fmt_mean(civ.mean_turn_b)
            );
        }
    }
}

fn fmt_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "-".to_owned(), |m| format!("{m:.1}"))
}

pub(crate) fn run(arg: &EfficiencyArg) -> anyhow::Result<()> {
    let (collection, milestones) = arg.data.load()?;
    let (first, second) = resolve_pair(&milestones, arg.first.as_deref(), arg.second.as_deref())?;
    let table = MilestoneExtractor::new(milestones).extract(&collection.matches)?;
    let pairs = efficiency::efficiency_pairs(&table, &first, &second)?;

    let output = EfficiencyOutput::new(first, second, pairs);
    output.print_summary();
    Output::save_json(&output, arg.data.output.as_deref())
}

#[cfg(test)]
mod tests {
    use lawrace_engine::TurnReached;

    use super::*;

    fn pair(player: &str, civ: &str, a: Option<u32>, b: Option<u32>) -> EfficiencyPair {
        EfficiencyPair {
            match_id: "m1".into(),
            player_id: player.into(),
            civilization: civ.into(),
            turn_a: TurnReached::from(a),
            turn_b: TurnReached::from(b),
        }
    }

    #[test]
    fn test_output_groups_and_fits() {
        let output = EfficiencyOutput::new(
            "4 laws".to_owned(),
            "7 laws".to_owned(),
            vec![
                pair("a", "Rome", Some(30), Some(60)),
                pair("b", "Rome", Some(40), Some(80)),
                pair("c", "Egypt", Some(50), None),
            ],
        );
        assert_eq!(output.correlation.total_pairs, 3);
        assert_eq!(output.correlation.complete_pairs, 2);
        assert_eq!(output.by_civilization.len(), 2);
        assert_eq!(fmt_mean(None), "-");
        assert_eq!(fmt_mean(Some(35.0)), "35.0");
    }
}
