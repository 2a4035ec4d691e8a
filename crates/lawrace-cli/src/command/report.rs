use chrono::{DateTime, Utc};
use lawrace_analysis::{
    distribution::{self, DistributionSummary},
    efficiency,
    heatmap::HeatmapMatrix,
    survival::TimeToMilestone,
};
use lawrace_engine::{
    CumulativePoint, MatchCollection, Milestone, MilestoneAchievement, MilestoneSet,
    cumulative_points,
};
use serde::Serialize;

use crate::{
    cache::AchievementCache,
    command::{DataArg, efficiency::EfficiencyOutput, survival},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    #[command(flatten)]
    pub data: DataArg,
}

/// Every chart dataset for one match collection
#[derive(Debug, Serialize)]
pub(crate) struct Report {
    pub generated_at: DateTime<Utc>,
    pub match_count: usize,
    pub milestones: Vec<Milestone>,
    pub achievements: Vec<MilestoneAchievement>,
    pub cumulative: Vec<CumulativePoint>,
    pub distributions: Vec<DistributionSummary>,
    /// Absent when fewer than two milestones are configured.
    pub heatmap: Option<HeatmapMatrix>,
    pub efficiency: Option<EfficiencyOutput>,
    pub survival: Vec<TimeToMilestone>,
}

impl Report {
    pub fn build(
        collection: &MatchCollection,
        milestones: &MilestoneSet,
        cache: &mut AchievementCache,
    ) -> anyhow::Result<Self> {
        let matches = &collection.matches;
        let cumulative = cumulative_points(matches)?;

        // Each section asks the cache; only the first one extracts.
        let achievements = cache
            .get_or_extract(matches, milestones)?
            .records()
            .collect();
        let table = cache.get_or_extract(matches, milestones)?;
        let distributions = distribution::summarize_all(&table);
        let table = cache.get_or_extract(matches, milestones)?;
        let survival = TimeToMilestone::all(&table);

        let (heatmap, efficiency) = match util::milestone_span(milestones) {
            Some((low, high)) => {
                let table = cache.get_or_extract(matches, milestones)?;
                let heatmap = HeatmapMatrix::build(&table, &low.name, &high.name)?;
                let pairs = efficiency::efficiency_pairs(&table, &low.name, &high.name)?;
                let efficiency = EfficiencyOutput::new(low.name.clone(), high.name.clone(), pairs);
                (Some(heatmap), Some(efficiency))
            }
            None => {
                log::warn!("fewer than two milestones configured; skipping heatmap and efficiency");
                (None, None)
            }
        };

        Ok(Self {
            generated_at: Utc::now(),
            match_count: matches.len(),
            milestones: milestones.as_slice().to_vec(),
            achievements,
            cumulative,
            distributions,
            heatmap,
            efficiency,
            survival,
        })
    }
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let (collection, milestones) = arg.data.load()?;
    let mut cache = AchievementCache::new();
    let report = Report::build(&collection, &milestones, &mut cache)?;
    log::debug!(
        "achievement cache: {} hits, {} misses",
        cache.hits(),
        cache.misses()
    );

    eprintln!(
        "Report for {} matches, {} milestones",
        report.match_count,
        report.milestones.len()
    );
    survival::print_summary(&report.survival);
    if let Some(efficiency) = &report.efficiency {
        efficiency.print_summary();
    }
    Output::save_json(&report, arg.data.output.as_deref())
}

#[cfg(test)]
mod tests {
    use lawrace_engine::{MatchRecord, PlayerEntry, TurnObservation};

    use super::*;

    fn collection() -> MatchCollection {
        let observations = [(10, 2), (40, 4), (70, 7)]
            .into_iter()
            .map(|(turn_number, counter_value)| TurnObservation {
                match_id: "m1".into(),
                player_id: "p1".into(),
                turn_number,
                counter_value,
            })
            .collect();
        MatchCollection {
            matches: vec![MatchRecord {
                match_id: "m1".into(),
                players: vec![PlayerEntry {
                    player_id: "p1".into(),
                    civilization: "Rome".into(),
                }],
                observations,
            }],
        }
    }

    #[test]
    fn test_report_extracts_once() {
        let milestones = util::load_milestones(None).unwrap();
        let mut cache = AchievementCache::new();
        let report = Report::build(&collection(), &milestones, &mut cache).unwrap();

        assert_eq!(cache.misses(), 1);
        assert!(cache.hits() >= 3);
        assert_eq!(report.match_count, 1);
        assert_eq!(report.achievements.len(), 2);
        assert_eq!(report.cumulative.len(), 3);
        assert_eq!(report.heatmap.unwrap().tier_counts(), [0, 0, 1]);
        assert_eq!(report.efficiency.unwrap().correlation.complete_pairs, 1);
    }

    #[test]
    fn test_single_milestone_skips_pair_charts() {
        let milestones = MilestoneSet::new(vec![Milestone::new("4 laws", 4)]).unwrap();
        let mut cache = AchievementCache::new();
        let report = Report::build(&collection(), &milestones, &mut cache).unwrap();
        assert!(report.heatmap.is_none());
        assert!(report.efficiency.is_none());
        assert_eq!(report.survival.len(), 1);
    }
}
