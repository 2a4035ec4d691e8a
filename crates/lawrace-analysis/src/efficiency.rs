//! Paired milestone turns for scatter and correlation views.
//!
//! [`efficiency_pairs`] emits one [`EfficiencyPair`] per (match, player) and
//! never filters, so incomplete pairs stay inspectable. The consumers in this
//! module ([`EfficiencyCorrelation`], [`CivilizationEfficiency`]) decide for
//! themselves which pairs are usable.

use std::collections::BTreeMap;

use lawrace_engine::{AchievementTable, Civilization, LookupError, MatchId, PlayerId, TurnReached};
use lawrace_stats::correlation::{self, LinearFit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficiencyPair {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub civilization: Civilization,
    pub turn_a: TurnReached,
    pub turn_b: TurnReached,
}

impl EfficiencyPair {
    /// Both turns, if both milestones were reached.
    #[must_use]
    pub fn complete(&self) -> Option<(u32, u32)> {
        Some((self.turn_a.get()?, self.turn_b.get()?))
    }
}

/// Pairs the turns of milestones `first` and `second` for every (match, player).
///
/// # Arguments
///
/// * `table` - Extracted achievements
/// * `first` - Milestone whose turn becomes `turn_a` (the x axis)
/// * `second` - Milestone whose turn becomes `turn_b` (the y axis)
///
/// # Returns
///
/// One pair per (match, player) in table order. Pairs where either
/// milestone was not reached are kept with the absent turn as
/// [`TurnReached::NOT_REACHED`].
///
/// # Errors
///
/// [`LookupError::UnknownMilestone`] if either name is not configured.
///
/// # Examples
///
/// ```
/// use lawrace_analysis::efficiency;
/// use lawrace_engine::{
///     MatchRecord, Milestone, MilestoneExtractor, MilestoneSet, PlayerEntry, TurnObservation,
/// };
///
/// let record = MatchRecord {
///     match_id: "m1".into(),
///     players: vec![PlayerEntry { player_id: "p1".into(), civilization: "Rome".into() }],
///     observations: vec![TurnObservation {
///         match_id: "m1".into(),
///         player_id: "p1".into(),
///         turn_number: 40,
///         counter_value: 4,
///     }],
/// };
/// let milestones = MilestoneSet::new(vec![
///     Milestone::new("4 laws", 4),
///     Milestone::new("7 laws", 7),
/// ])?;
/// let table = MilestoneExtractor::new(milestones).extract(&[record])?;
///
/// let pairs = efficiency::efficiency_pairs(&table, "4 laws", "7 laws")?;
/// assert_eq!(pairs[0].turn_a.get(), Some(40));
/// assert!(!pairs[0].turn_b.is_reached());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn efficiency_pairs(
    table: &AchievementTable,
    first: &str,
    second: &str,
) -> Result<Vec<EfficiencyPair>, LookupError> {
    let a = table.milestones().position(first)?;
    let b = table.milestones().position(second)?;
    Ok(table
        .matches()
        .iter()
        .flat_map(|m| {
            m.players.iter().map(|p| EfficiencyPair {
                match_id: m.match_id.clone(),
                player_id: p.player_id.clone(),
                civilization: p.civilization.clone(),
                turn_a: p.turns[a],
                turn_b: p.turns[b],
            })
        })
        .collect())
}

/// Trendline through the complete pairs (x = turn A, y = turn B).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyCorrelation {
    pub total_pairs: usize,
    pub complete_pairs: usize,
    /// `None` with fewer than two complete pairs or zero variance.
    pub trend: Option<LinearFit>,
}

impl EfficiencyCorrelation {
    #[must_use]
    pub fn from_pairs(pairs: &[EfficiencyPair]) -> Self {
        let points = pairs
            .iter()
            .filter_map(EfficiencyPair::complete)
            .map(|(a, b)| (f64::from(a), f64::from(b)))
            .collect::<Vec<_>>();
        Self {
            total_pairs: pairs.len(),
            complete_pairs: points.len(),
            trend: LinearFit::new(points),
        }
    }
}

/// Per-civilization view of the pairs, for grouped scatter legends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CivilizationEfficiency {
    pub civilization: Civilization,
    pub pair_count: usize,
    pub complete_count: usize,
    /// Mean over present `turn_a` values, whether or not `turn_b` is present.
    pub mean_turn_a: Option<f64>,
    pub mean_turn_b: Option<f64>,
}

impl CivilizationEfficiency {
    /// Groups pairs by civilization, sorted by civilization name.
    #[must_use]
    pub fn group(pairs: &[EfficiencyPair]) -> Vec<Self> {
        let mut groups = BTreeMap::<&Civilization, Vec<&EfficiencyPair>>::new();
        for pair in pairs {
            groups.entry(&pair.civilization).or_default().push(pair);
        }
        groups
            .into_iter()
            .map(|(civilization, pairs)| Self {
                civilization: civilization.clone(),
                pair_count: pairs.len(),
                complete_count: pairs.iter().filter(|p| p.complete().is_some()).count(),
                mean_turn_a: correlation::mean(pairs.iter().filter_map(|p| p.turn_a.as_f64())),
                mean_turn_b: correlation::mean(pairs.iter().filter_map(|p| p.turn_b.as_f64())),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use lawrace_engine::{Milestone, MilestoneExtractor, MilestoneSet};

    use super::*;
    use crate::tests::{obs, record};

    fn table() -> AchievementTable {
        let matches = vec![
            record(
                "m1",
                &[("a", "Rome"), ("b", "Egypt")],
                vec![
                    obs("m1", "a", 30, 4),
                    obs("m1", "a", 60, 7),
                    obs("m1", "b", 40, 4),
                    obs("m1", "b", 80, 7),
                ],
            ),
            record(
                "m2",
                &[("c", "Rome"), ("d", "Greece")],
                vec![
                    obs("m2", "c", 50, 4),
                    obs("m2", "c", 100, 7),
                    obs("m2", "d", 20, 5),
                ],
            ),
        ];
        let milestones = MilestoneSet::new(vec![
            Milestone::new("4 laws", 4),
            Milestone::new("7 laws", 7),
        ])
        .unwrap();
        MilestoneExtractor::new(milestones).extract(&matches).unwrap()
    }

    #[test]
    fn test_pairs_are_not_filtered() {
        let pairs = efficiency_pairs(&table(), "4 laws", "7 laws").unwrap();
        assert_eq!(pairs.len(), 4);
        let d = &pairs[3];
        assert_eq!(d.civilization, Civilization::from("Greece"));
        assert_eq!(d.turn_a, TurnReached::reached(20));
        assert_eq!(d.turn_b, TurnReached::NOT_REACHED);
        assert_eq!(d.complete(), None);
        assert_eq!(pairs[0].complete(), Some((30, 60)));
    }

    #[test]
    fn test_wire_format() {
        let pairs = efficiency_pairs(&table(), "4 laws", "7 laws").unwrap();
        assert_eq!(
            serde_json::to_value(&pairs[3]).unwrap(),
            serde_json::json!({
                "match_id": "m2",
                "player_id": "d",
                "civilization": "Greece",
                "turn_a": 20,
                "turn_b": null,
            })
        );
    }

    #[test]
    fn test_correlation_uses_complete_pairs_only() {
        let pairs = efficiency_pairs(&table(), "4 laws", "7 laws").unwrap();
        let correlation = EfficiencyCorrelation::from_pairs(&pairs);
        assert_eq!(correlation.total_pairs, 4);
        assert_eq!(correlation.complete_pairs, 3);
        // (30, 60), (40, 80), (50, 100) lie on y = 2x.
        let trend = correlation.trend.unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-9);
        assert!(trend.intercept.abs() < 1e-9);
        assert!((trend.pearson_r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_insufficient_data() {
        let pairs = efficiency_pairs(&table(), "4 laws", "7 laws").unwrap();
        let correlation = EfficiencyCorrelation::from_pairs(&pairs[..1]);
        assert_eq!(correlation.complete_pairs, 1);
        assert_eq!(correlation.trend, None);
    }

    #[test]
    fn test_group_by_civilization() {
        let pairs = efficiency_pairs(&table(), "4 laws", "7 laws").unwrap();
        let groups = CivilizationEfficiency::group(&pairs);
        let names = groups
            .iter()
            .map(|g| g.civilization.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Egypt", "Greece", "Rome"]);

        let greece = &groups[1];
        assert_eq!(greece.pair_count, 1);
        assert_eq!(greece.complete_count, 0);
        assert_eq!(greece.mean_turn_a, Some(20.0));
        assert_eq!(greece.mean_turn_b, None);

        let rome = &groups[2];
        assert_eq!(rome.pair_count, 2);
        assert_eq!(rome.mean_turn_a, Some(40.0));
        assert_eq!(rome.mean_turn_b, Some(80.0));
    }

    #[test]
    fn test_repeated_runs_serialize_identically() {
        let run = || {
            let pairs = efficiency_pairs(&table(), "4 laws", "7 laws").unwrap();
            let groups = CivilizationEfficiency::group(&pairs);
            (
                serde_json::to_string(&pairs).unwrap(),
                serde_json::to_string(&groups).unwrap(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_unknown_milestone() {
        assert!(matches!(
            efficiency_pairs(&table(), "4 laws", "12 laws"),
            Err(LookupError::UnknownMilestone { .. })
        ));
    }
}
