//! Time-to-milestone curves that account for players who never got there.
//!
//! The plain distribution summary only sees players who reached a milestone,
//! which flatters slow milestones: a player whose match ended before they
//! reached it says "at least this long", not "never". Treating them as
//! right-censored at their last observed turn gives a Kaplan-Meier curve of
//! the fraction of players still short of the milestone at each turn.
//!
//! ```text
//! reached:    |-------x        event at turn reached
//! unreached:  |------------>   censored at last observed turn
//! ```

use lawrace_engine::{AchievementTable, LookupError};
use lawrace_stats::survival::{KaplanMeierCurve, SurvivalObservation};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeToMilestone {
    pub milestone_name: String,
    pub reached_count: usize,
    pub censored_count: usize,
    /// Players without a single observation; they carry no information.
    pub skipped_count: usize,
    /// First turn by which at least half of the players reached the milestone.
    pub median_turn: Option<u32>,
    pub curve: KaplanMeierCurve,
}

impl TimeToMilestone {
    /// Builds the time-to-milestone curve of one configured milestone.
    ///
    /// # Arguments
    ///
    /// * `table` - Extracted achievements
    /// * `milestone` - Name of a configured milestone
    ///
    /// # Returns
    ///
    /// The Kaplan-Meier curve over every (match, player) of the table. A
    /// reached turn is an event; an unreached player is censored at their
    /// last observed turn; a player never observed is only counted in
    /// `skipped_count`.
    ///
    /// # Errors
    ///
    /// [`LookupError::UnknownMilestone`] if `milestone` is not configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use lawrace_analysis::survival::TimeToMilestone;
    /// use lawrace_engine::{
    ///     MatchRecord, Milestone, MilestoneExtractor, MilestoneSet, PlayerEntry, TurnObservation,
    /// };
    ///
    /// let players = ["p1", "p2"]
    ///     .map(|id| PlayerEntry { player_id: id.into(), civilization: "Rome".into() });
    /// let observations = [("p1", 30, 4), ("p2", 50, 2)]
    ///     .map(|(id, turn_number, counter_value)| TurnObservation {
    ///         match_id: "m1".into(),
    ///         player_id: id.into(),
    ///         turn_number,
    ///         counter_value,
    ///     });
    /// let record = MatchRecord {
    ///     match_id: "m1".into(),
    ///     players: players.to_vec(),
    ///     observations: observations.to_vec(),
    /// };
    /// let milestones = MilestoneSet::new(vec![Milestone::new("4 laws", 4)])?;
    /// let table = MilestoneExtractor::new(milestones).extract(&[record])?;
    ///
    /// let ttm = TimeToMilestone::from_table(&table, "4 laws")?;
    /// assert_eq!((ttm.reached_count, ttm.censored_count), (1, 1));
    /// assert_eq!(ttm.median_turn, Some(30));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_table(table: &AchievementTable, milestone: &str) -> Result<Self, LookupError> {
        let index = table.milestones().position(milestone)?;
        Ok(Self::from_column(table, index))
    }

    /// Curves of every configured milestone, in configured order.
    #[must_use]
    pub fn all(table: &AchievementTable) -> Vec<Self> {
        (0..table.milestones().len())
            .map(|index| Self::from_column(table, index))
            .collect()
    }

    fn from_column(table: &AchievementTable, index: usize) -> Self {
        let mut data = vec![];
        let mut skipped_count = 0;
        for (_, player, turn) in table.column(index) {
            match (turn.get(), player.last_observed_turn) {
                (Some(t), _) => data.push(SurvivalObservation::event(t)),
                (None, Some(last)) => data.push(SurvivalObservation::censored(last)),
                (None, None) => skipped_count += 1,
            }
        }
        let reached_count = data.iter().filter(|obs| !obs.censored).count();
        let censored_count = data.len() - reached_count;
        let curve = KaplanMeierCurve::new(data);

        Self {
            milestone_name: table.milestones().as_slice()[index].name.clone(),
            reached_count,
            censored_count,
            skipped_count,
            median_turn: curve.median_time(),
            curve,
        }
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
                &[("a", "Rome"), ("b", "Egypt"), ("c", "Greece")],
                vec![
                    obs("m1", "a", 20, 4),
                    obs("m1", "b", 30, 4),
                    obs("m1", "c", 90, 3),
                ],
            ),
            record(
                "m2",
                &[("d", "Persia"), ("e", "Carthage")],
                vec![obs("m2", "d", 25, 2)],
            ),
        ];
        let milestones = MilestoneSet::new(vec![Milestone::new("4 laws", 4)]).unwrap();
        MilestoneExtractor::new(milestones).extract(&matches).unwrap()
    }

    #[test]
    fn test_censors_unreached_at_last_turn() {
        let ttm = TimeToMilestone::from_table(&table(), "4 laws").unwrap();
        assert_eq!(ttm.reached_count, 2);
        assert_eq!(ttm.censored_count, 2);
        assert_eq!(ttm.skipped_count, 1);

        // Turn 20: 1 of 4 at risk. Turn 25: d censored. Turn 30: 1 of 2.
        assert_eq!(ttm.curve.steps.len(), 2);
        assert_eq!(ttm.curve.survival_at(20), 0.75);
        assert_eq!(ttm.curve.steps[1].at_risk, 2);
        assert_eq!(ttm.curve.survival_at(30), 0.375);
        assert_eq!(ttm.median_turn, Some(30));
    }

    #[test]
    fn test_all_and_unknown() {
        let table = table();
        assert_eq!(TimeToMilestone::all(&table).len(), 1);
        assert!(matches!(
            TimeToMilestone::from_table(&table, "7 laws"),
            Err(LookupError::UnknownMilestone { .. })
        ));
    }
}
