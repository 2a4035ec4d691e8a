//! Distribution of reached turns per milestone, for box plots.
//!
//! Only present turns enter the statistics; absent ones are counted
//! separately. A milestone nobody reached summarizes to an explicit no-data
//! record rather than quartiles of an empty set.
//!
//! Wire format:
//!
//! ```json
//! {"milestone_name": "4 laws", "reached_count": 3, "not_reached_count": 1,
//!  "min": 34.0, "q1": 39.5, "median": 45.0, "q3": 54.0, "max": 63.0}
//! {"milestone_name": "7 laws", "no_data": true}
//! ```

use lawrace_engine::{AchievementTable, LookupError, MilestoneAchievement, TurnReached};
use lawrace_stats::quartiles::FiveNumberSummary;
use serde::{Serialize, ser::SerializeMap as _};

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSummary {
    pub milestone_name: String,
    pub reached_count: usize,
    pub not_reached_count: usize,
    /// `None` when no record reached the milestone.
    pub turns: Option<FiveNumberSummary>,
}

impl DistributionSummary {
    pub fn from_turns<I>(milestone_name: impl Into<String>, turns: I) -> Self
    where
        I: IntoIterator<Item = TurnReached>,
    {
        let mut present = vec![];
        let mut not_reached_count = 0;
        for turn in turns {
            match turn.as_f64() {
                Some(t) => present.push(t),
                None => not_reached_count += 1,
            }
        }
        Self {
            milestone_name: milestone_name.into(),
            reached_count: present.len(),
            not_reached_count,
            turns: FiveNumberSummary::new(present),
        }
    }

    /// Summarizes the flat achievement records of one milestone.
    ///
    /// # Arguments
    ///
    /// * `milestone_name` - Milestone to summarize; records of every other
    ///   milestone are ignored
    /// * `records` - Achievement records, typically from
    ///   [`AchievementTable::records`]
    ///
    /// # Returns
    ///
    /// The counts and five-number summary of the matching records, or a
    /// no-data summary when `records` is empty or none of them reached the
    /// milestone.
    ///
    /// # Errors
    ///
    /// [`LookupError::UnknownMilestone`] when `records` is non-empty but no
    /// record carries `milestone_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lawrace_analysis::distribution::DistributionSummary;
    /// use lawrace_engine::{MilestoneAchievement, PlayerId, TurnReached};
    ///
    /// let records = [34, 45, 63].map(|turn| MilestoneAchievement {
    ///     match_id: "m1".into(),
    ///     player_id: PlayerId::from(format!("p{turn}")),
    ///     milestone_name: "4 laws".to_owned(),
    ///     turn_reached: TurnReached::reached(turn),
    /// });
    ///
    /// let summary = DistributionSummary::from_achievements("4 laws", &records)?;
    /// assert_eq!(summary.reached_count, 3);
    /// assert!(DistributionSummary::from_achievements("4 lawz", &records).is_err());
    /// # Ok::<(), lawrace_engine::LookupError>(())
    /// ```
    pub fn from_achievements(
        milestone_name: &str,
        records: &[MilestoneAchievement],
    ) -> Result<Self, LookupError> {
        let mut matching = records
            .iter()
            .filter(|r| r.milestone_name == milestone_name)
            .peekable();
        if !records.is_empty() && matching.peek().is_none() {
            return Err(LookupError::UnknownMilestone {
                name: milestone_name.to_owned(),
            });
        }
        Ok(Self::from_turns(
            milestone_name,
            matching.map(|r| r.turn_reached),
        ))
    }

    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.turns.is_none()
    }
}

impl Serialize for DistributionSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let Some(turns) = &self.turns else {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("milestone_name", &self.milestone_name)?;
            map.serialize_entry("no_data", &true)?;
            return map.end();
        };
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("milestone_name", &self.milestone_name)?;
        map.serialize_entry("reached_count", &self.reached_count)?;
        map.serialize_entry("not_reached_count", &self.not_reached_count)?;
        map.serialize_entry("min", &turns.min)?;
        map.serialize_entry("q1", &turns.q1)?;
        map.serialize_entry("median", &turns.median)?;
        map.serialize_entry("q3", &turns.q3)?;
        map.serialize_entry("max", &turns.max)?;
        map.end()
    }
}

/// Summarizes one configured milestone across every match of `table`.
///
/// Every (match, player) pair of the table counts once: as a reached turn
/// or as not reached.
///
/// # Errors
///
/// [`LookupError::UnknownMilestone`] if `milestone` is not configured in the
/// table.
///
/// # Examples
///
/// ```
/// use lawrace_analysis::distribution;
/// use lawrace_engine::{Milestone, MilestoneExtractor, MilestoneSet};
///
/// let milestones = MilestoneSet::new(vec![Milestone::new("4 laws", 4)])?;
/// let table = MilestoneExtractor::new(milestones).extract(&[])?;
///
/// assert!(distribution::summarize(&table, "4 laws")?.is_no_data());
/// assert!(distribution::summarize(&table, "7 laws").is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn summarize(
    table: &AchievementTable,
    milestone: &str,
) -> Result<DistributionSummary, LookupError> {
    let index = table.milestones().position(milestone)?;
    Ok(DistributionSummary::from_turns(
        milestone,
        table.column(index).map(|(_, _, turn)| turn),
    ))
}

/// Summaries of every configured milestone, in configured order.
#[must_use]
pub fn summarize_all(table: &AchievementTable) -> Vec<DistributionSummary> {
    table
        .milestones()
        .iter()
        .enumerate()
        .map(|(index, milestone)| {
            DistributionSummary::from_turns(
                milestone.name.as_str(),
                table.column(index).map(|(_, _, turn)| turn),
            )
        })
        .collect()
}
