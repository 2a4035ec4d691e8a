//! First-turn detection of counter thresholds.
//!
//! A [`Milestone`] is a named threshold on a player's cumulative counter. The
//! [`MilestoneExtractor`] scans each player's validated series once and
//! records, for every configured milestone, the earliest turn whose counter
//! value is at or above the threshold. Milestones that are never met stay
//! [`TurnReached::NOT_REACHED`].
//!
//! The extractor is the only place first occurrences are computed; every
//! downstream summary reads the resulting [`AchievementTable`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    Civilization, IntegrityError, LookupError, MatchId, MatchRecord, MilestoneConfigError,
    PlayerId, PlayerSeries, TurnReached,
};

/// A named threshold on the counter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub threshold: u32,
}

impl Milestone {
    #[must_use]
    pub fn new(name: impl Into<String>, threshold: u32) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }
}

/// Validated milestone configuration.
///
/// Keeps the configured order for output and a threshold-ascending order for
/// scanning. Names and thresholds are both unique. Deserializes from a plain
/// JSON array of milestones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Milestone>", into = "Vec<Milestone>")]
pub struct MilestoneSet {
    milestones: Vec<Milestone>,
    scan_order: Vec<usize>,
}

impl MilestoneSet {
    /// Validates a milestone configuration.
    ///
    /// # Arguments
    ///
    /// * `milestones` - Milestones in the order outputs should list them;
    ///   thresholds need not be sorted
    ///
    /// # Errors
    ///
    /// [`MilestoneConfigError::DuplicateName`] if two milestones share a name,
    /// [`MilestoneConfigError::DuplicateThreshold`] if two share a threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use lawrace_engine::{Milestone, MilestoneConfigError, MilestoneSet};
    ///
    /// let set = MilestoneSet::new(vec![
    ///     Milestone::new("7 laws", 7),
    ///     Milestone::new("4 laws", 4),
    /// ])?;
    /// assert_eq!(set.as_slice()[0].name, "7 laws");
    /// assert_eq!(set.scan_order(), &[1, 0]);
    ///
    /// let err = MilestoneSet::new(vec![Milestone::new("a", 4), Milestone::new("b", 4)]);
    /// assert!(matches!(err, Err(MilestoneConfigError::DuplicateThreshold { .. })));
    /// # Ok::<(), MilestoneConfigError>(())
    /// ```
    pub fn new(milestones: Vec<Milestone>) -> Result<Self, MilestoneConfigError> {
        let mut names = HashSet::with_capacity(milestones.len());
        for m in &milestones {
            if !names.insert(m.name.as_str()) {
                return Err(MilestoneConfigError::DuplicateName {
                    name: m.name.clone(),
                });
            }
        }

        let mut scan_order = (0..milestones.len()).collect::<Vec<_>>();
        scan_order.sort_by_key(|&i| milestones[i].threshold);
        for pair in scan_order.windows(2) {
            let (first, second) = (&milestones[pair[0]], &milestones[pair[1]]);
            if first.threshold == second.threshold {
                return Err(MilestoneConfigError::DuplicateThreshold {
                    threshold: first.threshold,
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }

        Ok(Self {
            milestones,
            scan_order,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Milestones in configured order.
    #[must_use]
    pub fn as_slice(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn iter(&self) -> impl Iterator<Item = &Milestone> + '_ {
        self.milestones.iter()
    }

    /// Configured position of the named milestone.
    pub fn position(&self, name: &str) -> Result<usize, LookupError> {
        self.milestones
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| LookupError::UnknownMilestone {
                name: name.to_owned(),
            })
    }

    /// Looks up a milestone by name.
    pub fn get(&self, name: &str) -> Result<&Milestone, LookupError> {
        self.position(name).map(|i| &self.milestones[i])
    }

    /// Configured positions sorted by ascending threshold.
    #[must_use]
    pub fn scan_order(&self) -> &[usize] {
        &self.scan_order
    }
}

impl TryFrom<Vec<Milestone>> for MilestoneSet {
    type Error = MilestoneConfigError;

    fn try_from(value: Vec<Milestone>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MilestoneSet> for Vec<Milestone> {
    fn from(value: MilestoneSet) -> Self {
        value.milestones
    }
}

/// Output record: when one player reached one milestone in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneAchievement {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub milestone_name: String,
    pub turn_reached: TurnReached,
}

/// Per-player extractor output, one turn per configured milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAchievements {
    pub player_id: PlayerId,
    pub civilization: Civilization,
    /// Last turn with an observation; used as the censoring point for
    /// milestones that were never reached.
    pub last_observed_turn: Option<u32>,
    /// Indexed by configured milestone position.
    pub turns: Vec<TurnReached>,
}

/// Per-match extractor output, players in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchAchievements {
    pub match_id: MatchId,
    pub players: Vec<PlayerAchievements>,
}

impl MatchAchievements {
    pub fn player(&self, player_id: &PlayerId) -> Result<&PlayerAchievements, LookupError> {
        self.players
            .iter()
            .find(|p| &p.player_id == player_id)
            .ok_or_else(|| LookupError::UnknownPlayer {
                match_id: self.match_id.clone(),
                player_id: player_id.clone(),
            })
    }
}

/// Extractor output for a whole match collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementTable {
    milestones: MilestoneSet,
    matches: Vec<MatchAchievements>,
}

impl AchievementTable {
    #[must_use]
    pub fn milestones(&self) -> &MilestoneSet {
        &self.milestones
    }

    /// Matches in input order.
    #[must_use]
    pub fn matches(&self) -> &[MatchAchievements] {
        &self.matches
    }

    pub fn match_achievements(&self, match_id: &MatchId) -> Result<&MatchAchievements, LookupError> {
        self.matches
            .iter()
            .find(|m| &m.match_id == match_id)
            .ok_or_else(|| LookupError::UnknownMatch {
                match_id: match_id.clone(),
            })
    }

    /// Turn at which `player_id` reached `milestone` in `match_id`.
    pub fn turn_reached(
        &self,
        match_id: &MatchId,
        player_id: &PlayerId,
        milestone: &str,
    ) -> Result<TurnReached, LookupError> {
        let index = self.milestones.position(milestone)?;
        let player = self.match_achievements(match_id)?.player(player_id)?;
        Ok(player.turns[index])
    }

    /// Every (match, player) pair with its turn for the milestone at `index`.
    pub fn column(
        &self,
        index: usize,
    ) -> impl Iterator<Item = (&MatchAchievements, &PlayerAchievements, TurnReached)> + '_ {
        self.matches.iter().flat_map(move |m| {
            m.players
                .iter()
                .map(move |p| (m, p, p.turns[index]))
        })
    }

    /// Flat output records, ordered by match, player, then configured milestone.
    pub fn records(&self) -> impl Iterator<Item = MilestoneAchievement> + '_ {
        self.matches.iter().flat_map(move |m| {
            m.players.iter().flat_map(move |p| {
                self.milestones
                    .iter()
                    .zip(&p.turns)
                    .map(move |(milestone, &turn_reached)| MilestoneAchievement {
                        match_id: m.match_id.clone(),
                        player_id: p.player_id.clone(),
                        milestone_name: milestone.name.clone(),
                        turn_reached,
                    })
            })
        })
    }
}

/// Computes first-reached turns for a fixed milestone configuration.
#[derive(Debug, Clone)]
pub struct MilestoneExtractor {
    milestones: MilestoneSet,
}

impl MilestoneExtractor {
    #[must_use]
    pub fn new(milestones: MilestoneSet) -> Self {
        Self { milestones }
    }

    #[must_use]
    pub fn milestones(&self) -> &MilestoneSet {
        &self.milestones
    }

    /// Extracts every match of a collection.
    ///
    /// Fails on the first integrity fault; a match id appearing twice is a
    /// fault as well, since its observations would be split across batches.
    pub fn extract(&self, records: &[MatchRecord]) -> Result<AchievementTable, IntegrityError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut matches = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(&record.match_id) {
                log::warn!("rejecting collection: match {} repeats", record.match_id);
                return Err(IntegrityError::DuplicateMatch {
                    match_id: record.match_id.clone(),
                });
            }
            matches.push(self.extract_match(record)?);
        }
        log::debug!(
            "extracted {} milestones over {} matches",
            self.milestones.len(),
            matches.len()
        );
        Ok(AchievementTable {
            milestones: self.milestones.clone(),
            matches,
        })
    }

    pub fn extract_match(&self, record: &MatchRecord) -> Result<MatchAchievements, IntegrityError> {
        let series = PlayerSeries::split_match(record).inspect_err(|e| {
            log::warn!("rejecting match {}: {e}", record.match_id);
        })?;
        let players = series.iter().map(|s| self.extract_player(s)).collect();
        Ok(MatchAchievements {
            match_id: record.match_id.clone(),
            players,
        })
    }

    fn extract_player(&self, series: &PlayerSeries<'_>) -> PlayerAchievements {
        let milestones = self.milestones.as_slice();
        let order = self.milestones.scan_order();
        let mut turns = vec![TurnReached::NOT_REACHED; milestones.len()];

        // `next` indexes the lowest threshold not yet met; everything below it
        // is already resolved.
        let mut next = 0;
        for obs in &series.observations {
            while let Some(&i) = order.get(next) {
                if obs.counter_value < milestones[i].threshold {
                    break;
                }
                turns[i] = TurnReached::reached(obs.turn_number);
                next += 1;
            }
            if next == order.len() {
                break;
            }
        }

        PlayerAchievements {
            player_id: series.entry.player_id.clone(),
            civilization: series.entry.civilization.clone(),
            last_observed_turn: series.last_turn(),
            turns,
        }
    }
}
