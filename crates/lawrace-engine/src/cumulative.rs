//! Running-maximum counter series for race charts.
//!
//! Each player's series has exactly one point per observed turn; turns where a
//! player has no observation are not filled in. Aligning turn axes across
//! players is left to the consumer, with [`RaceStandings::at`] as the
//! step-function lookup for "who is ahead at turn N".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    Civilization, IntegrityError, LookupError, MatchId, MatchRecord, PlayerId, PlayerSeries,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub turn_number: u32,
    pub cumulative_value: u32,
}

/// Running maximum of one player's counter in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeSeries {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub civilization: Civilization,
    pub points: Vec<SeriesPoint>,
}

/// Flat output record of a cumulative series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub turn_number: u32,
    pub cumulative_value: u32,
}

impl CumulativeSeries {
    fn from_player(match_id: &MatchId, series: &PlayerSeries<'_>) -> Self {
        let points = series
            .observations
            .iter()
            .scan(None::<u32>, |max, obs| {
                let value = max.map_or(obs.counter_value, |m| m.max(obs.counter_value));
                *max = Some(value);
                Some(SeriesPoint {
                    turn_number: obs.turn_number,
                    cumulative_value: value,
                })
            })
            .collect();
        Self {
            match_id: match_id.clone(),
            player_id: series.entry.player_id.clone(),
            civilization: series.entry.civilization.clone(),
            points,
        }
    }

    /// Cumulative value at `turn`: the last point at or before it.
    ///
    /// `None` before the first observation.
    #[must_use]
    pub fn value_at(&self, turn: u32) -> Option<u32> {
        let idx = self.points.partition_point(|p| p.turn_number <= turn);
        idx.checked_sub(1).map(|i| self.points[i].cumulative_value)
    }

    pub fn flat_points(&self) -> impl Iterator<Item = CumulativePoint> + '_ {
        self.points.iter().map(|p| CumulativePoint {
            match_id: self.match_id.clone(),
            player_id: self.player_id.clone(),
            turn_number: p.turn_number,
            cumulative_value: p.cumulative_value,
        })
    }
}

/// Builds one cumulative series per roster entry of a match.
pub fn cumulative_series(record: &MatchRecord) -> Result<Vec<CumulativeSeries>, IntegrityError> {
    let series = PlayerSeries::split_match(record)?;
    Ok(series
        .iter()
        .map(|s| CumulativeSeries::from_player(&record.match_id, s))
        .collect())
}

/// Builds the series of every match of a collection.
pub fn cumulative_collection(
    records: &[MatchRecord],
) -> Result<Vec<CumulativeSeries>, IntegrityError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut all = vec![];
    for record in records {
        if !seen.insert(&record.match_id) {
            log::warn!("rejecting collection: match {} repeats", record.match_id);
            return Err(IntegrityError::DuplicateMatch {
                match_id: record.match_id.clone(),
            });
        }
        let series = cumulative_series(record).inspect_err(|e| {
            log::warn!("rejecting match {}: {e}", record.match_id);
        })?;
        all.extend(series);
    }
    log::debug!("built {} cumulative series", all.len());
    Ok(all)
}

/// Flat cumulative points of every match of a collection.
pub fn cumulative_points(records: &[MatchRecord]) -> Result<Vec<CumulativePoint>, IntegrityError> {
    Ok(cumulative_collection(records)?
        .iter()
        .flat_map(CumulativeSeries::flat_points)
        .collect())
}

/// A player's position in a race at a given turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub civilization: Civilization,
    /// `None` when the player has no observation at or before the turn.
    pub cumulative_value: Option<u32>,
    /// Competition rank (1, 1, 3, ...); `None` alongside an absent value.
    pub rank: Option<usize>,
}

/// Snapshot of one match's race at one turn, leader first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceStandings {
    pub match_id: MatchId,
    pub turn_number: u32,
    pub standings: Vec<Standing>,
}

impl RaceStandings {
    /// Ranks the series of `match_id` by their value at `turn`.
    ///
    /// Series of other matches are ignored. Players without a value yet come
    /// last, unranked. Equal values share a rank and keep roster order.
    ///
    /// # Errors
    ///
    /// [`LookupError::UnknownMatch`] if no series belongs to `match_id`. A
    /// match with an empty roster has no series and is reported the same way.
    pub fn at(
        match_id: &MatchId,
        series: &[CumulativeSeries],
        turn: u32,
    ) -> Result<Self, LookupError> {
        let mut standings = series
            .iter()
            .filter(|s| &s.match_id == match_id)
            .map(|s| Standing {
                player_id: s.player_id.clone(),
                civilization: s.civilization.clone(),
                cumulative_value: s.value_at(turn),
                rank: None,
            })
            .collect::<Vec<_>>();
        if standings.is_empty() {
            return Err(LookupError::UnknownMatch {
                match_id: match_id.clone(),
            });
        }
        // Stable sort: `None` orders below every `Some`.
        standings.sort_by(|a, b| b.cumulative_value.cmp(&a.cumulative_value));

        let mut previous = None;
        for (i, standing) in standings.iter_mut().enumerate() {
            let Some(value) = standing.cumulative_value else {
                break;
            };
            let rank = match previous {
                Some((prev_value, prev_rank)) if prev_value == value => prev_rank,
                _ => i + 1,
            };
            standing.rank = Some(rank);
            previous = Some((value, rank));
        }

        Ok(Self {
            match_id: match_id.clone(),
            turn_number: turn,
            standings,
        })
    }

    /// Players sharing the lead; empty when nobody has a value yet.
    pub fn leaders(&self) -> impl Iterator<Item = &Standing> + '_ {
        self.standings.iter().filter(|s| s.rank == Some(1))
    }
}
