//! Validated per-player views over a match's raw observations.
//!
//! Both the milestone extractor and the cumulative aggregator read the same
//! per-player sequences. [`PlayerSeries::split_match`] groups a match's
//! observations by roster entry and rejects anything that breaks the
//! monotonic history:
//!
//! - turn numbers must be strictly increasing per player
//! - counter values must never decrease
//! - every observation must belong to the enclosing match and a rostered player

use std::collections::HashMap;

use crate::{IntegrityError, MatchRecord, PlayerEntry, TurnObservation};

/// Observations of one player in one match, in ascending turn order.
#[derive(Debug, Clone)]
pub struct PlayerSeries<'a> {
    pub entry: &'a PlayerEntry,
    pub observations: Vec<&'a TurnObservation>,
}

impl<'a> PlayerSeries<'a> {
    /// Splits a match into one series per roster entry, in roster order.
    ///
    /// Players with no observations get an empty series.
    pub fn split_match(record: &'a MatchRecord) -> Result<Vec<Self>, IntegrityError> {
        let mut index = HashMap::with_capacity(record.players.len());
        for (i, entry) in record.players.iter().enumerate() {
            if index.insert(&entry.player_id, i).is_some() {
                return Err(IntegrityError::DuplicatePlayer {
                    match_id: record.match_id.clone(),
                    player_id: entry.player_id.clone(),
                });
            }
        }

        let mut series = record
            .players
            .iter()
            .map(|entry| PlayerSeries {
                entry,
                observations: vec![],
            })
            .collect::<Vec<_>>();

        for obs in &record.observations {
            if obs.match_id != record.match_id {
                return Err(IntegrityError::ForeignObservation {
                    match_id: record.match_id.clone(),
                    found: obs.match_id.clone(),
                });
            }
            let Some(&i) = index.get(&obs.player_id) else {
                return Err(IntegrityError::UnknownPlayer {
                    match_id: record.match_id.clone(),
                    player_id: obs.player_id.clone(),
                });
            };
            series[i].push(obs)?;
        }

        Ok(series)
    }

    fn push(&mut self, obs: &'a TurnObservation) -> Result<(), IntegrityError> {
        if let Some(prev) = self.observations.last() {
            if obs.turn_number == prev.turn_number {
                return Err(IntegrityError::DuplicateTurn {
                    match_id: obs.match_id.clone(),
                    player_id: obs.player_id.clone(),
                    turn: obs.turn_number,
                });
            }
            if obs.turn_number < prev.turn_number {
                return Err(IntegrityError::TurnRegression {
                    match_id: obs.match_id.clone(),
                    player_id: obs.player_id.clone(),
                    previous_turn: prev.turn_number,
                    turn: obs.turn_number,
                });
            }
            if obs.counter_value < prev.counter_value {
                return Err(IntegrityError::CounterRegression {
                    match_id: obs.match_id.clone(),
                    player_id: obs.player_id.clone(),
                    turn: obs.turn_number,
                    previous_value: prev.counter_value,
                    value: obs.counter_value,
                });
            }
        }
        self.observations.push(obs);
        Ok(())
    }

    /// Last observed turn, or `None` if the player has no observations.
    #[must_use]
    pub fn last_turn(&self) -> Option<u32> {
        self.observations.last().map(|obs| obs.turn_number)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{MatchId, PlayerId};

    pub(crate) fn obs(match_id: &str, player_id: &str, turn: u32, value: u32) -> TurnObservation {
        TurnObservation {
            match_id: match_id.into(),
            player_id: player_id.into(),
            turn_number: turn,
            counter_value: value,
        }
    }

    pub(crate) fn record(
        match_id: &str,
        players: &[(&str, &str)],
        observations: Vec<TurnObservation>,
    ) -> MatchRecord {
        MatchRecord {
            match_id: match_id.into(),
            players: players
                .iter()
                .map(|&(player_id, civilization)| PlayerEntry {
                    player_id: player_id.into(),
                    civilization: civilization.into(),
                })
                .collect(),
            observations,
        }
    }

    #[test]
    fn test_split_groups_interleaved_players() {
        let rec = record(
            "m",
            &[("a", "Rome"), ("b", "Egypt"), ("c", "Greece")],
            vec![
                obs("m", "b", 1, 0),
                obs("m", "a", 1, 1),
                obs("m", "b", 2, 2),
                obs("m", "a", 3, 1),
            ],
        );
        let series = PlayerSeries::split_match(&rec).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].entry.player_id, PlayerId::from("a"));
        assert_eq!(
            series[0]
                .observations
                .iter()
                .map(|o| o.turn_number)
                .collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(series[1].observations.len(), 2);
        assert!(series[2].observations.is_empty());
        assert_eq!(series[2].last_turn(), None);
        assert_eq!(series[0].last_turn(), Some(3));
    }

    #[test]
    fn test_duplicate_turn_in_later_batch() {
        let rec = record(
            "m",
            &[("a", "Rome"), ("b", "Egypt")],
            vec![
                obs("m", "a", 1, 0),
                obs("m", "a", 2, 1),
                obs("m", "b", 1, 0),
                obs("m", "a", 2, 1),
            ],
        );
        let err = PlayerSeries::split_match(&rec).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::DuplicateTurn {
                match_id: MatchId::from("m"),
                player_id: PlayerId::from("a"),
                turn: 2,
            }
        );
    }

    #[test]
    fn test_turn_regression() {
        let rec = record(
            "m",
            &[("a", "Rome")],
            vec![obs("m", "a", 5, 0), obs("m", "a", 3, 0)],
        );
        assert!(matches!(
            PlayerSeries::split_match(&rec),
            Err(IntegrityError::TurnRegression {
                previous_turn: 5,
                turn: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_counter_regression() {
        let rec = record(
            "m",
            &[("a", "Rome")],
            vec![obs("m", "a", 1, 4), obs("m", "a", 2, 3)],
        );
        assert!(matches!(
            PlayerSeries::split_match(&rec),
            Err(IntegrityError::CounterRegression {
                turn: 2,
                previous_value: 4,
                value: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_roster_faults() {
        let foreign = record("m", &[("a", "Rome")], vec![obs("other", "a", 1, 0)]);
        assert!(matches!(
            PlayerSeries::split_match(&foreign),
            Err(IntegrityError::ForeignObservation { .. })
        ));

        let unknown = record("m", &[("a", "Rome")], vec![obs("m", "z", 1, 0)]);
        assert!(matches!(
            PlayerSeries::split_match(&unknown),
            Err(IntegrityError::UnknownPlayer { .. })
        ));

        let duplicate = record("m", &[("a", "Rome"), ("a", "Egypt")], vec![]);
        assert!(matches!(
            PlayerSeries::split_match(&duplicate),
            Err(IntegrityError::DuplicatePlayer { .. })
        ));
    }
}
