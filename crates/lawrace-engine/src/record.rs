//! Raw match records as delivered by the data store.
//!
//! A [`MatchCollection`] is the JSON document the command-line front end
//! reads. Each [`MatchRecord`] carries its roster and the per-turn counter
//! observations of every player, in the order the store returned them.
//!
//! ```json
//! {
//!   "matches": [
//!     {
//!       "match_id": "m-001",
//!       "players": [
//!         { "player_id": "p1", "civilization": "Rome" }
//!       ],
//!       "observations": [
//!         { "match_id": "m-001", "player_id": "p1", "turn_number": 1, "counter_value": 0 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a recorded match.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct MatchId(String);

/// Identifier of a player, unique within a match roster.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(String);

/// Civilization a player led in a match.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Civilization(String);

macro_rules! impl_str_id {
    ($($ty:ty),*) => {
        $(
            impl From<&str> for $ty {
                fn from(value: &str) -> Self {
                    Self(value.to_owned())
                }
            }

            impl $ty {
                #[must_use]
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }
        )*
    };
}

impl_str_id!(MatchId, PlayerId, Civilization);

/// A single counter reading for one player at one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnObservation {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub turn_number: u32,
    /// Cumulative counter value (e.g. laws adopted so far).
    pub counter_value: u32,
}

/// A player on a match roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub player_id: PlayerId,
    pub civilization: Civilization,
}

/// One recorded match: its roster and the raw observations of every player.
///
/// Observations of different players may be interleaved, but each player's
/// own observations must appear in ascending turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub players: Vec<PlayerEntry>,
    pub observations: Vec<TurnObservation>,
}

impl MatchRecord {
    /// Looks up a roster entry.
    #[must_use]
    pub fn player(&self, player_id: &PlayerId) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| &p.player_id == player_id)
    }
}

/// Collection of recorded matches, the unit of input for every analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCollection {
    pub matches: Vec<MatchRecord>,
}
