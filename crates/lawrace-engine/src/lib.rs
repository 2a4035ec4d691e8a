//! Milestone detection over per-turn counters of strategy-game matches.
//!
//! This crate owns the raw data model and the two components that read raw
//! counters directly:
//!
//! - [`milestone`]: first-turn detection of configured thresholds
//!   ([`MilestoneExtractor`]), producing an [`AchievementTable`]
//! - [`cumulative`]: running-maximum series for race charts
//!
//! Every turn value that may be missing travels as a [`TurnReached`], which
//! serializes "never reached" as `null` rather than a number.
//!
//! # Examples
//!
//! ```
//! use lawrace_engine::{
//!     MatchId, MatchRecord, Milestone, MilestoneExtractor, MilestoneSet, PlayerEntry, PlayerId,
//!     TurnObservation, TurnReached,
//! };
//!
//! let record = MatchRecord {
//!     match_id: "m1".into(),
//!     players: vec![PlayerEntry { player_id: "p1".into(), civilization: "Rome".into() }],
//!     observations: [(10, 2), (20, 4), (30, 5)]
//!         .into_iter()
//!         .map(|(turn_number, counter_value)| TurnObservation {
//!             match_id: "m1".into(),
//!             player_id: "p1".into(),
//!             turn_number,
//!             counter_value,
//!         })
//!         .collect(),
//! };
//!
//! let milestones = MilestoneSet::new(vec![
//!     Milestone::new("4 laws", 4),
//!     Milestone::new("7 laws", 7),
//! ])?;
//! let table = MilestoneExtractor::new(milestones).extract(&[record])?;
//!
//! let m1 = MatchId::from("m1");
//! let p1 = PlayerId::from("p1");
//! assert_eq!(table.turn_reached(&m1, &p1, "4 laws")?, TurnReached::reached(20));
//! assert_eq!(table.turn_reached(&m1, &p1, "7 laws")?, TurnReached::NOT_REACHED);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{cumulative::*, milestone::*, record::*, series::*, turn::*};

pub mod cumulative;
pub mod milestone;
pub mod record;
pub mod series;
pub mod turn;

/// Input that violates the monotonic per-player history milestones rely on.
///
/// These are never repaired: every downstream value depends on a valid
/// sequence, so the whole invocation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IntegrityError {
    #[display("match {match_id}: player {player_id} reports turn {turn} after turn {previous_turn}")]
    TurnRegression {
        match_id: MatchId,
        player_id: PlayerId,
        previous_turn: u32,
        turn: u32,
    },
    #[display("match {match_id}: player {player_id} has more than one observation for turn {turn}")]
    DuplicateTurn {
        match_id: MatchId,
        player_id: PlayerId,
        turn: u32,
    },
    #[display(
        "match {match_id}: player {player_id} counter drops from {previous_value} to {value} at turn {turn}"
    )]
    CounterRegression {
        match_id: MatchId,
        player_id: PlayerId,
        turn: u32,
        previous_value: u32,
        value: u32,
    },
    #[display("match {match_id} carries an observation recorded for match {found}")]
    ForeignObservation { match_id: MatchId, found: MatchId },
    #[display("match {match_id}: observation for player {player_id} who is not on the roster")]
    UnknownPlayer {
        match_id: MatchId,
        player_id: PlayerId,
    },
    #[display("match {match_id}: player {player_id} is listed more than once")]
    DuplicatePlayer {
        match_id: MatchId,
        player_id: PlayerId,
    },
    #[display("match {match_id} appears more than once in the collection")]
    DuplicateMatch { match_id: MatchId },
}

/// Invalid milestone configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MilestoneConfigError {
    #[display("milestone name '{name}' is configured more than once")]
    DuplicateName { name: String },
    #[display("milestones '{first}' and '{second}' share threshold {threshold}")]
    DuplicateThreshold {
        threshold: u32,
        first: String,
        second: String,
    },
}

/// A query named a match, player or milestone that is not in the data.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LookupError {
    #[display("match {match_id} not found")]
    UnknownMatch { match_id: MatchId },
    #[display("player {player_id} not found in match {match_id}")]
    UnknownPlayer {
        match_id: MatchId,
        player_id: PlayerId,
    },
    #[display("milestone '{name}' is not configured")]
    UnknownMilestone { name: String },
}
