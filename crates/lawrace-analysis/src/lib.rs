//! Chart-ready shaping of milestone achievements.
//!
//! Every analysis here reads an [`AchievementTable`] produced once by
//! [`MilestoneExtractor`]; none of them looks at raw observations again.
//!
//! | module             | chart              | output                                   |
//! |--------------------|--------------------|------------------------------------------|
//! | [`distribution`]   | box plot           | five-number summary or no-data marker    |
//! | [`heatmap`]        | player x match map | tiered cells plus flat-band breakpoints  |
//! | [`efficiency`]     | scatter            | (turn A, turn B) pairs, trendline        |
//! | [`survival`]       | step curve         | Kaplan-Meier time-to-milestone           |
//!
//! # Examples
//!
//! ```
//! use lawrace_analysis::{distribution, heatmap::HeatmapMatrix};
//! use lawrace_engine::{
//!     MatchRecord, Milestone, MilestoneExtractor, MilestoneSet, PlayerEntry, TurnObservation,
//! };
//!
//! let observations = [(40, 4), (70, 7)]
//!     .into_iter()
//!     .map(|(turn_number, counter_value)| TurnObservation {
//!         match_id: "m1".into(),
//!         player_id: "p1".into(),
//!         turn_number,
//!         counter_value,
//!     })
//!     .collect();
//! let record = MatchRecord {
//!     match_id: "m1".into(),
//!     players: vec![PlayerEntry { player_id: "p1".into(), civilization: "Rome".into() }],
//!     observations,
//! };
//!
//! let milestones = MilestoneSet::new(vec![
//!     Milestone::new("4 laws", 4),
//!     Milestone::new("7 laws", 7),
//! ])?;
//! let table = MilestoneExtractor::new(milestones).extract(&[record])?;
//!
//! let summaries = distribution::summarize_all(&table);
//! assert_eq!(summaries[1].reached_count, 1);
//!
//! let heatmap = HeatmapMatrix::build(&table, "4 laws", "7 laws")?;
//! assert_eq!(heatmap.tier_counts(), [0, 0, 1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`AchievementTable`]: lawrace_engine::AchievementTable
//! [`MilestoneExtractor`]: lawrace_engine::MilestoneExtractor

pub mod distribution;
pub mod efficiency;
pub mod heatmap;
pub mod survival;
