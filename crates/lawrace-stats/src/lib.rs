//! Statistical building blocks for milestone timing analysis.
//!
//! - [`quartiles`]: five-number summaries with interpolated quartiles
//! - [`survival`]: Kaplan-Meier estimation for right-censored time-to-event data
//! - [`correlation`]: least-squares trendlines and Pearson correlation
//!
//! Every estimator returns `None` (or an empty curve) when its input cannot
//! support it, so callers never see NaN statistics.
//!
//! # Examples
//!
//! ```
//! use lawrace_stats::{
//!     quartiles::FiveNumberSummary,
//!     survival::{KaplanMeierCurve, SurvivalObservation},
//! };
//!
//! let turns = [34.0, 45.0, 63.0];
//! let summary = FiveNumberSummary::new(turns).unwrap();
//! assert_eq!(summary.median, 45.0);
//!
//! // Two more players never got there; censor them at their last turn.
//! let curve = KaplanMeierCurve::new(vec![
//!     SurvivalObservation::event(34),
//!     SurvivalObservation::event(45),
//!     SurvivalObservation::event(63),
//!     SurvivalObservation::censored(80),
//!     SurvivalObservation::censored(90),
//! ]);
//! assert_eq!(curve.median_time(), Some(63));
//! ```

pub mod correlation;
pub mod quartiles;
pub mod survival;
