use std::fmt;

use serde::{Deserialize, Serialize};

/// The turn at which a milestone was reached, or its explicit absence.
///
/// "Never reached" is a normal outcome and must stay distinguishable from
/// turn `0`. The value serializes as a JSON integer when reached and as
/// `null` otherwise; no numeric placeholder is ever substituted.
///
/// The type deliberately offers no arithmetic and no ordering. Consumers
/// unwrap explicitly with [`TurnReached::get`] or use the short-circuiting
/// helpers below.
///
/// ```
/// use lawrace_engine::TurnReached;
///
/// let reached = TurnReached::reached(0);
/// let absent = TurnReached::NOT_REACHED;
/// assert_ne!(reached, absent);
/// assert_eq!(serde_json::to_string(&absent).unwrap(), "null");
/// assert_eq!(serde_json::to_string(&reached).unwrap(), "0");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnReached(Option<u32>);

impl TurnReached {
    pub const NOT_REACHED: Self = Self(None);

    #[must_use]
    pub const fn reached(turn: u32) -> Self {
        Self(Some(turn))
    }

    #[must_use]
    pub const fn get(self) -> Option<u32> {
        self.0
    }

    #[must_use]
    pub const fn is_reached(self) -> bool {
        self.0.is_some()
    }

    /// Returns `true` if reached at or before `turn`.
    #[must_use]
    pub fn reached_by(self, turn: u32) -> bool {
        self.0.is_some_and(|t| t <= turn)
    }

    /// Number of turns from `self` to `later`.
    ///
    /// Absent if either side is absent or `later` precedes `self`.
    #[must_use]
    pub fn turns_until(self, later: Self) -> Option<u32> {
        later.0?.checked_sub(self.0?)
    }

    /// Turn as a float for statistics, absent stays absent.
    #[must_use]
    pub fn as_f64(self) -> Option<f64> {
        self.0.map(f64::from)
    }
}

impl From<Option<u32>> for TurnReached {
    fn from(value: Option<u32>) -> Self {
        Self(value)
    }
}

impl From<TurnReached> for Option<u32> {
    fn from(value: TurnReached) -> Self {
        value.0
    }
}

impl fmt::Display for TurnReached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(turn) => write!(f, "{turn}"),
            None => f.write_str("not reached"),
        }
    }
}
