use serde::{Deserialize, Serialize};

/// Five-number summary of a dataset: extremes plus the three quartiles.
///
/// Quartiles are linearly interpolated between the closest ranks, so the
/// median of an even-sized dataset is the mean of the two middle values.
///
/// # Examples
///
/// ```
/// use lawrace_stats::quartiles::FiveNumberSummary;
///
/// let summary = FiveNumberSummary::new([63.0, 34.0, 45.0]).unwrap();
/// assert_eq!(summary.min, 34.0);
/// assert_eq!(summary.q1, 39.5);
/// assert_eq!(summary.median, 45.0);
/// assert_eq!(summary.q3, 54.0);
/// assert_eq!(summary.max, 63.0);
///
/// assert!(FiveNumberSummary::new([]).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Computes the summary from unsorted values.
    ///
    /// Returns `None` for an empty dataset instead of a NaN-filled summary.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes the summary from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        Some(Self {
            min: *sorted_values.first()?,
            q1: quantile_sorted(sorted_values, 0.25)?,
            median: quantile_sorted(sorted_values, 0.5)?,
            q3: quantile_sorted(sorted_values, 0.75)?,
            max: *sorted_values.last()?,
        })
    }

    /// Interquartile range.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Quantile `q` (0.0 to 1.0) of sorted data, interpolating between ranks.
///
/// Returns `None` if the input is empty. `q` is clamped into `[0, 1]`.
///
/// ```
/// use lawrace_stats::quartiles::quantile_sorted;
///
/// let values = [10.0, 20.0, 30.0, 40.0];
/// assert_eq!(quantile_sorted(&values, 0.5), Some(25.0));
/// assert_eq!(quantile_sorted(&values, 0.0), Some(10.0));
/// assert_eq!(quantile_sorted(&values, 1.0), Some(40.0));
/// assert_eq!(quantile_sorted(&[], 0.5), None);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn quantile_sorted(sorted_values: &[f64], q: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - pos.floor();
    Some(sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac)
}
