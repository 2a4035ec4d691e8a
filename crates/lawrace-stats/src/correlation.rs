use serde::{Deserialize, Serialize};

/// Least-squares line `y = slope * x + intercept` with Pearson correlation.
///
/// # Examples
///
/// ```
/// use lawrace_stats::correlation::LinearFit;
///
/// let fit = LinearFit::new([(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// assert!((fit.pearson_r - 1.0).abs() < 1e-12);
///
/// // A vertical cloud has no defined slope.
/// assert!(LinearFit::new([(1.0, 3.0), (1.0, 5.0)]).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub sample_size: usize,
    pub slope: f64,
    pub intercept: f64,
    pub pearson_r: f64,
}

impl LinearFit {
    /// Fits a line through `(x, y)` points.
    ///
    /// Returns `None` with fewer than two points or when either coordinate
    /// has zero variance, where slope or correlation would be undefined.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in &points {
            let (dx, dy) = (x - mean_x, y - mean_y);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        if sxx == 0.0 || syy == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            sample_size: points.len(),
            slope,
            intercept: mean_y - slope * mean_x,
            pearson_r: sxy / (sxx * syy).sqrt(),
        })
    }

    /// Value of the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Arithmetic mean, `None` for an empty input.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points() {
        assert!(LinearFit::new([]).is_none());
        assert!(LinearFit::new([(1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_flat_y_is_undefined() {
        assert!(LinearFit::new([(1.0, 2.0), (3.0, 2.0), (4.0, 2.0)]).is_none());
    }

    #[test]
    fn test_negative_correlation() {
        let fit = LinearFit::new([(10.0, 90.0), (20.0, 70.0), (30.0, 60.0), (40.0, 30.0)]).unwrap();
        assert!(fit.slope < 0.0);
        assert!(fit.pearson_r < -0.9);
        assert!(fit.pearson_r >= -1.0);
        assert_eq!(fit.sample_size, 4);
        assert!((fit.predict(25.0) - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean([]), None);
        assert_eq!(mean([40.0, 50.0]), Some(45.0));
    }
}
