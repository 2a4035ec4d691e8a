use serde::{Deserialize, Serialize};

/// One subject of a time-to-event study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivalObservation {
    /// Time of the event, or of the last observation when censored.
    pub time: u32,
    /// `true` if the event was not observed before `time`.
    pub censored: bool,
}

impl SurvivalObservation {
    #[must_use]
    pub fn event(time: u32) -> Self {
        Self {
            time,
            censored: false,
        }
    }

    #[must_use]
    pub fn censored(time: u32) -> Self {
        Self {
            time,
            censored: true,
        }
    }
}

/// A step of the Kaplan-Meier curve, emitted at every time with events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalStep {
    pub time: u32,
    /// Estimated probability that the event has not happened by `time`.
    pub survival: f64,
    /// Subjects still under observation just before `time`.
    pub at_risk: usize,
    /// Events at `time`.
    pub events: usize,
}

/// Kaplan-Meier estimate of a survival function from right-censored data.
///
/// Subjects censored at a time are still counted as at risk for events at
/// that same time.
///
/// # Examples
///
/// ```
/// use lawrace_stats::survival::{KaplanMeierCurve, SurvivalObservation};
///
/// let curve = KaplanMeierCurve::new(vec![
///     SurvivalObservation::event(10),
///     SurvivalObservation::censored(20),
///     SurvivalObservation::event(30),
/// ]);
/// assert_eq!(curve.steps.len(), 2);
/// assert_eq!(curve.survival_at(5), 1.0);
/// assert!((curve.survival_at(10) - 2.0 / 3.0).abs() < 1e-12);
/// assert_eq!(curve.survival_at(30), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KaplanMeierCurve {
    pub steps: Vec<SurvivalStep>,
}

impl KaplanMeierCurve {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(mut data: Vec<SurvivalObservation>) -> Self {
        data.sort_by_key(|obs| obs.time);

        let mut steps = vec![];
        let mut survival = 1.0;
        let mut at_risk = data.len();
        for group in data.chunk_by(|a, b| a.time == b.time) {
            let events = group.iter().filter(|obs| !obs.censored).count();
            if events > 0 {
                survival *= 1.0 - events as f64 / at_risk as f64;
                steps.push(SurvivalStep {
                    time: group[0].time,
                    survival,
                    at_risk,
                    events,
                });
            }
            at_risk -= group.len();
        }

        Self { steps }
    }

    /// Survival probability at `time` (step function, right-continuous).
    #[must_use]
    pub fn survival_at(&self, time: u32) -> f64 {
        let idx = self.steps.partition_point(|s| s.time <= time);
        idx.checked_sub(1).map_or(1.0, |i| self.steps[i].survival)
    }

    /// First time at which survival drops to 0.5 or below.
    ///
    /// `None` if the curve never gets there (too much censoring, or no events).
    #[must_use]
    pub fn median_time(&self) -> Option<u32> {
        self.steps
            .iter()
            .find(|s| s.survival <= 0.5)
            .map(|s| s.time)
    }
}
