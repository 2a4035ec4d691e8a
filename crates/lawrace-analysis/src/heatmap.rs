//! Player-by-match achievement matrix with a three-band color scale.
//!
//! Each (player, match) cell is classified against two milestones, a lower
//! and a higher threshold:
//!
//! | tier      | condition                       | band value |
//! |-----------|---------------------------------|------------|
//! | `none`    | neither milestone reached       | 0.0        |
//! | `partial` | only the lower milestone        | 0.5        |
//! | `full`    | the higher milestone            | 1.0        |
//!
//! [`TIER_BREAKPOINTS`] places each tier in a flat band bounded by a
//! near-duplicate breakpoint pair, so a renderer interpolating a continuous
//! color axis still paints solid bands with hard transitions.

use std::collections::HashMap;

use lawrace_engine::{AchievementTable, LookupError, MatchId, PlayerId, TurnReached};
use serde::{Deserialize, Serialize};

/// Color-axis breakpoints: three flat bands separated by near-duplicate pairs.
pub const TIER_BREAKPOINTS: [f64; 6] = [0.0, 0.329, 0.34, 0.659, 0.67, 1.0];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[display("none")]
    None,
    #[display("partial")]
    Partial,
    #[display("full")]
    Full,
}

impl Tier {
    pub const ALL: [Self; 3] = [Self::None, Self::Partial, Self::Full];

    /// Classifies a cell from the turns of the lower and higher milestone.
    ///
    /// Reaching the higher milestone is enough for `Full`; with thresholds
    /// ordered and validated history, it implies the lower one was reached too.
    #[must_use]
    pub fn classify(lower: TurnReached, higher: TurnReached) -> Self {
        if higher.is_reached() {
            Self::Full
        } else if lower.is_reached() {
            Self::Partial
        } else {
            Self::None
        }
    }

    /// Position of the tier on the color axis, inside its band.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Partial => 0.5,
            Self::Full => 1.0,
        }
    }

    /// Band `[lower, upper]` this tier occupies on the color axis.
    #[must_use]
    pub fn band(self) -> TierBand {
        let i = match self {
            Self::None => 0,
            Self::Partial => 2,
            Self::Full => 4,
        };
        TierBand {
            tier: self,
            lower: TIER_BREAKPOINTS[i],
            upper: TIER_BREAKPOINTS[i + 1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub tier: Tier,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HeatmapError {
    #[display("{_0}")]
    Lookup(LookupError),
    #[display(
        "milestone '{lower}' (threshold {lower_threshold}) must be below '{higher}' (threshold {higher_threshold})"
    )]
    MilestoneOrder {
        lower: String,
        lower_threshold: u32,
        higher: String,
        higher_threshold: u32,
    },
}

impl From<LookupError> for HeatmapError {
    fn from(value: LookupError) -> Self {
        Self::Lookup(value)
    }
}

/// Output record of one (player, match) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub tier: Tier,
}

/// The classified matrix plus everything a renderer needs for its color axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub lower_milestone: String,
    pub higher_milestone: String,
    /// Row labels: players in first-seen order.
    pub player_ids: Vec<PlayerId>,
    /// Column labels: matches in input order.
    pub match_ids: Vec<MatchId>,
    /// One entry per player that took part in a match.
    pub cells: Vec<HeatmapCell>,
    /// Dense band values, `z[row][column]`; `None` where the player did not play.
    pub z: Vec<Vec<Option<f64>>>,
    pub breakpoints: [f64; 6],
    pub bands: [TierBand; 3],
}

impl HeatmapMatrix {
    /// Classifies every (player, match) pair of `table`.
    pub fn build(table: &AchievementTable, lower: &str, higher: &str) -> Result<Self, HeatmapError> {
        let milestones = table.milestones();
        let lower_index = milestones.position(lower)?;
        let higher_index = milestones.position(higher)?;
        let lower_threshold = milestones.as_slice()[lower_index].threshold;
        let higher_threshold = milestones.as_slice()[higher_index].threshold;
        if lower_threshold >= higher_threshold {
            return Err(HeatmapError::MilestoneOrder {
                lower: lower.to_owned(),
                lower_threshold,
                higher: higher.to_owned(),
                higher_threshold,
            });
        }

        let mut player_ids = vec![];
        let mut rows = HashMap::new();
        let mut cells = vec![];
        let mut placed = vec![];
        for (column, m) in table.matches().iter().enumerate() {
            for p in &m.players {
                let row = *rows.entry(p.player_id.clone()).or_insert_with(|| {
                    player_ids.push(p.player_id.clone());
                    player_ids.len() - 1
                });
                let tier = Tier::classify(p.turns[lower_index], p.turns[higher_index]);
                cells.push(HeatmapCell {
                    player_id: p.player_id.clone(),
                    match_id: m.match_id.clone(),
                    tier,
                });
                placed.push((row, column, tier));
            }
        }

        let match_ids = table
            .matches()
            .iter()
            .map(|m| m.match_id.clone())
            .collect::<Vec<_>>();
        let mut z = vec![vec![None; match_ids.len()]; player_ids.len()];
        for (row, column, tier) in placed {
            z[row][column] = Some(tier.value());
        }

        log::debug!(
            "heatmap {lower}/{higher}: {} players x {} matches",
            player_ids.len(),
            match_ids.len()
        );
        Ok(Self {
            lower_milestone: lower.to_owned(),
            higher_milestone: higher.to_owned(),
            player_ids,
            match_ids,
            cells,
            z,
            breakpoints: TIER_BREAKPOINTS,
            bands: Tier::ALL.map(Tier::band),
        })
    }

    /// Tier of a cell, `None` if the player did not take part in the match.
    #[must_use]
    pub fn tier(&self, player_id: &PlayerId, match_id: &MatchId) -> Option<Tier> {
        self.cells
            .iter()
            .find(|c| &c.player_id == player_id && &c.match_id == match_id)
            .map(|c| c.tier)
    }

    /// Number of cells per tier, in [`Tier::ALL`] order.
    #[must_use]
    pub fn tier_counts(&self) -> [usize; 3] {
        Tier::ALL.map(|tier| self.cells.iter().filter(|c| c.tier == tier).count())
    }
}

#[cfg(test)]
mod tests {
    use lawrace_engine::{Milestone, MilestoneExtractor, MilestoneSet};

    use super::*;
    use crate::tests::{obs, record};

    fn table() -> AchievementTable {
        let matches = vec![
            record(
                "m1",
                &[("a", "Rome"), ("b", "Egypt")],
                vec![
                    obs("m1", "a", 40, 4),
                    obs("m1", "a", 70, 7),
                    obs("m1", "b", 50, 2),
                ],
            ),
            record(
                "m2",
                &[("a", "Rome"), ("c", "Greece")],
                vec![obs("m2", "a", 40, 4), obs("m2", "c", 10, 1)],
            ),
        ];
        let milestones = MilestoneSet::new(vec![
            Milestone::new("4 laws", 4),
            Milestone::new("7 laws", 7),
        ])
        .unwrap();
        MilestoneExtractor::new(milestones).extract(&matches).unwrap()
    }

    #[test]
    fn test_full_and_partial_across_matches() {
        let heatmap = HeatmapMatrix::build(&table(), "4 laws", "7 laws").unwrap();
        let a = PlayerId::from("a");
        assert_eq!(heatmap.tier(&a, &MatchId::from("m1")), Some(Tier::Full));
        assert_eq!(heatmap.tier(&a, &MatchId::from("m2")), Some(Tier::Partial));
        assert_eq!(
            heatmap.tier(&PlayerId::from("b"), &MatchId::from("m1")),
            Some(Tier::None)
        );
        assert_eq!(heatmap.tier(&PlayerId::from("b"), &MatchId::from("m2")), None);
        assert_eq!(heatmap.tier_counts(), [2, 1, 1]);
    }

    #[test]
    fn test_dense_grid_layout() {
        let heatmap = HeatmapMatrix::build(&table(), "4 laws", "7 laws").unwrap();
        assert_eq!(
            heatmap.player_ids,
            vec![PlayerId::from("a"), PlayerId::from("b"), PlayerId::from("c")]
        );
        assert_eq!(heatmap.match_ids.len(), 2);
        assert_eq!(
            heatmap.z,
            vec![
                vec![Some(1.0), Some(0.5)],
                vec![Some(0.0), None],
                vec![None, Some(0.0)],
            ]
        );
    }

    #[test]
    fn test_repeated_builds_serialize_identically() {
        let extracted = table();
        let outputs = (0..3)
            .map(|_| {
                let heatmap = HeatmapMatrix::build(&extracted, "4 laws", "7 laws").unwrap();
                serde_json::to_string(&heatmap).unwrap()
            })
            .collect::<Vec<_>>();
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));

        // A freshly extracted table, not just the same one reused.
        let rebuilt = HeatmapMatrix::build(&table(), "4 laws", "7 laws").unwrap();
        assert_eq!(serde_json::to_string(&rebuilt).unwrap(), outputs[0]);
    }

    #[test]
    fn test_classification_is_exhaustive() {
        let turns = [TurnReached::NOT_REACHED, TurnReached::reached(40)];
        for lower in turns {
            for higher in turns {
                let tier = Tier::classify(lower, higher);
                assert_eq!(
                    usize::from(tier.is_none())
                        + usize::from(tier.is_partial())
                        + usize::from(tier.is_full()),
                    1
                );
                if tier.is_full() {
                    assert!(higher.is_reached());
                }
            }
        }
    }

    #[test]
    fn test_band_values_sit_inside_flat_bands() {
        for tier in Tier::ALL {
            let band = tier.band();
            assert!(band.lower <= tier.value() && tier.value() <= band.upper);
        }
        for pair in TIER_BREAKPOINTS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let none = Tier::None.band();
        let partial = Tier::Partial.band();
        assert!(partial.lower - none.upper < 0.02);
    }

    #[test]
    fn test_wire_format() {
        let heatmap = HeatmapMatrix::build(&table(), "4 laws", "7 laws").unwrap();
        let json = serde_json::to_value(&heatmap).unwrap();
        assert_eq!(
            json["cells"][0],
            serde_json::json!({"player_id": "a", "match_id": "m1", "tier": "full"})
        );
        assert_eq!(
            json["breakpoints"],
            serde_json::json!([0.0, 0.329, 0.34, 0.659, 0.67, 1.0])
        );
        assert_eq!(json["z"][1][1], serde_json::Value::Null);
    }

    #[test]
    fn test_errors() {
        let table = table();
        assert!(matches!(
            HeatmapMatrix::build(&table, "7 laws", "4 laws"),
            Err(HeatmapError::MilestoneOrder { .. })
        ));
        assert!(matches!(
            HeatmapMatrix::build(&table, "4 laws", "4 laws"),
            Err(HeatmapError::MilestoneOrder { .. })
        ));
        assert!(matches!(
            HeatmapMatrix::build(&table, "4 laws", "9 laws"),
            Err(HeatmapError::Lookup(LookupError::UnknownMilestone { .. }))
        ));
    }
}
