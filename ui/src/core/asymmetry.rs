//! Left/right asymmetry math and the badge it feeds.
//!
//! The badge written here is the only place an asymmetry value lives: the
//! collector reads it back verbatim instead of recomputing, so preview and
//! persisted records always agree.

use serde::{Deserialize, Serialize};

use super::side::ReferenceSide;

/// Fixed coloring threshold. At or below −10 % the badge flags attention.
pub const ATTENTION_THRESHOLD: f64 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Attention,
}

impl Verdict {
    pub fn css_class(self) -> &'static str {
        match self {
            Verdict::Good => "asymmetry--good",
            Verdict::Attention => "asymmetry--attention",
        }
    }
}

pub fn verdict(percent: f64) -> Verdict {
    if percent <= ATTENTION_THRESHOLD {
        Verdict::Attention
    } else {
        Verdict::Good
    }
}

/// One left/right measurement pair feeding the combined variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsymmetryPair {
    pub left: f64,
    pub right: f64,
    pub lower_is_better: bool,
}

/// Signed percentage difference between the reference side and the other
/// side. `None` when either value is zero or no reference side is set.
pub fn pair_percent(
    left: f64,
    right: f64,
    reference: ReferenceSide,
    lower_is_better: bool,
) -> Option<f64> {
    if left == 0.0 || right == 0.0 || reference.is_none() {
        return None;
    }

    let (reference_value, other_value) = match reference {
        ReferenceSide::Left => (left, right),
        _ => (right, left),
    };

    let mut percent = (other_value - reference_value) / reference_value * 100.0;
    if lower_is_better {
        percent = -percent;
    }
    Some(percent)
}

/// Averages the asymmetry of independent metric pairs belonging to one
/// test, skipping any pair with a zero side. `None` only if no pair
/// qualified.
pub fn combined_percent(pairs: &[AsymmetryPair], reference: ReferenceSide) -> Option<f64> {
    let mut values = Vec::new();
    for pair in pairs {
        if pair.left > 0.0 && pair.right > 0.0 && !reference.is_none() {
            if let Some(percent) =
                pair_percent(pair.left, pair.right, reference, pair.lower_is_better)
            {
                values.push(percent);
            }
        }
    }
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Display text plus the numeric side channel the collector reads back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AsymmetryBadge {
    pub text: String,
    pub value: f64,
}

impl AsymmetryBadge {
    /// Builds the badge from an optional percentage. The stored value is
    /// rounded to one decimal, matching what the badge displays.
    pub fn from_percent(percent: Option<f64>, combined: bool) -> Self {
        let prefix = if combined {
            "Sammanlagd Asymmetri"
        } else {
            "Asymmetri"
        };
        match percent {
            None => Self {
                text: format!("{prefix}: N/A"),
                value: 0.0,
            },
            Some(p) => {
                let rounded = (p * 10.0).round() / 10.0;
                Self {
                    text: format!("{prefix}: {rounded:.1}%"),
                    value: rounded,
                }
            }
        }
    }

    pub fn verdict(&self) -> Verdict {
        verdict(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_convention_matches_reference_side() {
        // (90 - 100) / 100 * 100 = -10.0
        let percent = pair_percent(100.0, 90.0, ReferenceSide::Left, false).unwrap();
        assert_eq!(percent, -10.0);

        let flipped = pair_percent(100.0, 90.0, ReferenceSide::Right, false).unwrap();
        assert!((flipped - 11.111_111).abs() < 1e-3);
    }

    #[test]
    fn lower_is_better_negates() {
        let percent = pair_percent(100.0, 90.0, ReferenceSide::Left, true).unwrap();
        assert_eq!(percent, 10.0);
    }

    #[test]
    fn zero_values_and_missing_reference_yield_none() {
        assert_eq!(pair_percent(0.0, 50.0, ReferenceSide::Left, false), None);
        assert_eq!(pair_percent(50.0, 0.0, ReferenceSide::Left, false), None);
        assert_eq!(pair_percent(100.0, 50.0, ReferenceSide::None, false), None);
    }

    #[test]
    fn verdict_boundary_is_inclusive() {
        assert_eq!(verdict(-9.9), Verdict::Good);
        assert_eq!(verdict(-10.0), Verdict::Attention);
        assert_eq!(verdict(-10.1), Verdict::Attention);
        assert_eq!(verdict(4.2), Verdict::Good);
    }

    #[test]
    fn combined_skips_zero_pairs() {
        let pairs = [
            AsymmetryPair {
                left: 100.0,
                right: 90.0,
                lower_is_better: false,
            },
            AsymmetryPair {
                left: 0.0,
                right: 50.0,
                lower_is_better: false,
            },
        ];
        let percent = combined_percent(&pairs, ReferenceSide::Left).unwrap();
        assert_eq!(percent, -10.0);
    }

    #[test]
    fn combined_is_none_when_no_pair_qualifies() {
        let pairs = [AsymmetryPair {
            left: 0.0,
            right: 0.0,
            lower_is_better: false,
        }];
        assert_eq!(combined_percent(&pairs, ReferenceSide::Left), None);
        assert_eq!(
            combined_percent(
                &[AsymmetryPair {
                    left: 10.0,
                    right: 10.0,
                    lower_is_better: false
                }],
                ReferenceSide::None
            ),
            None
        );
    }

    #[test]
    fn badge_text_and_value_agree() {
        let badge = AsymmetryBadge::from_percent(Some(-10.04), false);
        assert_eq!(badge.text, "Asymmetri: -10.0%");
        assert_eq!(badge.value, -10.0);
        assert_eq!(badge.verdict(), Verdict::Attention);

        let na = AsymmetryBadge::from_percent(None, true);
        assert_eq!(na.text, "Sammanlagd Asymmetri: N/A");
        assert_eq!(na.value, 0.0);
    }
}
