//! Debounced preview pass: recomputes every section's asymmetry badge
//! from the live field values. The badges written here are what the
//! collector later reads; this is the compute step, collection is not.

use super::asymmetry::{self, AsymmetryBadge, AsymmetryPair};
use super::catalog::{GraphKind, TestKind};
use super::form::{FormSection, FormState};
use super::side::ReferenceSide;

/// Recomputes all badges in place. Invoked on every debounced input event
/// and after population; idempotent for unchanged inputs.
pub fn refresh_badges(form: &mut FormState, reference: ReferenceSide) {
    for section in &mut form.sections {
        if section.badge.is_none() {
            continue;
        }
        if let Some(badge) = badge_for_section(section, reference) {
            section.badge = Some(badge);
        }
    }
}

/// `None` leaves the existing badge untouched (the grouped custom chart
/// only updates once both averages are non-zero).
fn badge_for_section(section: &FormSection, reference: ReferenceSide) -> Option<AsymmetryBadge> {
    match &section.kind {
        TestKind::Balance => {
            let pairs = [
                AsymmetryPair {
                    left: section.num("p1_g1_va_score"),
                    right: section.num("p1_g1_ho_score"),
                    lower_is_better: false,
                },
                AsymmetryPair {
                    left: section.num("p1_g1_va_diff"),
                    right: section.num("p1_g1_ho_diff"),
                    lower_is_better: true,
                },
            ];
            Some(AsymmetryBadge::from_percent(
                asymmetry::combined_percent(&pairs, reference),
                true,
            ))
        }
        TestKind::Cmj => {
            let avg_left = (section.num("p1_g2_va_1")
                + section.num("p1_g2_va_2")
                + section.num("p1_g2_va_3"))
                / 3.0;
            let avg_right = (section.num("p1_g2_ho_1")
                + section.num("p1_g2_ho_2")
                + section.num("p1_g2_ho_3"))
                / 3.0;
            Some(AsymmetryBadge::from_percent(
                asymmetry::pair_percent(avg_left, avg_right, reference, false),
                false,
            ))
        }
        TestKind::Tia => {
            let pairs = [
                AsymmetryPair {
                    left: section.num("p1_g3_va_jump"),
                    right: section.num("p1_g3_ho_jump"),
                    lower_is_better: true,
                },
                AsymmetryPair {
                    left: section.num("p1_g3_va_gct"),
                    right: section.num("p1_g3_ho_gct"),
                    lower_is_better: false,
                },
            ];
            Some(AsymmetryBadge::from_percent(
                asymmetry::combined_percent(&pairs, reference),
                true,
            ))
        }
        TestKind::SideHop => Some(pair_badge(
            section.num("p1_g4_va_count"),
            section.num("p1_g4_ho_count"),
            reference,
        )),
        TestKind::HipThrust => Some(pair_badge(
            section.num("p2_g1_va"),
            section.num("p2_g1_ho"),
            reference,
        )),
        TestKind::Quadriceps => Some(pair_badge(
            section.num("p2_g2_va"),
            section.num("p2_g2_ho"),
            reference,
        )),
        TestKind::StaticSquatHand => Some(pair_badge(
            section.num("p2_g3_va"),
            section.num("p2_g3_ho"),
            reference,
        )),
        TestKind::StaticSquatHip => Some(pair_badge(
            section.num("p2_g4_va"),
            section.num("p2_g4_ho"),
            reference,
        )),
        TestKind::Hamstring => Some(pair_badge(
            section.num("p2_g5_va"),
            section.num("p2_g5_ho"),
            reference,
        )),
        TestKind::Custom(custom) => {
            let base = |field: &str| format!("custom_{}_{field}", custom.id);
            match custom.def.graph_type {
                GraphKind::SingleBar | GraphKind::PairedBar => Some(pair_badge(
                    section.num(&base("left")),
                    section.num(&base("right")),
                    reference,
                )),
                GraphKind::DualAxis => Some(pair_badge(
                    section.num(&base("val1_L")),
                    section.num(&base("val1_R")),
                    reference,
                )),
                GraphKind::ThreeBar => Some(pair_badge(
                    section.num(&base("val_L")),
                    section.num(&base("val_R")),
                    reference,
                )),
                GraphKind::GroupedBar => {
                    let avg_left = (section.num(&base("g1_L"))
                        + section.num(&base("g2_L"))
                        + section.num(&base("g3_L")))
                        / 3.0;
                    let avg_right = (section.num(&base("g1_R"))
                        + section.num(&base("g2_R"))
                        + section.num(&base("g3_R")))
                        / 3.0;
                    if avg_left > 0.0 && avg_right > 0.0 {
                        Some(pair_badge(avg_left, avg_right, reference))
                    } else {
                        None
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn pair_badge(left: f64, right: f64, reference: ReferenceSide) -> AsymmetryBadge {
    AsymmetryBadge::from_percent(asymmetry::pair_percent(left, right, reference, false), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;

    #[test]
    fn hip_thrust_badge_tracks_inputs() {
        let ids = vec!["hipthrust".to_string()];
        let mut form = FormState::render_selection(&ids, &Catalog::new());
        form.set_field("p2_g1_va_0", "100");
        form.set_field("p2_g1_ho_0", "90");

        refresh_badges(&mut form, ReferenceSide::Left);
        let badge = form.sections[0].badge.as_ref().unwrap();
        assert_eq!(badge.value, -10.0);
        assert_eq!(badge.text, "Asymmetri: -10.0%");
    }

    #[test]
    fn balance_uses_the_combined_variant() {
        let ids = vec!["balance".to_string()];
        let mut form = FormState::render_selection(&ids, &Catalog::new());
        form.set_field("p1_g1_va_score_0", "80");
        form.set_field("p1_g1_ho_score_0", "72");

        refresh_badges(&mut form, ReferenceSide::Left);
        let badge = form.sections[0].badge.as_ref().unwrap();
        assert!(badge.text.starts_with("Sammanlagd Asymmetri:"));
        assert_eq!(badge.value, -10.0);
    }

    #[test]
    fn empty_inputs_read_not_applicable() {
        let ids = vec!["hamstring".to_string()];
        let mut form = FormState::render_selection(&ids, &Catalog::new());
        refresh_badges(&mut form, ReferenceSide::Left);
        let badge = form.sections[0].badge.as_ref().unwrap();
        assert_eq!(badge.text, "Asymmetri: N/A");
        assert_eq!(badge.value, 0.0);
    }

    #[test]
    fn sections_without_badges_stay_untouched() {
        let ids = vec!["squat".to_string(), "manual".to_string()];
        let mut form = FormState::render_selection(&ids, &Catalog::new());
        refresh_badges(&mut form, ReferenceSide::Left);
        assert!(form.sections.iter().all(|s| s.badge.is_none()));
    }
}
