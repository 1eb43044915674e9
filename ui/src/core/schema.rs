//! Field schema per test kind, and the one helper that computes the two
//! numbering schemes the round-trip depends on.
//!
//! Field ids are suffixed with the section's *position* in the active list
//! (`_0`, `_1`, …) so repeated tests never collide, while data keys are
//! suffixed with the per-type *occurrence count* (`cmj`, `cmj_1`, …). The
//! two schemes are deliberately different; `SectionWalk` is the single
//! implementation used by the renderer, collector, and populator.

use std::collections::HashMap;

use super::catalog::{GraphKind, TestKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number { step: f64 },
    Text,
}

/// One typed input inside a section. `base_id` is the id without the
/// position suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub base_id: String,
    pub label: String,
    pub unit: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    fn number(base_id: impl Into<String>, label: impl Into<String>, unit: &str, step: f64) -> Self {
        Self {
            base_id: base_id.into(),
            label: label.into(),
            unit: unit.into(),
            kind: FieldKind::Number { step },
        }
    }

    fn text(base_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            label: label.into(),
            unit: String::new(),
            kind: FieldKind::Text,
        }
    }
}

/// Ordered field list for a section of the given kind. This is the single
/// source for rendering, collection, and population.
pub fn fields_for(kind: &TestKind) -> Vec<FieldSpec> {
    match kind {
        TestKind::Balance => vec![
            FieldSpec::number("p1_g1_va_score", "VÄ Score", "", 1.0),
            FieldSpec::number("p1_g1_va_diff", "VÄ Gen. diff", "cm", 0.01),
            FieldSpec::number("p1_g1_ho_score", "HÖ Score", "", 1.0),
            FieldSpec::number("p1_g1_ho_diff", "HÖ Gen. diff", "cm", 0.01),
        ],
        TestKind::Cmj => vec![
            FieldSpec::number("p1_g2_va_1", "VÄ Hopp 1", "cm", 1.0),
            FieldSpec::number("p1_g2_va_2", "VÄ Hopp 2", "cm", 1.0),
            FieldSpec::number("p1_g2_va_3", "VÄ Hopp 3", "cm", 1.0),
            FieldSpec::number("p1_g2_ho_1", "HÖ Hopp 1", "cm", 1.0),
            FieldSpec::number("p1_g2_ho_2", "HÖ Hopp 2", "cm", 1.0),
            FieldSpec::number("p1_g2_ho_3", "HÖ Hopp 3", "cm", 1.0),
        ],
        TestKind::Tia => vec![
            FieldSpec::number("p1_g3_va_jump", "VÄ Gen. hopphöjd", "cm", 0.1),
            FieldSpec::number("p1_g3_va_gct", "VÄ GCT", "s", 0.01),
            FieldSpec::number("p1_g3_ho_jump", "HÖ Gen. hopphöjd", "cm", 0.1),
            FieldSpec::number("p1_g3_ho_gct", "HÖ GCT", "s", 0.01),
        ],
        TestKind::SideHop => vec![
            FieldSpec::number("p1_g4_va_count", "VÄ Antal", "st", 1.0),
            FieldSpec::number("p1_g4_ho_count", "HÖ Antal", "st", 1.0),
        ],
        TestKind::SquatAnalytics => vec![
            FieldSpec::number("p1_g5_attempt_1", "Försök 1", "%", 1.0),
            FieldSpec::number("p1_g5_attempt_2", "Försök 2", "%", 1.0),
            FieldSpec::number("p1_g5_attempt_3", "Försök 3", "%", 1.0),
        ],
        TestKind::RepeatedBilateral => vec![
            FieldSpec::number("p1_g6_avg_height", "Gen. hopphöjd", "cm", 0.1),
            FieldSpec::number("p1_g6_avg_gct", "Gen. GCT", "s", 0.01),
        ],
        TestKind::Cmj2Ben => vec![
            FieldSpec::number("p1_g7_attempt_1", "Försök 1", "cm", 1.0),
            FieldSpec::number("p1_g7_attempt_2", "Försök 2", "cm", 1.0),
            FieldSpec::number("p1_g7_attempt_3", "Försök 3", "cm", 1.0),
        ],
        TestKind::HipThrust => vec![
            FieldSpec::number("p2_g1_va", "Hip Thrust VÄ", "kg", 0.1),
            FieldSpec::number("p2_g1_ho", "Hip Thrust HÖ", "kg", 0.1),
            FieldSpec::number("p2_g1_tva", "Två ben (Djur)", "kg", 0.1),
        ],
        TestKind::Quadriceps => vec![
            FieldSpec::number("p2_g2_va", "Quadriceps VÄ", "kg", 0.1),
            FieldSpec::number("p2_g2_ho", "Quadriceps HÖ", "kg", 0.1),
        ],
        TestKind::StaticSquatHand => vec![
            FieldSpec::number("p2_g3_va", "VÄ", "kg", 0.1),
            FieldSpec::number("p2_g3_ho", "HÖ", "kg", 0.1),
            FieldSpec::number("p2_g3_tva", "Två ben (Djur)", "kg", 0.1),
        ],
        TestKind::StaticSquatHip => vec![
            FieldSpec::number("p2_g4_va", "VÄ", "kg", 0.1),
            FieldSpec::number("p2_g4_ho", "HÖ", "kg", 0.1),
            FieldSpec::number("p2_g4_tva", "Två ben (Djur)", "kg", 0.1),
        ],
        TestKind::Hamstring => vec![
            FieldSpec::number("p2_g5_va", "Hamstring VÄ", "N", 0.1),
            FieldSpec::number("p2_g5_ho", "Hamstring HÖ", "N", 0.1),
        ],
        TestKind::NordicHamstring => vec![
            FieldSpec::number("p2_g6_attempt_1", "Försök 1", "N", 1.0),
            FieldSpec::number("p2_g6_attempt_2", "Försök 2", "N", 1.0),
            FieldSpec::number("p2_g6_attempt_3", "Försök 3", "N", 1.0),
        ],
        TestKind::Manual => vec![
            FieldSpec::number("p2_text_srp_tare", "SRP Tare", "N", 1.0),
            FieldSpec::number("p2_text_srp_force", "SRP Force", "N", 1.0),
            FieldSpec::number("p2_text_spts_kg", "SPTS Vikt", "kg", 1.0),
            FieldSpec::number("p2_text_mpu_tare", "MPU Tare", "N", 1.0),
            FieldSpec::number("p2_text_mpu_force", "MPU Force", "N", 1.0),
            FieldSpec::number("p2_text_bpc_hits", "BPC Antal träffar", "st", 1.0),
        ],
        TestKind::Custom(custom) => custom_fields(&custom.id, &custom.def),
    }
}

/// Field pattern for a custom test, selected by its graph kind. Ids are
/// shaped `custom_{id}_{field}` and must stay byte-stable: persisted data
/// was collected against them.
fn custom_fields(id: &str, def: &super::catalog::TestDefinition) -> Vec<FieldSpec> {
    let base = |field: &str| format!("custom_{id}_{field}");
    let label = |index: usize| def.config.input_label(index);
    let unit = def.config.unit.clone().unwrap_or_default();

    match def.graph_type {
        GraphKind::DualAxis => vec![
            FieldSpec::number(base("val1_L"), format!("VÄ {}", label(0)), "cm", 0.1),
            FieldSpec::number(base("val2_L"), format!("VÄ {}", label(1)), "s", 0.01),
            FieldSpec::number(base("val1_R"), format!("HÖ {}", label(0)), "cm", 0.1),
            FieldSpec::number(base("val2_R"), format!("HÖ {}", label(1)), "s", 0.01),
        ],
        GraphKind::GroupedBar => vec![
            FieldSpec::number(base("g1_L"), format!("VÄ {}", label(0)), "cm", 1.0),
            FieldSpec::number(base("g2_L"), format!("VÄ {}", label(1)), "cm", 1.0),
            FieldSpec::number(base("g3_L"), format!("VÄ {}", label(2)), "cm", 1.0),
            FieldSpec::number(base("g1_R"), format!("HÖ {}", label(0)), "cm", 1.0),
            FieldSpec::number(base("g2_R"), format!("HÖ {}", label(1)), "cm", 1.0),
            FieldSpec::number(base("g3_R"), format!("HÖ {}", label(2)), "cm", 1.0),
        ],
        GraphKind::ThreeBar => vec![
            FieldSpec::number(base("val_L"), "VÄ", "kg", 0.1),
            FieldSpec::number(base("val_R"), "HÖ", "kg", 0.1),
            FieldSpec::number(base("val_Both"), "Två ben (Djur)", "kg", 0.1),
        ],
        GraphKind::SingleBar | GraphKind::PairedBar => vec![
            FieldSpec::number(base("left"), "VÄ", &unit, 0.1),
            FieldSpec::number(base("right"), "HÖ", &unit, 0.1),
        ],
        GraphKind::Bilateral => vec![
            FieldSpec::number(base("val1"), label(0), "cm", 0.1),
            FieldSpec::number(base("val2"), label(1), "s", 0.01),
        ],
        GraphKind::Donut => vec![
            FieldSpec::number(base("val1"), label(0), "%", 1.0),
            FieldSpec::number(base("val2"), label(1), "%", 1.0),
            FieldSpec::number(base("val3"), label(2), "%", 1.0),
        ],
        GraphKind::SingleBars3 => vec![
            FieldSpec::number(base("val1"), label(0), &unit, 1.0),
            FieldSpec::number(base("val2"), label(1), &unit, 1.0),
            FieldSpec::number(base("val3"), label(2), &unit, 1.0),
        ],
        GraphKind::ManualEntry => {
            let count = def
                .config
                .metric_names
                .len()
                .max(def.config.input_labels.len())
                .max(1);
            (0..count)
                .map(|i| FieldSpec::text(base(&format!("manual_{}", i + 1)), label(i)))
                .collect()
        }
        GraphKind::Unknown => Vec::new(),
    }
}

/// Base id of the comment textarea, if the kind has one.
pub fn comment_base(kind: &TestKind) -> Option<String> {
    match kind {
        TestKind::Balance => Some("comment_balance".into()),
        TestKind::Cmj => Some("comment_cmj".into()),
        TestKind::Tia => Some("comment_tia".into()),
        TestKind::SideHop => Some("comment_sidehop".into()),
        TestKind::SquatAnalytics => Some("comment_squat".into()),
        TestKind::RepeatedBilateral => Some("comment_repeated_bilateral".into()),
        TestKind::Cmj2Ben => Some("comment_cmj2ben".into()),
        TestKind::HipThrust => Some("comment_hipthrust".into()),
        TestKind::Quadriceps => Some("comment_quads".into()),
        TestKind::StaticSquatHand => Some("comment_squat_pull_handdrag".into()),
        TestKind::StaticSquatHip => Some("comment_squat_pull_hoftrem".into()),
        TestKind::Hamstring => Some("comment_hamstring".into()),
        TestKind::NordicHamstring => Some("comment_nordic_hamstring".into()),
        TestKind::Manual => None,
        TestKind::Custom(custom) => Some(format!("comment_custom_{}", custom.id)),
    }
}

/// Base id of the asymmetry badge, if the kind renders one.
pub fn badge_base(kind: &TestKind) -> Option<String> {
    match kind {
        TestKind::Balance => Some("asymmetry_balance".into()),
        TestKind::Cmj => Some("asymmetry_cmj".into()),
        TestKind::Tia => Some("asymmetry_tia".into()),
        TestKind::SideHop => Some("asymmetry_sidehop".into()),
        TestKind::HipThrust => Some("asymmetry_hipthrust".into()),
        TestKind::Quadriceps => Some("asymmetry_quads".into()),
        TestKind::StaticSquatHand => Some("asymmetry_squat_pull_handdrag".into()),
        TestKind::StaticSquatHip => Some("asymmetry_squat_pull_hoftrem".into()),
        TestKind::Hamstring => Some("asymmetry_hamstring".into()),
        TestKind::SquatAnalytics
        | TestKind::RepeatedBilateral
        | TestKind::Cmj2Ben
        | TestKind::NordicHamstring
        | TestKind::Manual => None,
        TestKind::Custom(custom) => custom
            .def
            .graph_type
            .has_badge()
            .then(|| format!("asymmetry_custom_{}", custom.id)),
    }
}

/// One step of a walk over the active list.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSlot {
    pub section_type: String,
    pub position: usize,
    /// 1-based occurrence of this type so far.
    pub occurrence: u32,
}

impl SectionSlot {
    /// DOM-side suffix: position in the active list.
    pub fn field_suffix(&self) -> String {
        format!("_{}", self.position)
    }

    pub fn is_first(&self) -> bool {
        self.occurrence == 1
    }

    /// Record-side key: base for the first occurrence, `base_{n}` after.
    pub fn data_key(&self, base: &str) -> String {
        if self.occurrence <= 1 {
            base.to_string()
        } else {
            format!("{base}_{}", self.occurrence - 1)
        }
    }
}

/// Running occurrence counter over an active list walk. Renderer,
/// collector, and populator all use this, never a private re-count.
#[derive(Debug, Default)]
pub struct SectionWalk {
    counts: HashMap<String, u32>,
}

impl SectionWalk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, section_type: &str, position: usize) -> SectionSlot {
        let count = self.counts.entry(section_type.to_string()).or_insert(0);
        *count += 1;
        SectionSlot {
            section_type: section_type.to_string(),
            position,
            occurrence: *count,
        }
    }
}

/// Heading suffix for repeated instances: empty for a unique test, ` #k`
/// when the same id appears more than once in the whole list.
pub fn instance_label(occurrence: u32, total: u32) -> String {
    if total > 1 {
        format!(" #{occurrence}")
    } else {
        String::new()
    }
}

/// Per-type totals over a whole active list, for `instance_label`.
pub fn total_counts(active_ids: &[String]) -> HashMap<String, u32> {
    let mut totals = HashMap::new();
    for id in active_ids {
        *totals.entry(id.clone()).or_insert(0) += 1;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CustomTest, GraphKind, TestDefinition};

    fn custom(graph_type: GraphKind) -> TestKind {
        TestKind::Custom(CustomTest {
            id: "abc".into(),
            def: TestDefinition {
                name: "Testet".into(),
                graph_type,
                ..Default::default()
            },
        })
    }

    #[test]
    fn walk_produces_position_and_occurrence_numbering() {
        let mut walk = SectionWalk::new();
        let slots: Vec<SectionSlot> = ["cmj", "cmj", "hipthrust"]
            .iter()
            .enumerate()
            .map(|(i, id)| walk.next(id, i))
            .collect();

        assert_eq!(slots[0].field_suffix(), "_0");
        assert_eq!(slots[1].field_suffix(), "_1");
        assert_eq!(slots[2].field_suffix(), "_2");

        assert_eq!(slots[0].data_key("cmj"), "cmj");
        assert_eq!(slots[1].data_key("cmj"), "cmj_1");
        assert_eq!(slots[2].data_key("hipThrust"), "hipThrust");
    }

    #[test]
    fn three_bar_custom_pattern_is_exact() {
        let ids: Vec<String> = fields_for(&custom(GraphKind::ThreeBar))
            .into_iter()
            .map(|field| field.base_id)
            .collect();
        assert_eq!(
            ids,
            vec!["custom_abc_val_L", "custom_abc_val_R", "custom_abc_val_Both"]
        );
    }

    #[test]
    fn grouped_custom_pattern_uses_g_fields() {
        let ids: Vec<String> = fields_for(&custom(GraphKind::GroupedBar))
            .into_iter()
            .map(|field| field.base_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "custom_abc_g1_L",
                "custom_abc_g2_L",
                "custom_abc_g3_L",
                "custom_abc_g1_R",
                "custom_abc_g2_R",
                "custom_abc_g3_R",
            ]
        );
    }

    #[test]
    fn unknown_custom_kind_has_no_fields() {
        assert!(fields_for(&custom(GraphKind::Unknown)).is_empty());
    }

    #[test]
    fn badge_only_for_asymmetric_kinds() {
        assert!(badge_base(&TestKind::HipThrust).is_some());
        assert!(badge_base(&TestKind::NordicHamstring).is_none());
        assert!(badge_base(&custom(GraphKind::ThreeBar)).is_some());
        assert!(badge_base(&custom(GraphKind::Donut)).is_none());
    }

    #[test]
    fn instance_labels() {
        assert_eq!(instance_label(1, 1), "");
        assert_eq!(instance_label(1, 2), " #1");
        assert_eq!(instance_label(2, 2), " #2");
    }
}
