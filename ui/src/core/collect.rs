//! Form → record collection.
//!
//! Collection is a pure read over the rendered form: numeric fields parse
//! to zero, asymmetry comes from the badge side channel written by the
//! preview step, and the per-type occurrence counter decides whether a
//! section lands in its typed slot or in a suffixed repeat key.

use serde_json::Value;

use super::catalog::{GraphKind, RecordPage, TestKind};
use super::form::{FormSection, FormState};
use super::record::{
    AssessmentRecord, AttemptsData, BalanceData, BilateralData, BpcData, CmjData, CustomEntry,
    ManualData, MpuData, PatientInfo, SideHopData, SptsData, SrpData, StrengthEntry, TiaData,
};
use super::schema::SectionWalk;

/// Collects the whole record from the rendered form. The record is rebuilt
/// wholesale on every call.
pub fn collect(form: &FormState, patient_info: &PatientInfo) -> AssessmentRecord {
    let mut record = AssessmentRecord {
        patient_info: patient_info.clone(),
        ..Default::default()
    };

    let mut walk = SectionWalk::new();

    for section in &form.sections {
        let slot = walk.next(&section.section_type, section.position);
        record.active_test_ids.push(section.section_type.clone());

        match section.kind.page() {
            RecordPage::One => {
                if slot.is_first() {
                    assign_page1(&mut record, section);
                } else {
                    let key = slot.data_key(&section.kind.data_key());
                    record.page1.repeats.insert(key, page1_value(section));
                }
            }
            RecordPage::StrengthTests => {
                if slot.is_first() {
                    assign_strength(&mut record, section);
                } else {
                    let key = slot.data_key(&section.kind.data_key());
                    record
                        .page2
                        .strength_tests
                        .repeats
                        .insert(key, strength_value(section));
                }
            }
            RecordPage::Manual => {
                let manual = collect_manual(section);
                if slot.is_first() {
                    record.page2.manual = Some(manual);
                } else {
                    record.page2.repeats.insert(
                        slot.data_key("manual"),
                        serde_json::to_value(manual).unwrap_or_default(),
                    );
                }
            }
            RecordPage::Custom => {
                if let TestKind::Custom(custom) = &section.kind {
                    record
                        .page2
                        .custom
                        .insert(custom.id.clone(), collect_custom(section, custom));
                }
            }
        }
    }

    record
}

fn to_value<T: serde::Serialize>(data: T) -> Value {
    serde_json::to_value(data).unwrap_or_default()
}

fn page1_value(section: &FormSection) -> Value {
    match section.kind {
        TestKind::Balance => to_value(collect_balance(section)),
        TestKind::Cmj => to_value(collect_cmj(section)),
        TestKind::Tia => to_value(collect_tia(section)),
        TestKind::SideHop => to_value(collect_sidehop(section)),
        TestKind::SquatAnalytics => to_value(collect_attempts(section, "p1_g5_attempt")),
        TestKind::RepeatedBilateral => to_value(collect_bilateral(section)),
        TestKind::Cmj2Ben => to_value(collect_attempts(section, "p1_g7_attempt")),
        _ => Value::Null,
    }
}

fn assign_page1(record: &mut AssessmentRecord, section: &FormSection) {
    let page1 = &mut record.page1;
    match section.kind {
        TestKind::Balance => page1.balance = Some(collect_balance(section)),
        TestKind::Cmj => page1.cmj = Some(collect_cmj(section)),
        TestKind::Tia => page1.tia = Some(collect_tia(section)),
        TestKind::SideHop => page1.sidehop = Some(collect_sidehop(section)),
        TestKind::SquatAnalytics => {
            page1.squat_analytics = Some(collect_attempts(section, "p1_g5_attempt"))
        }
        TestKind::RepeatedBilateral => page1.repeated_bilateral = Some(collect_bilateral(section)),
        TestKind::Cmj2Ben => page1.cmj2ben = Some(collect_attempts(section, "p1_g7_attempt")),
        _ => {}
    }
}

fn strength_value(section: &FormSection) -> Value {
    match section.kind {
        TestKind::NordicHamstring => to_value(collect_attempts(section, "p2_g6_attempt")),
        _ => to_value(collect_strength(section)),
    }
}

fn assign_strength(record: &mut AssessmentRecord, section: &FormSection) {
    let strength = &mut record.page2.strength_tests;
    match section.kind {
        TestKind::HipThrust => strength.hip_thrust = Some(collect_strength(section)),
        TestKind::Quadriceps => strength.quadriceps = Some(collect_strength(section)),
        TestKind::StaticSquatHand => {
            strength.staticsquat_handdrag = Some(collect_strength(section))
        }
        TestKind::StaticSquatHip => strength.staticsquat_hoftrem = Some(collect_strength(section)),
        TestKind::Hamstring => strength.hamstring = Some(collect_strength(section)),
        TestKind::NordicHamstring => {
            strength.nordic_hamstring = Some(collect_attempts(section, "p2_g6_attempt"))
        }
        _ => {}
    }
}

fn collect_balance(section: &FormSection) -> BalanceData {
    BalanceData {
        left_score: section.num("p1_g1_va_score"),
        right_score: section.num("p1_g1_ho_score"),
        left_diff: section.num("p1_g1_va_diff"),
        right_diff: section.num("p1_g1_ho_diff"),
        comment: section.comment.clone(),
        asymmetry_percent: section.badge_value(),
    }
}

fn collect_cmj(section: &FormSection) -> CmjData {
    CmjData {
        va_jumps: [
            section.num("p1_g2_va_1"),
            section.num("p1_g2_va_2"),
            section.num("p1_g2_va_3"),
        ],
        ho_jumps: [
            section.num("p1_g2_ho_1"),
            section.num("p1_g2_ho_2"),
            section.num("p1_g2_ho_3"),
        ],
        comment: section.comment.clone(),
        asymmetry_percent: section.badge_value(),
    }
}

fn collect_tia(section: &FormSection) -> TiaData {
    TiaData {
        left_jump: section.num("p1_g3_va_jump"),
        right_jump: section.num("p1_g3_ho_jump"),
        left_gct: section.num("p1_g3_va_gct"),
        right_gct: section.num("p1_g3_ho_gct"),
        comment: section.comment.clone(),
        asymmetry_percent: section.badge_value(),
    }
}

fn collect_sidehop(section: &FormSection) -> SideHopData {
    SideHopData {
        left_count: section.num("p1_g4_va_count"),
        right_count: section.num("p1_g4_ho_count"),
        comment: section.comment.clone(),
        asymmetry_percent: section.badge_value(),
    }
}

fn collect_attempts(section: &FormSection, base: &str) -> AttemptsData {
    AttemptsData {
        attempt1: section.num(&format!("{base}_1")),
        attempt2: section.num(&format!("{base}_2")),
        attempt3: section.num(&format!("{base}_3")),
        comment: section.comment.clone(),
    }
}

fn collect_bilateral(section: &FormSection) -> BilateralData {
    BilateralData {
        avg_height: section.num("p1_g6_avg_height"),
        avg_gct: section.num("p1_g6_avg_gct"),
        comment: section.comment.clone(),
    }
}

fn collect_strength(section: &FormSection) -> StrengthEntry {
    let (group, two_leg) = match section.kind {
        TestKind::HipThrust => ("p2_g1", TwoLeg::Tva),
        TestKind::Quadriceps => ("p2_g2", TwoLeg::None),
        TestKind::StaticSquatHand => ("p2_g3", TwoLeg::Both),
        TestKind::StaticSquatHip => ("p2_g4", TwoLeg::Both),
        _ => ("p2_g5", TwoLeg::None),
    };

    let mut entry = StrengthEntry {
        left: section.num(&format!("{group}_va")),
        right: section.num(&format!("{group}_ho")),
        comment: section.comment.clone(),
        asymmetry_percent: section.badge_value(),
        active: true,
        ..Default::default()
    };

    match two_leg {
        TwoLeg::Tva => entry.tva = Some(section.num(&format!("{group}_tva"))),
        TwoLeg::Both => {
            // Static squats have always persisted the two-leg value twice.
            let value = section.num(&format!("{group}_tva"));
            entry.tva = Some(value);
            entry.both = Some(value);
        }
        TwoLeg::None => {}
    }

    entry
}

enum TwoLeg {
    None,
    Tva,
    Both,
}

fn collect_manual(section: &FormSection) -> ManualData {
    ManualData {
        srp: SrpData {
            tare: section.num("p2_text_srp_tare"),
            force: section.num("p2_text_srp_force"),
        },
        spts: SptsData {
            kg: section.num("p2_text_spts_kg"),
        },
        mpu: MpuData {
            tare: section.num("p2_text_mpu_tare"),
            force: section.num("p2_text_mpu_force"),
        },
        bpc: BpcData {
            hits: section.num("p2_text_bpc_hits"),
        },
    }
}

fn collect_custom(section: &FormSection, custom: &super::catalog::CustomTest) -> CustomEntry {
    let base = |field: &str| format!("custom_{}_{field}", custom.id);
    let num = |field: &str| Some(section.num(&base(field)));

    let mut entry = CustomEntry {
        active: true,
        graph_type: custom.def.graph_type,
        title: custom.def.name.clone(),
        config: custom.def.config.clone(),
        comment: section.comment.clone(),
        ..Default::default()
    };

    match custom.def.graph_type {
        GraphKind::GroupedBar => {
            entry.g1_l = num("g1_L");
            entry.g1_r = num("g1_R");
            entry.g2_l = num("g2_L");
            entry.g2_r = num("g2_R");
            entry.g3_l = num("g3_L");
            entry.g3_r = num("g3_R");
            entry.asymmetry_percent = Some(section.badge_value());
        }
        GraphKind::DualAxis => {
            entry.val1_l = num("val1_L");
            entry.val1_r = num("val1_R");
            entry.val2_l = num("val2_L");
            entry.val2_r = num("val2_R");
            entry.asymmetry_percent = Some(section.badge_value());
        }
        GraphKind::ThreeBar => {
            entry.val_l = num("val_L");
            entry.val_r = num("val_R");
            entry.val_both = num("val_Both");
            entry.asymmetry_percent = Some(section.badge_value());
        }
        GraphKind::Donut | GraphKind::SingleBars3 => {
            entry.val1 = num("val1");
            entry.val2 = num("val2");
            entry.val3 = num("val3");
        }
        GraphKind::ManualEntry => {
            entry.manual_values = section
                .fields
                .iter()
                .map(|field| field.value.clone())
                .collect();
        }
        GraphKind::SingleBar | GraphKind::PairedBar => {
            entry.left = num("left");
            entry.right = num("right");
            entry.asymmetry_percent = Some(section.badge_value());
        }
        GraphKind::Bilateral => {
            entry.val1 = num("val1");
            entry.val2 = num("val2");
        }
        GraphKind::Unknown => {
            entry.val1 = num("val1");
        }
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;

    fn collect_ids(ids: &[&str]) -> AssessmentRecord {
        let active: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        let form = FormState::render_selection(&active, &Catalog::new());
        collect(&form, &PatientInfo::default())
    }

    #[test]
    fn occurrence_vs_position_numbering() {
        let record = collect_ids(&["cmj", "cmj", "hipthrust"]);
        assert!(record.page1.cmj.is_some());
        assert!(record.page1.repeats.contains_key("cmj_1"));
        assert!(record.page2.strength_tests.hip_thrust.is_some());
        assert_eq!(record.active_test_ids, vec!["cmj", "cmj", "hipthrust"]);
    }

    #[test]
    fn fields_read_through_position_suffixes() {
        let active: Vec<String> = vec!["cmj".into(), "cmj".into()];
        let mut form = FormState::render_selection(&active, &Catalog::new());
        form.set_field("p1_g2_va_1_0", "30");
        form.set_field("p1_g2_va_1_1", "28");

        let record = collect(&form, &PatientInfo::default());
        assert_eq!(record.page1.cmj.as_ref().unwrap().va_jumps[0], 30.0);

        let repeat: CmjData =
            serde_json::from_value(record.page1.repeats["cmj_1"].clone()).unwrap();
        assert_eq!(repeat.va_jumps[0], 28.0);
    }

    #[test]
    fn static_squat_persists_two_leg_value_twice() {
        let active: Vec<String> = vec!["staticsquat-handdrag".into()];
        let mut form = FormState::render_selection(&active, &Catalog::new());
        form.set_field("p2_g3_tva_0", "140");

        let record = collect(&form, &PatientInfo::default());
        let entry = record.page2.strength_tests.staticsquat_handdrag.unwrap();
        assert_eq!(entry.tva, Some(140.0));
        assert_eq!(entry.both, Some(140.0));
    }

    #[test]
    fn manual_repeat_lands_next_to_page2() {
        let record = collect_ids(&["manual", "manual"]);
        assert!(record.page2.manual.is_some());
        assert!(record.page2.repeats.contains_key("manual_1"));
    }
}
