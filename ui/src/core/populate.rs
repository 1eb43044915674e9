//! Record → form population: the inverse of collection.
//!
//! `activeTestIds` drives rendering when present. Older records without it
//! get a best-effort reconstruction from the data keys; that path predates
//! custom tests and ignores them, and the rebuilt order is not guaranteed
//! to match the authored one.

use serde_json::Value;

use super::catalog::{Catalog, GraphKind, RecordPage, TestKind};
use super::form::{FormSection, FormState};
use super::record::{
    AssessmentRecord, AttemptsData, BalanceData, BilateralData, CmjData, CustomEntry, ManualData,
    SideHopData, StrengthEntry, TiaData,
};
use super::schema::SectionWalk;

/// Renders the form for a record and writes its values back into the
/// fields. Tolerates partially shaped records: any lookup miss skips that
/// field.
pub fn populate(record: &AssessmentRecord, catalog: &Catalog) -> FormState {
    let active_ids = if record.active_test_ids.is_empty() {
        reconstruct_active_ids(record)
    } else {
        record.active_test_ids.clone()
    };

    let mut form = FormState::render_selection(&active_ids, catalog);

    let mut walk = SectionWalk::new();
    for section in &mut form.sections {
        let slot = walk.next(&section.section_type, section.position);
        let data_key = slot.data_key(&section.kind.data_key());

        match section.kind.page() {
            RecordPage::One => {
                let value = if slot.is_first() {
                    first_page1_value(record, &section.kind)
                } else {
                    record.page1.repeats.get(&data_key).cloned()
                };
                if let Some(value) = value {
                    write_page1(section, value);
                }
            }
            RecordPage::StrengthTests => {
                let value = if slot.is_first() {
                    first_strength_value(record, &section.kind)
                } else {
                    record.page2.strength_tests.repeats.get(&data_key).cloned()
                };
                if let Some(value) = value {
                    write_strength(section, value);
                }
            }
            RecordPage::Manual => {
                let manual = if slot.is_first() {
                    record.page2.manual.clone()
                } else {
                    record
                        .page2
                        .repeats
                        .get(&data_key)
                        .and_then(|value| serde_json::from_value(value.clone()).ok())
                };
                if let Some(manual) = manual {
                    write_manual(section, &manual);
                }
            }
            RecordPage::Custom => {
                if let TestKind::Custom(custom) = section.kind.clone() {
                    if let Some(entry) = record.page2.custom.get(&custom.id).cloned() {
                        write_custom(section, &custom, &entry);
                    }
                }
            }
        }
    }

    form
}

/// Rebuilds a plausible active list from the data keys of a legacy record.
fn reconstruct_active_ids(record: &AssessmentRecord) -> Vec<String> {
    let mut ids = Vec::new();
    let mut push_key = |key: &str| {
        let base = strip_occurrence_suffix(key);
        ids.push(TestKind::section_type_for_data_key(base));
    };

    let page1 = &record.page1;
    if page1.balance.is_some() {
        push_key("balance");
    }
    if page1.cmj.is_some() {
        push_key("cmj");
    }
    if page1.tia.is_some() {
        push_key("tia");
    }
    if page1.sidehop.is_some() {
        push_key("sidehop");
    }
    if page1.squat_analytics.is_some() {
        push_key("squatAnalytics");
    }
    if page1.repeated_bilateral.is_some() {
        push_key("repeatedBilateral");
    }
    if page1.cmj2ben.is_some() {
        push_key("cmj2ben");
    }
    for key in page1.repeats.keys() {
        push_key(key);
    }

    let strength = &record.page2.strength_tests;
    if strength.hip_thrust.is_some() {
        push_key("hipThrust");
    }
    if strength.quadriceps.is_some() {
        push_key("quadriceps");
    }
    if strength.staticsquat_handdrag.is_some() {
        push_key("staticsquatHanddrag");
    }
    if strength.staticsquat_hoftrem.is_some() {
        push_key("staticsquatHoftrem");
    }
    if strength.hamstring.is_some() {
        push_key("hamstring");
    }
    if strength.nordic_hamstring.is_some() {
        push_key("nordicHamstring");
    }
    for key in strength.repeats.keys() {
        push_key(key);
    }

    if record.page2.manual.is_some() {
        ids.push("manual".into());
    }
    for key in record.page2.repeats.keys() {
        if key.starts_with("manual") {
            ids.push("manual".into());
        }
    }

    ids
}

fn strip_occurrence_suffix(key: &str) -> &str {
    if let Some(pos) = key.rfind('_') {
        if key[pos + 1..].chars().all(|c| c.is_ascii_digit()) && pos + 1 < key.len() {
            return &key[..pos];
        }
    }
    key
}

fn first_page1_value(record: &AssessmentRecord, kind: &TestKind) -> Option<Value> {
    let page1 = &record.page1;
    let value = match kind {
        TestKind::Balance => serde_json::to_value(page1.balance.as_ref()?),
        TestKind::Cmj => serde_json::to_value(page1.cmj.as_ref()?),
        TestKind::Tia => serde_json::to_value(page1.tia.as_ref()?),
        TestKind::SideHop => serde_json::to_value(page1.sidehop.as_ref()?),
        TestKind::SquatAnalytics => serde_json::to_value(page1.squat_analytics.as_ref()?),
        TestKind::RepeatedBilateral => serde_json::to_value(page1.repeated_bilateral.as_ref()?),
        TestKind::Cmj2Ben => serde_json::to_value(page1.cmj2ben.as_ref()?),
        _ => return None,
    };
    value.ok()
}

fn first_strength_value(record: &AssessmentRecord, kind: &TestKind) -> Option<Value> {
    let strength = &record.page2.strength_tests;
    let value = match kind {
        TestKind::HipThrust => serde_json::to_value(strength.hip_thrust.as_ref()?),
        TestKind::Quadriceps => serde_json::to_value(strength.quadriceps.as_ref()?),
        TestKind::StaticSquatHand => serde_json::to_value(strength.staticsquat_handdrag.as_ref()?),
        TestKind::StaticSquatHip => serde_json::to_value(strength.staticsquat_hoftrem.as_ref()?),
        TestKind::Hamstring => serde_json::to_value(strength.hamstring.as_ref()?),
        TestKind::NordicHamstring => serde_json::to_value(strength.nordic_hamstring.as_ref()?),
        _ => return None,
    };
    value.ok()
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value).ok()
}

fn write_page1(section: &mut FormSection, value: Value) {
    match section.kind {
        TestKind::Balance => {
            if let Some(data) = decode::<BalanceData>(value) {
                section.set_num("p1_g1_va_score", data.left_score);
                section.set_num("p1_g1_ho_score", data.right_score);
                section.set_num("p1_g1_va_diff", data.left_diff);
                section.set_num("p1_g1_ho_diff", data.right_diff);
                section.comment = data.comment;
            }
        }
        TestKind::Cmj => {
            if let Some(data) = decode::<CmjData>(value) {
                for (i, value) in data.va_jumps.iter().enumerate() {
                    section.set_num(&format!("p1_g2_va_{}", i + 1), *value);
                }
                for (i, value) in data.ho_jumps.iter().enumerate() {
                    section.set_num(&format!("p1_g2_ho_{}", i + 1), *value);
                }
                section.comment = data.comment;
            }
        }
        TestKind::Tia => {
            if let Some(data) = decode::<TiaData>(value) {
                section.set_num("p1_g3_va_jump", data.left_jump);
                section.set_num("p1_g3_ho_jump", data.right_jump);
                section.set_num("p1_g3_va_gct", data.left_gct);
                section.set_num("p1_g3_ho_gct", data.right_gct);
                section.comment = data.comment;
            }
        }
        TestKind::SideHop => {
            if let Some(data) = decode::<SideHopData>(value) {
                section.set_num("p1_g4_va_count", data.left_count);
                section.set_num("p1_g4_ho_count", data.right_count);
                section.comment = data.comment;
            }
        }
        TestKind::SquatAnalytics => write_attempts(section, value, "p1_g5_attempt"),
        TestKind::RepeatedBilateral => {
            if let Some(data) = decode::<BilateralData>(value) {
                section.set_num("p1_g6_avg_height", data.avg_height);
                section.set_num("p1_g6_avg_gct", data.avg_gct);
                section.comment = data.comment;
            }
        }
        TestKind::Cmj2Ben => write_attempts(section, value, "p1_g7_attempt"),
        _ => {}
    }
}

fn write_attempts(section: &mut FormSection, value: Value, base: &str) {
    if let Some(data) = decode::<AttemptsData>(value) {
        section.set_num(&format!("{base}_1"), data.attempt1);
        section.set_num(&format!("{base}_2"), data.attempt2);
        section.set_num(&format!("{base}_3"), data.attempt3);
        section.comment = data.comment;
    }
}

fn write_strength(section: &mut FormSection, value: Value) {
    if matches!(section.kind, TestKind::NordicHamstring) {
        write_attempts(section, value, "p2_g6_attempt");
        return;
    }

    let group = match section.kind {
        TestKind::HipThrust => "p2_g1",
        TestKind::Quadriceps => "p2_g2",
        TestKind::StaticSquatHand => "p2_g3",
        TestKind::StaticSquatHip => "p2_g4",
        _ => "p2_g5",
    };

    if let Some(data) = decode::<StrengthEntry>(value) {
        section.set_num(&format!("{group}_va"), data.left);
        section.set_num(&format!("{group}_ho"), data.right);
        if let Some(tva) = data.tva.filter(|v| *v != 0.0) {
            section.set_num(&format!("{group}_tva"), tva);
        }
        if let Some(both) = data.both.filter(|v| *v != 0.0) {
            section.set_num(&format!("{group}_tva"), both);
        }
        section.comment = data.comment;
    }
}

fn write_manual(section: &mut FormSection, manual: &ManualData) {
    section.set_num("p2_text_srp_tare", manual.srp.tare);
    section.set_num("p2_text_srp_force", manual.srp.force);
    section.set_num("p2_text_spts_kg", manual.spts.kg);
    section.set_num("p2_text_mpu_tare", manual.mpu.tare);
    section.set_num("p2_text_mpu_force", manual.mpu.force);
    section.set_num("p2_text_bpc_hits", manual.bpc.hits);
}

fn write_custom(
    section: &mut FormSection,
    custom: &super::catalog::CustomTest,
    entry: &CustomEntry,
) {
    let base = |field: &str| format!("custom_{}_{field}", custom.id);
    let mut set = |field: &str, value: Option<f64>| {
        if let Some(value) = value {
            section.set_num(&base(field), value);
        }
    };

    set("val1", entry.val1);
    set("val2", entry.val2);
    set("val3", entry.val3);
    set("val1_L", entry.val1_l);
    set("val1_R", entry.val1_r);
    set("val2_L", entry.val2_l);
    set("val2_R", entry.val2_r);
    set("val_L", entry.val_l);
    set("val_R", entry.val_r);
    set("val_Both", entry.val_both);
    set("g1_L", entry.g1_l);
    set("g1_R", entry.g1_r);
    set("g2_L", entry.g2_l);
    set("g2_R", entry.g2_r);
    set("g3_L", entry.g3_l);
    set("g3_R", entry.g3_r);
    set("left", entry.left);
    set("right", entry.right);

    if matches!(custom.def.graph_type, GraphKind::ManualEntry) {
        for (i, value) in entry.manual_values.iter().enumerate() {
            section.set_value(&base(&format!("manual_{}", i + 1)), value.clone());
        }
    }

    if !entry.comment.is_empty() {
        section.comment = entry.comment.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Page1;

    #[test]
    fn strips_occurrence_suffixes_only() {
        assert_eq!(strip_occurrence_suffix("cmj_1"), "cmj");
        assert_eq!(strip_occurrence_suffix("hipThrust_12"), "hipThrust");
        assert_eq!(strip_occurrence_suffix("repeatedBilateral"), "repeatedBilateral");
        // Underscored ids without a trailing number stay whole.
        assert_eq!(strip_occurrence_suffix("repeated_bilateral"), "repeated_bilateral");
    }

    #[test]
    fn reconstructs_legacy_ids_from_data_keys() {
        let mut record = AssessmentRecord::default();
        record.page1 = Page1 {
            cmj: Some(CmjData::default()),
            squat_analytics: Some(AttemptsData::default()),
            ..Default::default()
        };
        record.page2.strength_tests.hip_thrust = Some(StrengthEntry::default());
        record.page2.manual = Some(ManualData::default());

        let ids = reconstruct_active_ids(&record);
        assert_eq!(ids, vec!["cmj", "squat", "hipthrust", "manual"]);
    }

    #[test]
    fn reconstruction_handles_repeat_keys() {
        let mut record = AssessmentRecord::default();
        record.page1.cmj = Some(CmjData::default());
        record
            .page1
            .repeats
            .insert("cmj_1".into(), serde_json::to_value(CmjData::default()).unwrap());

        let ids = reconstruct_active_ids(&record);
        assert_eq!(ids, vec!["cmj", "cmj"]);
    }

    #[test]
    fn zero_populates_as_empty_field() {
        let mut record = AssessmentRecord::default();
        record.active_test_ids = vec!["sidehop".into()];
        record.page1.sidehop = Some(SideHopData {
            left_count: 0.0,
            right_count: 9.0,
            ..Default::default()
        });

        let form = populate(&record, &Catalog::new());
        let section = &form.sections[0];
        assert_eq!(section.field("p1_g4_va_count").unwrap().value, "");
        assert_eq!(section.field("p1_g4_ho_count").unwrap().value, "9");
    }

    #[test]
    fn missing_sub_objects_are_skipped() {
        let mut record = AssessmentRecord::default();
        record.active_test_ids = vec!["balance".into(), "cmj".into()];
        record.page1.cmj = Some(CmjData {
            va_jumps: [30.0, 31.0, 32.0],
            ..Default::default()
        });

        let form = populate(&record, &Catalog::new());
        assert_eq!(form.sections.len(), 2);
        assert_eq!(form.sections[0].field("p1_g1_va_score").unwrap().value, "");
        assert_eq!(form.sections[1].field("p1_g2_va_1_1").unwrap().value, "30");
    }
}
