//! The assessment record: the canonical collected-data shape.
//!
//! Field names mirror the persisted document format exactly. First
//! occurrences of each test live in typed slots; repeated occurrences
//! (`cmj_1`, `hipThrust_1`, …) are flattened next to them as raw JSON and
//! decoded by kind when populating. Records are always rebuilt wholesale
//! by the collector, never patched in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::catalog::{GraphConfig, GraphKind};
use super::side::ReferenceSide;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentRecord {
    pub patient_info: PatientInfo,
    pub page1: Page1,
    pub page2: Page2,
    /// Raw section type strings in DOM order; the authoritative source for
    /// re-rendering on reload.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub active_test_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInfo {
    pub name: String,
    pub internal_id: String,
    pub date: String,
    pub sport_position: String,
    pub created_by: String,
    pub dominant_side_type: String,
    pub dominant_side: ReferenceSide,
    pub injured_side: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmj: Option<CmjData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tia: Option<TiaData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidehop: Option<SideHopData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squat_analytics: Option<AttemptsData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeated_bilateral: Option<BilateralData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmj2ben: Option<AttemptsData>,
    /// Repeat occurrences, keyed `cmj_1`, `balance_2`, …
    #[serde(flatten)]
    pub repeats: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page2 {
    pub strength_tests: StrengthTests,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<ManualData>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, CustomEntry>,
    /// Repeat occurrences outside `strengthTests`, e.g. `manual_1`.
    #[serde(flatten)]
    pub repeats: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthTests {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hip_thrust: Option<StrengthEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadriceps: Option<StrengthEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staticsquat_handdrag: Option<StrengthEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staticsquat_hoftrem: Option<StrengthEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hamstring: Option<StrengthEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nordic_hamstring: Option<AttemptsData>,
    #[serde(flatten)]
    pub repeats: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceData {
    pub left_score: f64,
    pub right_score: f64,
    pub left_diff: f64,
    pub right_diff: f64,
    pub comment: String,
    pub asymmetry_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CmjData {
    pub va_jumps: [f64; 3],
    pub ho_jumps: [f64; 3],
    pub comment: String,
    pub asymmetry_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TiaData {
    pub left_jump: f64,
    pub right_jump: f64,
    pub left_gct: f64,
    pub right_gct: f64,
    pub comment: String,
    pub asymmetry_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SideHopData {
    pub left_count: f64,
    pub right_count: f64,
    pub comment: String,
    pub asymmetry_percent: f64,
}

/// Three-attempt tests (Squat Analytics, CMJ two-leg, Nordic Hamstrings).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttemptsData {
    pub attempt1: f64,
    pub attempt2: f64,
    pub attempt3: f64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BilateralData {
    pub avg_height: f64,
    pub avg_gct: f64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrengthEntry {
    pub left: f64,
    pub right: f64,
    /// Two-leg pull; present for hip thrust and the static squats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tva: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub both: Option<f64>,
    pub comment: String,
    pub asymmetry_percent: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualData {
    pub srp: SrpData,
    pub spts: SptsData,
    pub mpu: MpuData,
    pub bpc: BpcData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SrpData {
    pub tare: f64,
    pub force: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SptsData {
    pub kg: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MpuData {
    pub tare: f64,
    pub force: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BpcData {
    pub hits: f64,
}

/// Collected data for one custom test. Which value fields are set depends
/// on the definition's graph kind; the definition metadata is copied in so
/// report rendering needs no second lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomEntry {
    pub active: bool,
    pub graph_type: GraphKind,
    pub title: String,
    pub config: GraphConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val3: Option<f64>,
    #[serde(rename = "val1_L", skip_serializing_if = "Option::is_none")]
    pub val1_l: Option<f64>,
    #[serde(rename = "val1_R", skip_serializing_if = "Option::is_none")]
    pub val1_r: Option<f64>,
    #[serde(rename = "val2_L", skip_serializing_if = "Option::is_none")]
    pub val2_l: Option<f64>,
    #[serde(rename = "val2_R", skip_serializing_if = "Option::is_none")]
    pub val2_r: Option<f64>,
    #[serde(rename = "val_L", skip_serializing_if = "Option::is_none")]
    pub val_l: Option<f64>,
    #[serde(rename = "val_R", skip_serializing_if = "Option::is_none")]
    pub val_r: Option<f64>,
    #[serde(rename = "val_Both", skip_serializing_if = "Option::is_none")]
    pub val_both: Option<f64>,
    #[serde(rename = "g1_L", skip_serializing_if = "Option::is_none")]
    pub g1_l: Option<f64>,
    #[serde(rename = "g1_R", skip_serializing_if = "Option::is_none")]
    pub g1_r: Option<f64>,
    #[serde(rename = "g2_L", skip_serializing_if = "Option::is_none")]
    pub g2_l: Option<f64>,
    #[serde(rename = "g2_R", skip_serializing_if = "Option::is_none")]
    pub g2_r: Option<f64>,
    #[serde(rename = "g3_L", skip_serializing_if = "Option::is_none")]
    pub g3_l: Option<f64>,
    #[serde(rename = "g3_R", skip_serializing_if = "Option::is_none")]
    pub g3_r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub manual_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asymmetry_percent: Option<f64>,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_persisted_format() {
        let mut record = AssessmentRecord::default();
        record.page1.squat_analytics = Some(AttemptsData::default());
        record.page1.repeated_bilateral = Some(BilateralData::default());
        record.page2.strength_tests.hip_thrust = Some(StrengthEntry::default());
        record.page2.strength_tests.nordic_hamstring = Some(AttemptsData::default());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["page1"]["squatAnalytics"].is_object());
        assert!(json["page1"]["repeatedBilateral"].is_object());
        assert!(json["page2"]["strengthTests"]["hipThrust"].is_object());
        assert!(json["page2"]["strengthTests"]["nordicHamstring"].is_object());
        assert!(json["patientInfo"]["dominantSide"].is_string());
    }

    #[test]
    fn cmj_jump_arrays_use_side_prefixed_names() {
        let data = CmjData {
            va_jumps: [31.0, 32.0, 33.0],
            ho_jumps: [30.0, 29.5, 31.0],
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["vaJumps"][0], 31.0);
        assert_eq!(json["hoJumps"][2], 31.0);
    }

    #[test]
    fn custom_entry_keeps_literal_field_names() {
        let entry = CustomEntry {
            val_l: Some(10.0),
            val_r: Some(12.0),
            val_both: Some(25.0),
            g1_l: Some(1.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["val_L"], 10.0);
        assert_eq!(json["val_R"], 12.0);
        assert_eq!(json["val_Both"], 25.0);
        assert_eq!(json["g1_L"], 1.0);
        assert!(json.get("g2_L").is_none());
    }

    #[test]
    fn repeats_flatten_next_to_typed_slots() {
        let mut record = AssessmentRecord::default();
        record.page1.cmj = Some(CmjData::default());
        record.page1.repeats.insert(
            "cmj_1".into(),
            serde_json::to_value(CmjData::default()).unwrap(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["page1"]["cmj"].is_object());
        assert!(json["page1"]["cmj_1"].is_object());

        let back: AssessmentRecord = serde_json::from_value(json).unwrap();
        assert!(back.page1.repeats.contains_key("cmj_1"));
        assert_eq!(back, record);
    }

    #[test]
    fn partially_shaped_records_deserialize_with_defaults() {
        let record: AssessmentRecord =
            serde_json::from_str(r#"{"page1": {"cmj": {"vaJumps": [1, 2, 3]}}}"#).unwrap();
        let cmj = record.page1.cmj.unwrap();
        assert_eq!(cmj.va_jumps, [1.0, 2.0, 3.0]);
        assert_eq!(cmj.ho_jumps, [0.0, 0.0, 0.0]);
        assert!(record.page2.custom.is_empty());
    }
}
