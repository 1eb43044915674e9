//! The test catalog: every test kind the form can render, static and
//! custom, plus the id/key rename tables the round-trip depends on.

use serde::{Deserialize, Serialize};

/// Test categories as shown in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Styrka")]
    Strength,
    #[serde(rename = "Hopp")]
    Jumps,
    #[serde(rename = "Balans & Analys")]
    BalanceAnalysis,
    #[default]
    #[serde(rename = "Övrigt", other)]
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Strength => "Styrka",
            Category::Jumps => "Hopp",
            Category::BalanceAnalysis => "Balans & Analys",
            Category::Other => "Övrigt",
        }
    }
}

/// Chart template selector. The wire names (and their historical aliases)
/// come from persisted custom-test documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphKind {
    #[serde(rename = "paired-bar")]
    PairedBar,
    #[serde(rename = "single-bar")]
    SingleBar,
    #[serde(rename = "three-bar")]
    ThreeBar,
    #[serde(rename = "dual-axis", alias = "dual-metric-paired")]
    DualAxis,
    #[serde(rename = "bilateral")]
    Bilateral,
    #[serde(rename = "donut")]
    Donut,
    #[serde(rename = "single-bars-3", alias = "bar-gauge")]
    SingleBars3,
    #[serde(rename = "grouped-bar", alias = "grouped-bar-2", alias = "grouped-bar-3")]
    GroupedBar,
    #[serde(rename = "manual")]
    ManualEntry,
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl GraphKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            GraphKind::PairedBar => "paired-bar",
            GraphKind::SingleBar => "single-bar",
            GraphKind::ThreeBar => "three-bar",
            GraphKind::DualAxis => "dual-axis",
            GraphKind::Bilateral => "bilateral",
            GraphKind::Donut => "donut",
            GraphKind::SingleBars3 => "single-bars-3",
            GraphKind::GroupedBar => "grouped-bar",
            GraphKind::ManualEntry => "manual",
            GraphKind::Unknown => "unknown",
        }
    }

    /// Kinds that render an asymmetry badge next to the inputs.
    pub fn has_badge(self) -> bool {
        matches!(
            self,
            GraphKind::PairedBar
                | GraphKind::SingleBar
                | GraphKind::ThreeBar
                | GraphKind::DualAxis
                | GraphKind::GroupedBar
        )
    }
}

/// Axis titles, metric labels, and display hints carried by a definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y1_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metric_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y1_decimals: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_decimals: Option<u8>,
}

impl GraphConfig {
    /// Input labels with the historical fallback chain: explicit input
    /// labels, then metric names, then "Värde N".
    pub fn input_label(&self, index: usize) -> String {
        let from = |list: &Vec<String>| {
            list.get(index)
                .filter(|label| !label.is_empty())
                .cloned()
        };
        from(&self.input_labels)
            .or_else(|| from(&self.metric_names))
            .unwrap_or_else(|| format!("Värde {}", index + 1))
    }
}

/// A user-authored test definition, persisted per user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestDefinition {
    pub name: String,
    pub graph_type: GraphKind,
    pub config: GraphConfig,
}

/// A custom definition together with its store-assigned id. The id is what
/// the `custom_` section-type prefix wraps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomTest {
    pub id: String,
    pub def: TestDefinition,
}

impl CustomTest {
    pub fn section_type(&self) -> String {
        format!("custom_{}", self.id)
    }
}

/// Where a test's data lives inside an assessment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPage {
    One,
    StrengthTests,
    Manual,
    Custom,
}

/// Closed set of section kinds. Every place that used to branch on a raw
/// type string goes through this one table instead.
#[derive(Debug, Clone, PartialEq)]
pub enum TestKind {
    Balance,
    Cmj,
    Tia,
    SideHop,
    SquatAnalytics,
    RepeatedBilateral,
    Cmj2Ben,
    HipThrust,
    Quadriceps,
    StaticSquatHand,
    StaticSquatHip,
    Hamstring,
    NordicHamstring,
    Manual,
    Custom(CustomTest),
}

/// Static kinds in picker order.
pub const STATIC_KINDS: [TestKind; 14] = [
    TestKind::HipThrust,
    TestKind::Quadriceps,
    TestKind::StaticSquatHand,
    TestKind::StaticSquatHip,
    TestKind::Hamstring,
    TestKind::NordicHamstring,
    TestKind::Cmj,
    TestKind::Cmj2Ben,
    TestKind::Tia,
    TestKind::SideHop,
    TestKind::RepeatedBilateral,
    TestKind::Balance,
    TestKind::SquatAnalytics,
    TestKind::Manual,
];

impl TestKind {
    /// The raw section type string (`data-test-type` in the old world).
    pub fn section_type(&self) -> String {
        match self {
            TestKind::Balance => "balance".into(),
            TestKind::Cmj => "cmj".into(),
            TestKind::Tia => "tia".into(),
            TestKind::SideHop => "sidehop".into(),
            TestKind::SquatAnalytics => "squat".into(),
            TestKind::RepeatedBilateral => "repeated_bilateral".into(),
            TestKind::Cmj2Ben => "cmj2ben".into(),
            TestKind::HipThrust => "hipthrust".into(),
            TestKind::Quadriceps => "quads".into(),
            TestKind::StaticSquatHand => "staticsquat-handdrag".into(),
            TestKind::StaticSquatHip => "staticsquat-hoftrem".into(),
            TestKind::Hamstring => "hamstring".into(),
            TestKind::NordicHamstring => "nordic-hamstring".into(),
            TestKind::Manual => "manual".into(),
            TestKind::Custom(custom) => custom.section_type(),
        }
    }

    pub fn from_section_type(section_type: &str) -> Option<TestKind> {
        Some(match section_type {
            "balance" => TestKind::Balance,
            "cmj" => TestKind::Cmj,
            "tia" => TestKind::Tia,
            "sidehop" => TestKind::SideHop,
            "squat" => TestKind::SquatAnalytics,
            "repeated_bilateral" => TestKind::RepeatedBilateral,
            "cmj2ben" => TestKind::Cmj2Ben,
            "hipthrust" => TestKind::HipThrust,
            "quads" => TestKind::Quadriceps,
            "staticsquat-handdrag" => TestKind::StaticSquatHand,
            "staticsquat-hoftrem" => TestKind::StaticSquatHip,
            "hamstring" => TestKind::Hamstring,
            "nordic-hamstring" => TestKind::NordicHamstring,
            "manual" => TestKind::Manual,
            _ => return None,
        })
    }

    /// Canonical data key for the record (the id→key rename table).
    pub fn data_key(&self) -> String {
        match self {
            TestKind::Balance => "balance".into(),
            TestKind::Cmj => "cmj".into(),
            TestKind::Tia => "tia".into(),
            TestKind::SideHop => "sidehop".into(),
            TestKind::SquatAnalytics => "squatAnalytics".into(),
            TestKind::RepeatedBilateral => "repeatedBilateral".into(),
            TestKind::Cmj2Ben => "cmj2ben".into(),
            TestKind::HipThrust => "hipThrust".into(),
            TestKind::Quadriceps => "quadriceps".into(),
            TestKind::StaticSquatHand => "staticsquatHanddrag".into(),
            TestKind::StaticSquatHip => "staticsquatHoftrem".into(),
            TestKind::Hamstring => "hamstring".into(),
            TestKind::NordicHamstring => "nordicHamstring".into(),
            TestKind::Manual => "manual".into(),
            TestKind::Custom(custom) => custom.id.clone(),
        }
    }

    /// Reverse of the rename table, for reconstructing an active list from
    /// legacy records without `activeTestIds`.
    pub fn section_type_for_data_key(base_key: &str) -> String {
        match base_key {
            "repeatedBilateral" => "repeated_bilateral".into(),
            "squatAnalytics" => "squat".into(),
            "hipThrust" => "hipthrust".into(),
            "quadriceps" => "quads".into(),
            "staticsquatHanddrag" => "staticsquat-handdrag".into(),
            "staticsquatHoftrem" => "staticsquat-hoftrem".into(),
            "nordicHamstring" => "nordic-hamstring".into(),
            other => other.into(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            TestKind::Balance => "Balans (Enbens)".into(),
            TestKind::Cmj => "Max Hopp CMJ (Enbens)".into(),
            TestKind::Tia => "Repeterade Hopp (TIA)".into(),
            TestKind::SideHop => "Sidhopp".into(),
            TestKind::SquatAnalytics => "Squat Analytics".into(),
            TestKind::RepeatedBilateral => "Repeated Bilateral Jump".into(),
            TestKind::Cmj2Ben => "Max Hopp CMJ (Tvåbens)".into(),
            TestKind::HipThrust => "Hip Thrusters".into(),
            TestKind::Quadriceps => "Quadriceps Isometrisk".into(),
            TestKind::StaticSquatHand => "Static Squat (Handdrag)".into(),
            TestKind::StaticSquatHip => "Static Squat (Höftrem)".into(),
            TestKind::Hamstring => "Hamstring Isometrisk".into(),
            TestKind::NordicHamstring => "Nordic Hamstrings".into(),
            TestKind::Manual => "Manuella Mätningar".into(),
            TestKind::Custom(custom) => custom.def.name.clone(),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            TestKind::HipThrust
            | TestKind::Quadriceps
            | TestKind::StaticSquatHand
            | TestKind::StaticSquatHip
            | TestKind::Hamstring
            | TestKind::NordicHamstring => Category::Strength,
            TestKind::Cmj
            | TestKind::Cmj2Ben
            | TestKind::Tia
            | TestKind::SideHop
            | TestKind::RepeatedBilateral => Category::Jumps,
            TestKind::Balance | TestKind::SquatAnalytics => Category::BalanceAnalysis,
            TestKind::Manual | TestKind::Custom(_) => Category::Other,
        }
    }

    pub fn graph_kind(&self) -> GraphKind {
        match self {
            TestKind::Balance | TestKind::Tia => GraphKind::DualAxis,
            TestKind::Cmj => GraphKind::GroupedBar,
            TestKind::SideHop => GraphKind::SingleBar,
            TestKind::SquatAnalytics | TestKind::Cmj2Ben | TestKind::NordicHamstring => {
                GraphKind::Donut
            }
            TestKind::RepeatedBilateral => GraphKind::Bilateral,
            TestKind::HipThrust
            | TestKind::Quadriceps
            | TestKind::StaticSquatHand
            | TestKind::StaticSquatHip
            | TestKind::Hamstring => GraphKind::PairedBar,
            TestKind::Manual => GraphKind::ManualEntry,
            TestKind::Custom(custom) => custom.def.graph_type,
        }
    }

    pub fn page(&self) -> RecordPage {
        match self {
            TestKind::Balance
            | TestKind::Cmj
            | TestKind::Tia
            | TestKind::SideHop
            | TestKind::SquatAnalytics
            | TestKind::RepeatedBilateral
            | TestKind::Cmj2Ben => RecordPage::One,
            TestKind::HipThrust
            | TestKind::Quadriceps
            | TestKind::StaticSquatHand
            | TestKind::StaticSquatHip
            | TestKind::Hamstring
            | TestKind::NordicHamstring => RecordPage::StrengthTests,
            TestKind::Manual => RecordPage::Manual,
            TestKind::Custom(_) => RecordPage::Custom,
        }
    }

    pub fn default_comment(&self) -> Option<&'static str> {
        const STRENGTH: &str = "Visar kraftutveckling för vänster (VÄ) och höger (HÖ) sida.";
        match self {
            TestKind::Balance => Some("Visar balanspoäng och genomsnittlig avvikelse i cm."),
            TestKind::Cmj => Some("Visar hopphöjd i centimeter (cm) för tre separata hopp."),
            TestKind::Tia => {
                Some("Visar genomsnittlig hopphöjd (cm) och markkontakttid (sekunder).")
            }
            TestKind::SideHop => Some("Visar antal sidhopp utförda inom tidsramen."),
            TestKind::SquatAnalytics => Some("Visar poäng för tre separata knäböjsförsök."),
            TestKind::RepeatedBilateral => {
                Some("Visar genomsnittlig hopphöjd och markkontakttid för hopp på två ben.")
            }
            TestKind::Cmj2Ben => Some("Visar poäng för tre separata CMJ-hopp på två ben."),
            TestKind::HipThrust
            | TestKind::Quadriceps
            | TestKind::StaticSquatHand
            | TestKind::StaticSquatHip
            | TestKind::Hamstring => Some(STRENGTH),
            TestKind::NordicHamstring => {
                Some("Visar poäng för tre separata Nordic Hamstring-försök.")
            }
            TestKind::Manual | TestKind::Custom(_) => None,
        }
    }
}

/// Entry for the test picker: static and custom tests, uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct TestListing {
    pub section_type: String,
    pub name: String,
    pub category: Category,
    pub custom: bool,
}

/// Static tests plus whatever custom definitions the current user has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    custom: Vec<CustomTest>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom(custom: Vec<CustomTest>) -> Self {
        Self { custom }
    }

    pub fn custom_tests(&self) -> &[CustomTest] {
        &self.custom
    }

    pub fn custom_by_id(&self, id: &str) -> Option<&CustomTest> {
        self.custom.iter().find(|test| test.id == id)
    }

    /// Resolves a raw section type. Static ids resolve directly; anything
    /// else is treated as a custom id, with or without the `custom_` prefix.
    pub fn resolve(&self, section_type: &str) -> Option<TestKind> {
        if let Some(kind) = TestKind::from_section_type(section_type) {
            return Some(kind);
        }
        let raw = section_type
            .strip_prefix("custom_")
            .unwrap_or(section_type);
        self.custom_by_id(raw)
            .cloned()
            .map(TestKind::Custom)
    }

    pub fn listings(&self) -> Vec<TestListing> {
        let mut listings: Vec<TestListing> = STATIC_KINDS
            .iter()
            .map(|kind| TestListing {
                section_type: kind.section_type(),
                name: kind.display_name(),
                category: kind.category(),
                custom: false,
            })
            .collect();
        listings.extend(self.custom.iter().map(|test| TestListing {
            section_type: test.section_type(),
            name: test.def.name.clone(),
            category: Category::Other,
            custom: true,
        }));
        listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_types_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in STATIC_KINDS.iter() {
            assert!(seen.insert(kind.section_type()), "{:?}", kind);
        }
    }

    #[test]
    fn section_type_round_trips_for_static_kinds() {
        for kind in STATIC_KINDS.iter() {
            let resolved = TestKind::from_section_type(&kind.section_type()).unwrap();
            assert_eq!(&resolved, kind);
        }
    }

    #[test]
    fn rename_table_inverts() {
        for kind in STATIC_KINDS.iter() {
            let back = TestKind::section_type_for_data_key(&kind.data_key());
            assert_eq!(back, kind.section_type());
        }
    }

    #[test]
    fn graph_kind_aliases_parse() {
        let kind: GraphKind = serde_json::from_str("\"bar-gauge\"").unwrap();
        assert_eq!(kind, GraphKind::SingleBars3);
        let kind: GraphKind = serde_json::from_str("\"grouped-bar-3\"").unwrap();
        assert_eq!(kind, GraphKind::GroupedBar);
        let kind: GraphKind = serde_json::from_str("\"dual-metric-paired\"").unwrap();
        assert_eq!(kind, GraphKind::DualAxis);
        let kind: GraphKind = serde_json::from_str("\"something-else\"").unwrap();
        assert_eq!(kind, GraphKind::Unknown);
    }

    #[test]
    fn catalog_resolves_custom_with_and_without_prefix() {
        let catalog = Catalog::with_custom(vec![CustomTest {
            id: "abc123".into(),
            def: TestDefinition {
                name: "Grip".into(),
                graph_type: GraphKind::SingleBar,
                ..Default::default()
            },
        }]);

        for id in ["custom_abc123", "abc123"] {
            match catalog.resolve(id) {
                Some(TestKind::Custom(custom)) => assert_eq!(custom.id, "abc123"),
                other => panic!("unexpected resolution: {other:?}"),
            }
        }
        assert!(catalog.resolve("custom_missing").is_none());
    }
}
