//! Reference side selection used by the asymmetry math.

use serde::{Deserialize, Serialize};

/// Which side the comparison is anchored on. Persisted with the Swedish
/// labels the records have always carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferenceSide {
    #[serde(rename = "Vänster")]
    Left,
    #[serde(rename = "Höger")]
    #[default]
    Right,
    #[serde(rename = "Ingen", other)]
    None,
}

impl ReferenceSide {
    pub fn label(self) -> &'static str {
        match self {
            ReferenceSide::Left => "Vänster",
            ReferenceSide::Right => "Höger",
            ReferenceSide::None => "Ingen",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Vänster" => ReferenceSide::Left,
            "Höger" => ReferenceSide::Right,
            _ => ReferenceSide::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == ReferenceSide::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_labels_round_trip() {
        for side in [ReferenceSide::Left, ReferenceSide::Right, ReferenceSide::None] {
            let json = serde_json::to_string(&side).unwrap();
            let back: ReferenceSide = serde_json::from_str(&json).unwrap();
            assert_eq!(side, back);
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_none() {
        let side: ReferenceSide = serde_json::from_str("\"Both\"").unwrap();
        assert_eq!(side, ReferenceSide::None);
    }
}
