//! The rendered form model: ordered sections with suffixed field ids.
//!
//! Replacing the whole `FormState` is the only mutation path for the
//! visible form; there is no incremental diffing. Field values are kept
//! as raw strings (what the practitioner typed); numeric parsing happens
//! on read and defaults to zero, mirroring the permissive input handling
//! the records have always had.

use tracing::warn;

use super::asymmetry::AsymmetryBadge;
use super::catalog::{Catalog, TestKind};
use super::schema::{self, instance_label, total_counts, FieldSpec, SectionWalk};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub spec: FieldSpec,
    /// Full id: base id plus the section's position suffix.
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSection {
    pub kind: TestKind,
    pub section_type: String,
    pub position: usize,
    /// 1-based occurrence of this type within the active list.
    pub occurrence: u32,
    pub title: String,
    pub fields: Vec<FieldState>,
    pub comment_id: Option<String>,
    pub comment: String,
    /// The asymmetry side channel; present only for kinds with a badge.
    pub badge: Option<AsymmetryBadge>,
}

impl FormSection {
    pub fn field_suffix(&self) -> String {
        format!("_{}", self.position)
    }

    fn full_id(&self, base: &str) -> String {
        format!("{base}{}", self.field_suffix())
    }

    pub fn field(&self, base: &str) -> Option<&FieldState> {
        let id = self.full_id(base);
        self.fields.iter().find(|field| field.id == id)
    }

    /// Numeric read; empty, missing, or unparseable input is `0`.
    pub fn num(&self, base: &str) -> f64 {
        self.field(base)
            .and_then(|field| field.value.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// Text read; missing fields default to the empty string.
    pub fn text(&self, base: &str) -> String {
        self.field(base)
            .map(|field| field.value.clone())
            .unwrap_or_default()
    }

    /// Writes a raw value; a miss is a soft no-op because the field set is
    /// dynamic and a field legitimately may not exist.
    pub fn set_value(&mut self, base: &str, value: impl Into<String>) {
        let id = self.full_id(base);
        if let Some(field) = self.fields.iter_mut().find(|field| field.id == id) {
            field.value = value.into();
        }
    }

    /// Numeric write; a literal zero becomes an empty field, since the
    /// form never displays a bare zero.
    pub fn set_num(&mut self, base: &str, value: f64) {
        self.set_value(base, number_to_field(value));
    }

    /// Badge value as the collector reads it: stored number or zero.
    pub fn badge_value(&self) -> f64 {
        self.badge.as_ref().map(|badge| badge.value).unwrap_or(0.0)
    }
}

/// Field display form for a numeric value: empty for zero, integer when
/// whole, unchanged otherwise.
pub fn number_to_field(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub sections: Vec<FormSection>,
}

impl FormState {
    /// Instantiates one section per active id, in order. Ids without a
    /// known template are logged and skipped, but they still consume a
    /// position index and an occurrence count, so the numbering of the
    /// remaining sections is unaffected.
    pub fn render_selection(active_ids: &[String], catalog: &Catalog) -> FormState {
        let totals = total_counts(active_ids);
        let mut walk = SectionWalk::new();
        let mut sections = Vec::new();

        for (position, section_type) in active_ids.iter().enumerate() {
            let slot = walk.next(section_type, position);

            let Some(kind) = catalog.resolve(section_type) else {
                warn!(%section_type, "no template for test id; section skipped");
                continue;
            };

            let suffix = slot.field_suffix();
            let label = instance_label(
                slot.occurrence,
                totals.get(section_type).copied().unwrap_or(1),
            );

            let fields = schema::fields_for(&kind)
                .into_iter()
                .map(|spec| FieldState {
                    id: format!("{}{suffix}", spec.base_id),
                    spec,
                    value: String::new(),
                })
                .collect();

            sections.push(FormSection {
                title: format!("{}{label}", kind.display_name()),
                section_type: section_type.clone(),
                position,
                occurrence: slot.occurrence,
                fields,
                comment_id: schema::comment_base(&kind).map(|base| format!("{base}{suffix}")),
                comment: String::new(),
                badge: schema::badge_base(&kind).map(|_| AsymmetryBadge::default()),
                kind,
            });
        }

        FormState { sections }
    }

    /// Pre-fills the catalog's default comments on empty comment fields.
    /// Used for fresh selections only; population overwrites comments
    /// from the record.
    pub fn apply_default_comments(&mut self) {
        for section in &mut self.sections {
            if section.comment.is_empty() {
                if let Some(default) = section.kind.default_comment() {
                    section.comment = default.to_string();
                }
            }
        }
    }

    /// Raw section types in order, as persisted in `activeTestIds`.
    pub fn active_test_ids(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|section| section.section_type.clone())
            .collect()
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut FormSection> {
        self.sections.get_mut(index)
    }

    /// Sets a field anywhere in the form by its full suffixed id.
    pub fn set_field(&mut self, full_id: &str, value: impl Into<String>) -> bool {
        for section in &mut self.sections {
            if let Some(field) = section.fields.iter_mut().find(|field| field.id == full_id) {
                field.value = value.into();
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new()
    }

    #[test]
    fn repeated_test_gets_non_colliding_ids_and_labels() {
        let ids = vec!["balance".to_string(), "balance".to_string()];
        let form = FormState::render_selection(&ids, &catalog());
        assert_eq!(form.sections.len(), 2);

        let first = &form.sections[0];
        let second = &form.sections[1];
        assert!(first.fields.iter().all(|f| f.id.ends_with("_0")));
        assert!(second.fields.iter().all(|f| f.id.ends_with("_1")));
        assert_eq!(first.title, "Balans (Enbens) #1");
        assert_eq!(second.title, "Balans (Enbens) #2");

        let all_ids: Vec<&str> = form
            .sections
            .iter()
            .flat_map(|s| s.fields.iter().map(|f| f.id.as_str()))
            .collect();
        let unique: std::collections::HashSet<&str> = all_ids.iter().copied().collect();
        assert_eq!(all_ids.len(), unique.len());
    }

    #[test]
    fn unique_test_has_empty_instance_label() {
        let ids = vec!["balance".to_string()];
        let form = FormState::render_selection(&ids, &catalog());
        assert_eq!(form.sections[0].title, "Balans (Enbens)");
    }

    #[test]
    fn unknown_id_is_skipped_but_keeps_numbering() {
        let ids = vec![
            "cmj".to_string(),
            "custom_missing".to_string(),
            "cmj".to_string(),
        ];
        let form = FormState::render_selection(&ids, &catalog());
        assert_eq!(form.sections.len(), 2);
        // Positions 0 and 2; the skipped entry still consumed position 1.
        assert_eq!(form.sections[0].field_suffix(), "_0");
        assert_eq!(form.sections[1].field_suffix(), "_2");
        assert_eq!(form.sections[1].occurrence, 2);
    }

    #[test]
    fn numeric_reads_default_to_zero() {
        let ids = vec!["sidehop".to_string()];
        let mut form = FormState::render_selection(&ids, &catalog());
        let section = &mut form.sections[0];
        assert_eq!(section.num("p1_g4_va_count"), 0.0);

        section.set_value("p1_g4_va_count", "not a number");
        assert_eq!(section.num("p1_g4_va_count"), 0.0);

        section.set_value("p1_g4_va_count", "17");
        assert_eq!(section.num("p1_g4_va_count"), 17.0);
    }

    #[test]
    fn zero_writes_an_empty_field() {
        let ids = vec!["sidehop".to_string()];
        let mut form = FormState::render_selection(&ids, &catalog());
        let section = &mut form.sections[0];
        section.set_num("p1_g4_va_count", 0.0);
        assert_eq!(section.field("p1_g4_va_count").unwrap().value, "");
        section.set_num("p1_g4_ho_count", 12.5);
        assert_eq!(section.field("p1_g4_ho_count").unwrap().value, "12.5");
    }

    #[test]
    fn missing_field_writes_are_soft() {
        let ids = vec!["sidehop".to_string()];
        let mut form = FormState::render_selection(&ids, &catalog());
        form.sections[0].set_value("does_not_exist", "1");
        assert!(!form.set_field("nope_0", "1"));
    }
}
