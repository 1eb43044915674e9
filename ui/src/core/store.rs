//! Typed document collections over the storage backend.
//!
//! Per-user collections: `patients`, nested `screenings` per patient,
//! `protocols`, and `custom_tests`. The store
//! assigns ids and timestamps on write and lists newest first; callers
//! treat it as "save record, get id back / list records".

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use super::catalog::{CustomTest, TestDefinition};
use super::record::AssessmentRecord;
use super::storage::{self, StorageError};

pub const DRAFT_KEY: &str = "fysioscreen/draft";
pub const REPORT_HANDOFF_KEY: &str = "fysioscreen/report";

/// A stored document with its store-assigned id and timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stamped<T> {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub doc: T,
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// One JSON-array-backed collection of documents.
pub struct Collection<T> {
    key: String,
    _marker: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Default,
{
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _marker: PhantomData,
        }
    }

    fn load(&self) -> Result<Vec<Stamped<T>>, StorageError> {
        match storage::read_key(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    fn save(&self, docs: &[Stamped<T>]) -> Result<(), StorageError> {
        storage::write_key(&self.key, &serde_json::to_string(docs)?)
    }

    /// All documents, newest first.
    pub fn list(&self) -> Result<Vec<Stamped<T>>, StorageError> {
        let mut docs = self.load()?;
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs)
    }

    pub fn get(&self, id: &str) -> Result<Option<Stamped<T>>, StorageError> {
        Ok(self.load()?.into_iter().find(|doc| doc.id == id))
    }

    /// Adds a document; the store assigns id and timestamps.
    pub fn insert(&self, doc: T) -> Result<Stamped<T>, StorageError> {
        let now = now_rfc3339();
        let stamped = Stamped {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now.clone(),
            updated_at: now,
            doc,
        };
        let mut docs = self.load()?;
        docs.push(stamped.clone());
        self.save(&docs)?;
        info!(key = %self.key, id = %stamped.id, "document inserted");
        Ok(stamped)
    }

    /// Replaces the document with the given id, refreshing `updatedAt`;
    /// inserts under that id if absent.
    pub fn upsert(&self, id: &str, doc: T) -> Result<Stamped<T>, StorageError> {
        let mut docs = self.load()?;
        let now = now_rfc3339();
        if let Some(existing) = docs.iter_mut().find(|existing| existing.id == id) {
            existing.doc = doc;
            existing.updated_at = now;
            let updated = existing.clone();
            self.save(&docs)?;
            return Ok(updated);
        }

        let stamped = Stamped {
            id: id.to_string(),
            created_at: now.clone(),
            updated_at: now,
            doc,
        };
        docs.push(stamped.clone());
        self.save(&docs)?;
        Ok(stamped)
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut docs = self.load()?;
        docs.retain(|doc| doc.id != id);
        self.save(&docs)
    }
}

/// A patient card as persisted per user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub first_name: String,
    pub last_name: String,
    pub internal_id: String,
    pub dob: String,
    pub age: u32,
    pub gender: String,
    pub sport: String,
    pub injury: String,
    pub injured_side: String,
    pub bodyweight: f64,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A saved assessment, linked to its patient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Screening {
    #[serde(flatten)]
    pub record: AssessmentRecord,
    pub patient_id: String,
    pub patient_name: String,
    pub test_date: String,
}

/// A named, ordered list of test ids.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Protocol {
    pub name: String,
    pub test_ids: Vec<String>,
}

pub fn patients(user_id: &str) -> Collection<Patient> {
    Collection::new(format!("users/{user_id}/patients"))
}

pub fn screenings(user_id: &str, patient_id: &str) -> Collection<Screening> {
    Collection::new(format!("users/{user_id}/patients/{patient_id}/screenings"))
}

pub fn protocols(user_id: &str) -> Collection<Protocol> {
    Collection::new(format!("users/{user_id}/protocols"))
}

pub fn custom_tests(user_id: &str) -> Collection<TestDefinition> {
    Collection::new(format!("users/{user_id}/custom_tests"))
}

/// Loads the user's custom tests in catalog form.
pub fn load_custom_tests(user_id: &str) -> Result<Vec<CustomTest>, StorageError> {
    Ok(custom_tests(user_id)
        .list()?
        .into_iter()
        .map(|stamped| CustomTest {
            id: stamped.id,
            def: stamped.doc,
        })
        .collect())
}

/// In-progress session state, written on every debounced input and read
/// back once on startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Stamped<Patient>>,
    pub data: AssessmentRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_protocol_id: Option<String>,
}

pub fn save_draft(draft: &DraftState) -> Result<(), StorageError> {
    storage::write_key(DRAFT_KEY, &serde_json::to_string(draft)?)
}

pub fn load_draft() -> Result<Option<DraftState>, StorageError> {
    match storage::read_key(DRAFT_KEY)? {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
    }
}

pub fn clear_draft() -> Result<(), StorageError> {
    storage::remove_key(DRAFT_KEY)
}

/// One-shot handoff to the printable report view.
pub fn save_report_handoff(record: &AssessmentRecord) -> Result<(), StorageError> {
    storage::write_key(REPORT_HANDOFF_KEY, &serde_json::to_string(record)?)
}

pub fn load_report_handoff() -> Result<Option<AssessmentRecord>, StorageError> {
    match storage::read_key(REPORT_HANDOFF_KEY)? {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::isolated_test_root;

    fn user() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    #[test]
    fn insert_assigns_ids_and_timestamps() {
        isolated_test_root();
        let store = protocols(&user());
        let saved = store
            .insert(Protocol {
                name: "Knäprotokoll".into(),
                test_ids: vec!["cmj".into(), "hamstring".into()],
            })
            .unwrap();
        assert!(!saved.id.is_empty());
        assert!(!saved.created_at.is_empty());
        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[test]
    fn lists_return_newest_first() {
        isolated_test_root();
        let store = protocols(&user());
        store.insert(Protocol::default()).unwrap();
        store.insert(Protocol::default()).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].updated_at >= listed[1].updated_at);
    }

    #[test]
    fn upsert_keeps_created_at() {
        isolated_test_root();
        let store = patients(&user());
        let saved = store
            .insert(Patient {
                first_name: "Alva".into(),
                ..Default::default()
            })
            .unwrap();
        let updated = store
            .upsert(
                &saved.id,
                Patient {
                    first_name: "Alva".into(),
                    sport: "Handboll".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.created_at, saved.created_at);
        assert_eq!(updated.doc.sport, "Handboll");
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_only_the_target() {
        isolated_test_root();
        let uid = user();
        let store = screenings(&uid, "p1");
        let keep = store.insert(Screening::default()).unwrap();
        let gone = store.insert(Screening::default()).unwrap();
        store.delete(&gone.id).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }

    #[test]
    fn draft_round_trips() {
        isolated_test_root();
        let draft = DraftState {
            patient: None,
            data: AssessmentRecord::default(),
            selected_protocol_id: Some("proto-1".into()),
        };
        save_draft(&draft).unwrap();
        assert_eq!(load_draft().unwrap().unwrap(), draft);
        clear_draft().unwrap();
        assert!(load_draft().unwrap().is_none());
    }

    #[test]
    fn custom_tests_surface_as_catalog_entries() {
        isolated_test_root();
        let uid = user();
        let saved = custom_tests(&uid)
            .insert(TestDefinition {
                name: "Greppstyrka".into(),
                ..Default::default()
            })
            .unwrap();
        let loaded = load_custom_tests(&uid).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, saved.id);
        assert_eq!(loaded[0].def.name, "Greppstyrka");
    }
}
