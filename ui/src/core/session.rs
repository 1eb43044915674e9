//! The explicit session context: signed-in user, selected patient, and
//! the current screening. Created on patient select, cleared on switch;
//! there is no module-global state.

use super::auth::CurrentUser;
use super::format;
use super::record::PatientInfo;
use super::side::ReferenceSide;
use super::storage::StorageError;
use super::store::{Patient, Stamped};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionContext {
    pub user: Option<CurrentUser>,
    pub patient: Option<Stamped<Patient>>,
    /// Set while an existing screening is open; `None` means the next save
    /// creates a new document.
    pub screening_id: Option<String>,
    pub protocol_id: Option<String>,
}

impl SessionContext {
    pub fn signed_in(user: CurrentUser) -> Self {
        Self {
            user: Some(user),
            ..Default::default()
        }
    }

    /// Every store operation goes through this gate: no current user means
    /// the operation is refused.
    pub fn require_user(&self) -> Result<&CurrentUser, StorageError> {
        self.user.as_ref().ok_or(StorageError::AuthRequired)
    }

    /// Selecting a patient starts a fresh screening context.
    pub fn select_patient(&mut self, patient: Stamped<Patient>) {
        self.patient = Some(patient);
        self.screening_id = None;
    }

    pub fn clear_patient(&mut self) {
        self.patient = None;
        self.screening_id = None;
        self.protocol_id = None;
    }

    /// Reference side for the asymmetry math: the selected patient's
    /// injured side.
    pub fn reference_side(&self) -> ReferenceSide {
        self.patient
            .as_ref()
            .map(|patient| ReferenceSide::from_label(&patient.doc.injured_side))
            .unwrap_or(ReferenceSide::None)
    }

    /// Patient header for a freshly collected record.
    pub fn patient_info(&self) -> PatientInfo {
        match &self.patient {
            None => PatientInfo::default(),
            Some(patient) => PatientInfo {
                name: patient.doc.full_name(),
                internal_id: patient.doc.internal_id.clone(),
                date: format::today(),
                sport_position: patient.doc.sport.clone(),
                created_by: String::new(),
                dominant_side_type: "Skadad sida".into(),
                dominant_side: self.reference_side(),
                injured_side: patient.doc.injured_side.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(injured_side: &str) -> Stamped<Patient> {
        Stamped {
            id: "p1".into(),
            doc: Patient {
                first_name: "Alva".into(),
                last_name: "Berg".into(),
                internal_id: "A-17".into(),
                sport: "Fotboll".into(),
                injured_side: injured_side.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn operations_require_a_user() {
        let session = SessionContext::default();
        assert!(matches!(
            session.require_user(),
            Err(StorageError::AuthRequired)
        ));
    }

    #[test]
    fn selecting_a_patient_resets_the_screening() {
        let mut session = SessionContext::signed_in(CurrentUser {
            id: "u1".into(),
            email: "a@b.se".into(),
        });
        session.screening_id = Some("old".into());
        session.select_patient(patient("Vänster"));

        assert!(session.screening_id.is_none());
        assert_eq!(session.reference_side(), ReferenceSide::Left);

        let info = session.patient_info();
        assert_eq!(info.name, "Alva Berg");
        assert_eq!(info.internal_id, "A-17");
        assert_eq!(info.dominant_side, ReferenceSide::Left);
    }

    #[test]
    fn clearing_the_patient_clears_dependent_state() {
        let mut session = SessionContext::default();
        session.select_patient(patient("Ingen"));
        session.protocol_id = Some("proto".into());
        session.clear_patient();
        assert!(session.patient.is_none());
        assert!(session.protocol_id.is_none());
        assert_eq!(session.reference_side(), ReferenceSide::None);
    }
}
