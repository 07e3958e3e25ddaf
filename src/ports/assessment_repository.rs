//! Assessment repository port.
//!
//! Write side receives per-answer entries and final records; the read side
//! serves the latest-diagnosis query.

use async_trait::async_trait;

use crate::domain::foundation::{AssessmentId, DomainError, PatientId, QuestionId};
use crate::domain::questionnaire::{AssessmentRecord, ResponseEntry};

/// Persistence port for answers and assessment records.
///
/// # Design
///
/// - **Append-only records**: `put_assessment` never overwrites an existing id
/// - **Patient-scoped**: every call is keyed by patient
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Stores (or replaces) the latest answer to one question.
    ///
    /// # Errors
    ///
    /// - `PersistenceWriteFailure` on storage failure
    async fn put_response(
        &self,
        patient_id: &PatientId,
        question_id: &QuestionId,
        entry: &ResponseEntry,
    ) -> Result<(), DomainError>;

    /// Stores a final assessment record.
    ///
    /// # Errors
    ///
    /// - `PersistenceWriteFailure` if the id already exists or storage fails
    async fn put_assessment(
        &self,
        patient_id: &PatientId,
        assessment_id: &AssessmentId,
        record: &AssessmentRecord,
    ) -> Result<(), DomainError>;

    /// All records of a patient, newest first.
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssessmentRecord>, DomainError>;

    /// Most recent record of a patient.
    async fn latest_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<AssessmentRecord>, DomainError> {
        Ok(self.find_by_patient(patient_id).await?.into_iter().next())
    }
}
