//! In-Memory Assessment Repository
//!
//! Keeps answers and assessment records in memory.
//! Useful for testing, development and the replay runner.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, PatientId, QuestionId};
use crate::domain::questionnaire::{AssessmentRecord, ResponseEntry};
use crate::ports::AssessmentRepository;

/// In-memory storage for answers and records
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssessmentRepository {
    responses: Arc<RwLock<HashMap<(PatientId, QuestionId), ResponseEntry>>>,
    records: Arc<RwLock<HashMap<PatientId, Vec<AssessmentRecord>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryAssessmentRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (for exercising failure paths)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored answer for a patient's question
    pub async fn response(
        &self,
        patient_id: &PatientId,
        question_id: &QuestionId,
    ) -> Option<ResponseEntry> {
        self.responses
            .read()
            .await
            .get(&(patient_id.clone(), question_id.clone()))
            .cloned()
    }

    /// Number of stored answers across all patients
    pub async fn response_count(&self) -> usize {
        self.responses.read().await.len()
    }

    /// Number of stored records across all patients
    pub async fn record_count(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::PersistenceWriteFailure,
                "in-memory repository is rejecting writes",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn put_response(
        &self,
        patient_id: &PatientId,
        question_id: &QuestionId,
        entry: &ResponseEntry,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut responses = self.responses.write().await;
        responses.insert((patient_id.clone(), question_id.clone()), entry.clone());
        Ok(())
    }

    async fn put_assessment(
        &self,
        patient_id: &PatientId,
        assessment_id: &AssessmentId,
        record: &AssessmentRecord,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        let history = records.entry(patient_id.clone()).or_default();
        if history.iter().any(|r| r.assessment_id() == *assessment_id) {
            return Err(DomainError::new(
                ErrorCode::PersistenceWriteFailure,
                format!("assessment {} already stored", assessment_id),
            )
            .with_detail("assessment_id", assessment_id.to_string()));
        }
        history.push(record.clone());
        Ok(())
    }

    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        let records = self.records.read().await;
        let mut history = records.get(patient_id).cloned().unwrap_or_default();
        // Newest first; among equal timestamps the last stored comes first.
        history.sort_by_key(|r| r.timestamp());
        history.reverse();
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::questionnaire::test_support::{diagnosis, patient, record_with};
    use crate::domain::questionnaire::{AssessmentOutcome, Condition, ResponseValue};

    fn entry(value: &str) -> ResponseEntry {
        ResponseEntry {
            question_text: "Have you had any thought that it was better if you were dead?"
                .to_string(),
            value: ResponseValue::single(value),
            recorded_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn put_response_replaces_previous_answer() {
        let repo = InMemoryAssessmentRepository::new();
        let p = patient("ana@example.com");
        let q = QuestionId::new("question3").unwrap();

        repo.put_response(&p, &q, &entry("no_suicidalthoughts")).await.unwrap();
        repo.put_response(&p, &q, &entry("yes_suicidalthoughts")).await.unwrap();

        assert_eq!(repo.response_count().await, 1);
        let stored = repo.response(&p, &q).await.unwrap();
        assert_eq!(stored.value, ResponseValue::single("yes_suicidalthoughts"));
    }

    #[tokio::test]
    async fn put_assessment_rejects_duplicate_ids() {
        let repo = InMemoryAssessmentRepository::new();
        let p = patient("ana@example.com");
        let record = record_with(&p, AssessmentOutcome::NoConditionDiagnosed);

        repo.put_assessment(&p, &record.assessment_id(), &record).await.unwrap();
        let err = repo
            .put_assessment(&p, &record.assessment_id(), &record)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceWriteFailure);
        assert_eq!(repo.record_count().await, 1);
    }

    #[tokio::test]
    async fn latest_for_patient_returns_newest_record() {
        let repo = InMemoryAssessmentRepository::new();
        let p = patient("ana@example.com");
        let first = record_with(&p, AssessmentOutcome::NoConditionDiagnosed);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = record_with(&p, diagnosis(Condition::Anxiety, "Panic Disorder"));

        repo.put_assessment(&p, &first.assessment_id(), &first).await.unwrap();
        repo.put_assessment(&p, &second.assessment_id(), &second).await.unwrap();

        let latest = repo.latest_for_patient(&p).await.unwrap().unwrap();
        assert_eq!(latest.assessment_id(), second.assessment_id());
        assert_eq!(repo.find_by_patient(&p).await.unwrap().len(), 2);
        assert!(repo
            .latest_for_patient(&patient("other@example.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn patients_are_isolated() {
        let repo = InMemoryAssessmentRepository::new();
        let plus = patient("a+b@example.com");
        let underscore = patient("a_b@example.com");
        let q = QuestionId::new("question3").unwrap();
        let record = record_with(&plus, diagnosis(Condition::Trauma, "Complex Trauma"));

        repo.put_response(&plus, &q, &entry("no_suicidalthoughts")).await.unwrap();
        repo.put_assessment(&plus, &record.assessment_id(), &record).await.unwrap();

        assert!(repo.response(&underscore, &q).await.is_none());
        assert!(repo.latest_for_patient(&underscore).await.unwrap().is_none());
        assert_eq!(
            repo.latest_for_patient(&plus).await.unwrap().unwrap().patient_id(),
            &plus
        );
    }

    #[tokio::test]
    async fn failing_writes_surface_persistence_errors() {
        let repo = InMemoryAssessmentRepository::new();
        repo.fail_writes(true);
        let err = repo
            .put_response(
                &patient("ana@example.com"),
                &QuestionId::new("question1").unwrap(),
                &entry("none"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceWriteFailure);
    }
}
