//! GetLatestDiagnosisHandler - Query handler for a patient's most recent diagnosis.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{AssessmentId, DomainError, PatientId, Timestamp};
use crate::domain::questionnaire::{symptom_profile, Condition, SymptomProfile};
use crate::ports::AssessmentRepository;

/// Query for the latest diagnosis of a patient.
#[derive(Debug, Clone)]
pub struct GetLatestDiagnosisQuery {
    /// Patient whose most recent record is read.
    pub patient_id: PatientId,
}

/// Diagnosed subtype of the most recent assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDiagnosis {
    /// Record the diagnosis was read from.
    pub assessment_id: AssessmentId,
    /// Condition chosen by the classification vote.
    pub condition: Condition,
    /// Highest scoring subtype of the condition's block.
    pub subtype: String,
    /// When the record was written.
    pub assessed_at: Timestamp,
    /// Typical presentation of the subtype, when one is known.
    pub symptoms: Option<SymptomProfile>,
}

/// Handler for the latest-diagnosis query.
pub struct GetLatestDiagnosisHandler {
    repository: Arc<dyn AssessmentRepository>,
}

impl GetLatestDiagnosisHandler {
    pub fn new(repository: Arc<dyn AssessmentRepository>) -> Self {
        Self { repository }
    }

    /// Returns `None` when the patient has no record or the latest one
    /// ended without a diagnosis.
    pub async fn handle(
        &self,
        query: GetLatestDiagnosisQuery,
    ) -> Result<Option<LatestDiagnosis>, DomainError> {
        let Some(record) = self.repository.latest_for_patient(&query.patient_id).await? else {
            return Ok(None);
        };
        if record.suicidal_thoughts() || record.no_condition_diagnosed() {
            return Ok(None);
        }

        let (Some(condition), Some(subtype)) =
            (record.detected_condition(), record.diagnosed_subtype())
        else {
            return Ok(None);
        };

        Ok(Some(LatestDiagnosis {
            assessment_id: record.assessment_id(),
            condition,
            subtype: subtype.to_string(),
            assessed_at: record.timestamp(),
            symptoms: symptom_profile(subtype),
        }))
    }
}
