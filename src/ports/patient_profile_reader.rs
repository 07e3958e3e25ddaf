//! PatientProfileReader port for skip-logic profile lookups.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PatientId};
use crate::domain::questionnaire::PatientProfile;

/// Read-only access to patient profile data owned by another system.
#[async_trait]
pub trait PatientProfileReader: Send + Sync {
    /// Returns the patient's profile, or `None` when no profile exists.
    async fn get_patient_profile(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<PatientProfile>, DomainError>;
}
