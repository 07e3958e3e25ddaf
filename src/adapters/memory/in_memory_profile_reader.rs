//! In-Memory Patient Profile Reader

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PatientId};
use crate::domain::questionnaire::PatientProfile;
use crate::ports::PatientProfileReader;

/// Profile lookups served from a map, seeded by tests or the replay runner
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileReader {
    profiles: Arc<RwLock<HashMap<PatientId, PatientProfile>>>,
}

impl InMemoryProfileReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a patient's profile
    pub async fn insert(&self, patient_id: PatientId, profile: PatientProfile) {
        self.profiles.write().await.insert(patient_id, profile);
    }
}

#[async_trait]
impl PatientProfileReader for InMemoryProfileReader {
    async fn get_patient_profile(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<PatientProfile>, DomainError> {
        Ok(self.profiles.read().await.get(patient_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::{BirthHistory, Gender};

    #[tokio::test]
    async fn returns_inserted_profile_or_none() {
        let reader = InMemoryProfileReader::new();
        let p = PatientId::new("mia@example.com").unwrap();
        assert!(reader.get_patient_profile(&p).await.unwrap().is_none());

        reader
            .insert(p.clone(), PatientProfile::new(Some(Gender::Female), Some(BirthHistory::Yes)))
            .await;
        let profile = reader.get_patient_profile(&p).await.unwrap().unwrap();
        assert_eq!(profile.birth_history, Some(BirthHistory::Yes));
    }
}
