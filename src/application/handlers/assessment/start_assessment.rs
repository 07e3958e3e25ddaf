//! StartAssessmentHandler - Command handler for opening a questionnaire session.
//!
//! Loads the catalog from the question source, validates it against the
//! layout and reads the patient profile used by skip rules.

use std::sync::Arc;

use tracing::{info, warn};

use super::active_assessment::ActiveAssessment;
use crate::domain::foundation::{DomainError, PatientId};
use crate::domain::questionnaire::{
    NavigationEngine, QuestionCatalog, QuestionnaireError, QuestionnaireLayout,
};
use crate::ports::{PatientProfileReader, QuestionSource};

/// Command to start an assessment for a patient.
#[derive(Debug, Clone)]
pub struct StartAssessmentCommand {
    /// Patient taking the assessment; also the key for the profile lookup.
    pub patient_id: PatientId,
}

/// Error type for starting an assessment.
#[derive(Debug, Clone)]
pub enum StartAssessmentError {
    /// The question source could not be read.
    CatalogUnavailable(DomainError),
    /// The catalog or layout is unusable.
    Questionnaire(QuestionnaireError),
}

impl std::fmt::Display for StartAssessmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartAssessmentError::CatalogUnavailable(err) => {
                write!(f, "Catalog unavailable: {}", err)
            }
            StartAssessmentError::Questionnaire(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StartAssessmentError {}

impl From<DomainError> for StartAssessmentError {
    fn from(err: DomainError) -> Self {
        StartAssessmentError::CatalogUnavailable(err)
    }
}

impl From<QuestionnaireError> for StartAssessmentError {
    fn from(err: QuestionnaireError) -> Self {
        StartAssessmentError::Questionnaire(err)
    }
}

/// Handler for starting assessments.
pub struct StartAssessmentHandler {
    question_source: Arc<dyn QuestionSource>,
    profile_reader: Arc<dyn PatientProfileReader>,
    layout: Arc<QuestionnaireLayout>,
    rollback_scores_on_back: bool,
}

impl StartAssessmentHandler {
    pub fn new(
        question_source: Arc<dyn QuestionSource>,
        profile_reader: Arc<dyn PatientProfileReader>,
        layout: Arc<QuestionnaireLayout>,
    ) -> Self {
        Self {
            question_source,
            profile_reader,
            layout,
            rollback_scores_on_back: true,
        }
    }

    pub fn with_score_rollback(mut self, enabled: bool) -> Self {
        self.rollback_scores_on_back = enabled;
        self
    }

    pub async fn handle(
        &self,
        cmd: StartAssessmentCommand,
    ) -> Result<ActiveAssessment, StartAssessmentError> {
        // 1. Load and validate the catalog
        let documents = self.question_source.get_ordered_questions().await?;
        let catalog = Arc::new(QuestionCatalog::load(documents)?);
        let engine = NavigationEngine::new(catalog, Arc::clone(&self.layout))?
            .with_score_rollback(self.rollback_scores_on_back);

        // 2. Profile problems only disable skip rules
        let profile = match self.profile_reader.get_patient_profile(&cmd.patient_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(
                    patient_id = %cmd.patient_id,
                    error = %err,
                    "Patient profile unavailable, skip rules disabled"
                );
                None
            }
        };

        // 3. Open the session
        let session = engine.start(cmd.patient_id, profile);
        info!(
            session_id = %session.id(),
            patient_id = %session.patient_id(),
            questions = engine.catalog().len(),
            "Assessment started"
        );

        Ok(ActiveAssessment::new(Arc::new(engine), session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::questionnaire::test_support::{embedded_documents, patient};
    use crate::domain::questionnaire::{BirthHistory, Gender, Phase, PatientProfile, QuestionDocument};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ───────────────────────────────────────────────────────────────
    // Mock implementations
    // ───────────────────────────────────────────────────────────────

    struct MockQuestionSource {
        documents: Vec<QuestionDocument>,
        fail: bool,
        calls: Mutex<usize>,
    }

    impl MockQuestionSource {
        fn new(documents: Vec<QuestionDocument>) -> Self {
            Self {
                documents,
                fail: false,
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                documents: Vec::new(),
                fail: true,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl QuestionSource for MockQuestionSource {
        async fn get_ordered_questions(&self) -> Result<Vec<QuestionDocument>, DomainError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(DomainError::new(
                    ErrorCode::CatalogLoadFailure,
                    "simulated catalog failure",
                ));
            }
            Ok(self.documents.clone())
        }
    }

    struct MockProfileReader {
        profile: Option<PatientProfile>,
        fail: bool,
    }

    #[async_trait]
    impl PatientProfileReader for MockProfileReader {
        async fn get_patient_profile(
            &self,
            _patient_id: &PatientId,
        ) -> Result<Option<PatientProfile>, DomainError> {
            if self.fail {
                return Err(DomainError::new(ErrorCode::DatabaseError, "profile store down"));
            }
            Ok(self.profile.clone())
        }
    }

    fn layout() -> Arc<QuestionnaireLayout> {
        Arc::new(QuestionnaireLayout::embedded().unwrap())
    }

    fn handler(source: MockQuestionSource, reader: MockProfileReader) -> StartAssessmentHandler {
        StartAssessmentHandler::new(Arc::new(source), Arc::new(reader), layout())
    }

    fn cmd() -> StartAssessmentCommand {
        StartAssessmentCommand {
            patient_id: patient("ana@example.com"),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn starts_at_first_screening_question_with_profile() {
        let profile = PatientProfile::new(Some(Gender::Female), Some(BirthHistory::No));
        let handler = handler(
            MockQuestionSource::new(embedded_documents()),
            MockProfileReader {
                profile: Some(profile.clone()),
                fail: false,
            },
        );

        let active = handler.handle(cmd()).await.unwrap();

        assert_eq!(active.session().ordinal(), 0);
        assert_eq!(active.session().phase(), Phase::Screening);
        assert_eq!(active.session().profile(), Some(&profile));
        assert_eq!(active.progress().value(), 0);
        assert_eq!(active.current_question().unwrap().ordinal(), 0);
    }

    #[tokio::test]
    async fn catalog_failure_prevents_start() {
        let handler = handler(
            MockQuestionSource::failing(),
            MockProfileReader {
                profile: None,
                fail: false,
            },
        );

        let err = handler.handle(cmd()).await.err().unwrap();
        assert!(matches!(err, StartAssessmentError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn malformed_catalog_prevents_start() {
        let mut documents = embedded_documents();
        documents.truncate(20);
        let handler = handler(
            MockQuestionSource::new(documents),
            MockProfileReader {
                profile: None,
                fail: false,
            },
        );

        let err = handler.handle(cmd()).await.err().unwrap();
        assert!(matches!(
            err,
            StartAssessmentError::Questionnaire(QuestionnaireError::MalformedLayout(_))
        ));
    }

    #[tokio::test]
    async fn profile_failure_starts_without_skip_data() {
        let handler = handler(
            MockQuestionSource::new(embedded_documents()),
            MockProfileReader {
                profile: None,
                fail: true,
            },
        );

        let active = handler.handle(cmd()).await.unwrap();
        assert!(active.session().profile().is_none());
    }

    #[tokio::test]
    async fn catalog_is_loaded_once_per_start() {
        let source = Arc::new(MockQuestionSource::new(embedded_documents()));
        let handler = StartAssessmentHandler::new(
            source.clone(),
            Arc::new(MockProfileReader {
                profile: None,
                fail: false,
            }),
            layout(),
        );

        handler.handle(cmd()).await.unwrap();
        handler.handle(cmd()).await.unwrap();
        assert_eq!(*source.calls.lock().unwrap(), 2);
    }
}
