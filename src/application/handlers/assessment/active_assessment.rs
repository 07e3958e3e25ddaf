//! ActiveAssessment - a running session bound to the engine it was started with.

use std::sync::Arc;

use tracing::info;

use super::persistence_dispatcher::PersistenceDispatcher;
use crate::domain::foundation::{AssessmentId, Percentage};
use crate::domain::questionnaire::{
    AssessmentRecord, AssessmentSession, NavigationEngine, Question, QuestionnaireError,
};

/// Session plus the engine (catalog and layout) it navigates.
///
/// Owned by exactly one caller; transitions go through the handlers one at a time.
pub struct ActiveAssessment {
    engine: Arc<NavigationEngine>,
    session: AssessmentSession,
}

impl ActiveAssessment {
    pub fn new(engine: Arc<NavigationEngine>, session: AssessmentSession) -> Self {
        Self { engine, session }
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    pub fn current_question(&self) -> Result<&Question, QuestionnaireError> {
        self.engine.current_question(&self.session)
    }

    pub fn progress(&self) -> Percentage {
        self.engine.progress(&self.session)
    }

    pub fn is_terminated(&self) -> bool {
        self.session.is_terminated()
    }

    pub(crate) fn parts_mut(&mut self) -> (&NavigationEngine, &mut AssessmentSession) {
        (self.engine.as_ref(), &mut self.session)
    }

    /// Builds the final record under a fresh id and queues it for storage.
    pub(crate) fn conclude(
        &self,
        dispatcher: &PersistenceDispatcher,
    ) -> Result<AssessmentRecord, QuestionnaireError> {
        let record =
            AssessmentRecord::from_session(AssessmentId::new(), &self.session, self.engine.catalog())?;
        info!(
            session_id = %self.session.id(),
            patient_id = %record.patient_id(),
            assessment_id = %record.assessment_id(),
            outcome = %self.session.phase(),
            "Assessment concluded"
        );
        dispatcher.put_assessment(record.clone());
        Ok(record)
    }
}
