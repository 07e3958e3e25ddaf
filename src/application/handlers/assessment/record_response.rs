//! RecordResponseHandler - Command handler for answering the current question.
//!
//! The answer is stored on the session, then queued for storage without
//! waiting. A screening exit concludes the assessment and queues its record.

use std::sync::Arc;

use super::active_assessment::ActiveAssessment;
use super::persistence_dispatcher::PersistenceDispatcher;
use crate::domain::foundation::Percentage;
use crate::domain::questionnaire::{
    AssessmentRecord, NavigationStep, QuestionnaireError, ResponseEntry, ResponseValue,
};

/// Command carrying the answer to the current question.
#[derive(Debug, Clone)]
pub struct RecordResponseCommand {
    /// Answer to the current question; must be one of its options.
    pub value: ResponseValue,
}

/// Result of recording an answer.
#[derive(Debug, Clone)]
pub struct RecordResponseResult {
    /// Current question, or the terminal outcome the answer triggered.
    pub step: NavigationStep,
    /// Completion after the answer.
    pub progress: Percentage,
    /// Present when the answer ended the assessment.
    pub record: Option<AssessmentRecord>,
}

/// Handler for recording answers.
pub struct RecordResponseHandler {
    dispatcher: Arc<PersistenceDispatcher>,
}

impl RecordResponseHandler {
    pub fn new(dispatcher: Arc<PersistenceDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Never waits on storage; write failures surface through the dispatcher.
    pub fn handle(
        &self,
        active: &mut ActiveAssessment,
        cmd: RecordResponseCommand,
    ) -> Result<RecordResponseResult, QuestionnaireError> {
        let (question_id, question_text) = {
            let question = active.current_question()?;
            (question.id().clone(), question.prompt().to_string())
        };

        let step = {
            let (engine, session) = active.parts_mut();
            engine.record_response(session, cmd.value)?
        };

        if let Some(recorded) = active.session().responses().entry(&question_id) {
            self.dispatcher.put_response(
                active.session().patient_id().clone(),
                question_id,
                ResponseEntry {
                    question_text,
                    value: recorded.value.clone(),
                    recorded_at: recorded.recorded_at,
                },
            );
        }

        let record = if step.is_finished() {
            Some(active.conclude(&self.dispatcher)?)
        } else {
            None
        };

        Ok(RecordResponseResult {
            step,
            progress: active.progress(),
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAssessmentRepository;
    use crate::domain::foundation::QuestionId;
    use crate::domain::questionnaire::test_support::{embedded_engine, patient};
    use crate::domain::questionnaire::AssessmentOutcome;
    use crate::ports::AssessmentRepository;

    fn setup() -> (RecordResponseHandler, InMemoryAssessmentRepository, ActiveAssessment) {
        let repo = InMemoryAssessmentRepository::new();
        let dispatcher = Arc::new(PersistenceDispatcher::new(Arc::new(repo.clone())));
        let engine = Arc::new(embedded_engine());
        let session = engine.start(patient("mo@example.com"), None);
        (
            RecordResponseHandler::new(dispatcher),
            repo,
            ActiveAssessment::new(engine, session),
        )
    }

    fn answer(value: ResponseValue) -> RecordResponseCommand {
        RecordResponseCommand { value }
    }

    #[tokio::test]
    async fn answer_is_persisted_with_question_text() {
        let (handler, repo, mut active) = setup();

        let result = handler
            .handle(&mut active, answer(ResponseValue::multi(["depressedLonely"])))
            .unwrap();
        handler.dispatcher.flush().await;

        assert_eq!(result.step, NavigationStep::Question(0));
        assert!(result.record.is_none());
        let stored = repo
            .response(&patient("mo@example.com"), &QuestionId::new("question1").unwrap())
            .await
            .unwrap();
        assert_eq!(stored.value, ResponseValue::multi(["depressedLonely"]));
        assert!(!stored.question_text.is_empty());
    }

    #[tokio::test]
    async fn invalid_answer_is_not_persisted() {
        let (handler, repo, mut active) = setup();

        let err = handler
            .handle(&mut active, answer(ResponseValue::single("maybe")))
            .unwrap_err();
        handler.dispatcher.flush().await;

        assert!(matches!(err, QuestionnaireError::InvalidResponse { .. }));
        assert_eq!(repo.response_count().await, 0);
    }

    #[tokio::test]
    async fn suicidal_answer_concludes_and_stores_record() {
        let (handler, repo, mut active) = setup();
        handler
            .handle(&mut active, answer(ResponseValue::multi(["depressedLonely"])))
            .unwrap();
        {
            let (engine, session) = active.parts_mut();
            engine.advance(session).unwrap();
        }
        handler
            .handle(&mut active, answer(ResponseValue::single("yes_symptoms")))
            .unwrap();
        {
            let (engine, session) = active.parts_mut();
            engine.advance(session).unwrap();
        }
        let result = handler
            .handle(&mut active, answer(ResponseValue::single("yes_suicidalthoughts")))
            .unwrap();
        handler.dispatcher.flush().await;

        assert_eq!(
            result.step,
            NavigationStep::Finished(AssessmentOutcome::SuicidalThoughtsDetected)
        );
        assert_eq!(result.progress, Percentage::HUNDRED);
        let record = result.record.unwrap();
        assert!(record.suicidal_thoughts());
        assert_eq!(record.responses().len(), 3);

        let stored = repo
            .latest_for_patient(&patient("mo@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.assessment_id(), record.assessment_id());
    }

    #[tokio::test]
    async fn storage_failure_does_not_block_navigation() {
        let (handler, repo, mut active) = setup();
        repo.fail_writes(true);

        let result = handler
            .handle(&mut active, answer(ResponseValue::multi(["none"])))
            .unwrap();
        handler.dispatcher.flush().await;

        assert_eq!(result.step, NavigationStep::Question(0));
        assert_eq!(repo.response_count().await, 0);
        assert_eq!(active.session().responses().len(), 1);
    }
}
