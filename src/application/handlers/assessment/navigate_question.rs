//! NavigateQuestionHandler - Command handler for moving between questions.
//!
//! Advance requires the current question to be answered; Back is always
//! allowed on an active session. Reaching the end of the deep-dive
//! concludes the assessment and queues its record.

use std::sync::Arc;

use tracing::debug;

use super::active_assessment::ActiveAssessment;
use super::persistence_dispatcher::PersistenceDispatcher;
use crate::domain::foundation::Percentage;
use crate::domain::questionnaire::{AssessmentRecord, NavigationStep, QuestionnaireError};

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateDirection {
    /// Move forward from an answered question.
    Advance,
    /// Return to the previous visible question.
    Back,
}

/// Command to move from the current question.
#[derive(Debug, Clone, Copy)]
pub struct NavigateQuestionCommand {
    /// Which way to move.
    pub direction: NavigateDirection,
}

impl NavigateQuestionCommand {
    pub fn advance() -> Self {
        Self {
            direction: NavigateDirection::Advance,
        }
    }

    pub fn back() -> Self {
        Self {
            direction: NavigateDirection::Back,
        }
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone)]
pub struct NavigateQuestionResult {
    /// Question now shown, or the outcome reached by advancing.
    pub step: NavigationStep,
    /// Completion after the move.
    pub progress: Percentage,
    /// Present when the move concluded the assessment.
    pub record: Option<AssessmentRecord>,
}

/// Handler for advance and back.
pub struct NavigateQuestionHandler {
    dispatcher: Arc<PersistenceDispatcher>,
}

impl NavigateQuestionHandler {
    pub fn new(dispatcher: Arc<PersistenceDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn handle(
        &self,
        active: &mut ActiveAssessment,
        cmd: NavigateQuestionCommand,
    ) -> Result<NavigateQuestionResult, QuestionnaireError> {
        let step = {
            let (engine, session) = active.parts_mut();
            match cmd.direction {
                NavigateDirection::Advance => engine.advance(session)?,
                NavigateDirection::Back => engine.back(session)?,
            }
        };
        debug!(
            session_id = %active.session().id(),
            direction = ?cmd.direction,
            step = ?step,
            "Navigation handled"
        );

        let record = if step.is_finished() {
            Some(active.conclude(&self.dispatcher)?)
        } else {
            None
        };

        Ok(NavigateQuestionResult {
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
    use crate::application::handlers::assessment::{RecordResponseCommand, RecordResponseHandler};
    use crate::domain::questionnaire::test_support::{embedded_engine, patient};
    use crate::domain::questionnaire::{AssessmentOutcome, Condition, Phase, ResponseValue};

    struct Harness {
        repo: InMemoryAssessmentRepository,
        dispatcher: Arc<PersistenceDispatcher>,
        answers: RecordResponseHandler,
        navigate: NavigateQuestionHandler,
        active: ActiveAssessment,
    }

    impl Harness {
        fn new() -> Self {
            let repo = InMemoryAssessmentRepository::new();
            let dispatcher = Arc::new(PersistenceDispatcher::new(Arc::new(repo.clone())));
            let engine = Arc::new(embedded_engine());
            let session = engine.start(patient("noor@example.com"), None);
            Self {
                repo,
                answers: RecordResponseHandler::new(Arc::clone(&dispatcher)),
                navigate: NavigateQuestionHandler::new(Arc::clone(&dispatcher)),
                dispatcher,
                active: ActiveAssessment::new(engine, session),
            }
        }

        fn answer(&mut self, value: ResponseValue) {
            self.answers
                .handle(&mut self.active, RecordResponseCommand { value })
                .unwrap();
        }

        fn answer_and_advance(&mut self, value: ResponseValue) -> NavigateQuestionResult {
            self.answer(value);
            self.navigate
                .handle(&mut self.active, NavigateQuestionCommand::advance())
                .unwrap()
        }
    }

    #[tokio::test]
    async fn advance_without_answer_is_rejected() {
        let mut h = Harness::new();

        let err = h
            .navigate
            .handle(&mut h.active, NavigateQuestionCommand::advance())
            .unwrap_err();

        assert!(matches!(err, QuestionnaireError::InvalidTransitionRequest { .. }));
        assert_eq!(h.active.session().ordinal(), 0);
    }

    #[tokio::test]
    async fn back_returns_to_previous_screening_question() {
        let mut h = Harness::new();
        h.answer_and_advance(ResponseValue::multi(["lossofInterest"]));

        let result = h
            .navigate
            .handle(&mut h.active, NavigateQuestionCommand::back())
            .unwrap();

        assert_eq!(result.step, NavigationStep::Question(0));
        assert_eq!(result.progress.value(), 0);
    }

    #[tokio::test]
    async fn completing_the_deep_dive_stores_the_diagnosis() {
        let mut h = Harness::new();
        h.answer_and_advance(ResponseValue::multi(["flashbacksNightmares"]));
        h.answer_and_advance(ResponseValue::single("yes_symptoms"));
        h.answer_and_advance(ResponseValue::single("no_suicidalthoughts"));
        for _ in 3..=6 {
            h.answer_and_advance(ResponseValue::single("Trauma"));
        }
        assert_eq!(h.active.session().phase(), Phase::SubtypeDeepDive);
        assert_eq!(h.active.session().ordinal(), 53);

        let mut last = None;
        while !h.active.is_terminated() {
            let ordinal = h.active.session().ordinal();
            let value = if (63..=68).contains(&ordinal) { "Yes" } else { "A little bit" };
            last = Some(h.answer_and_advance(ResponseValue::single(value)));
        }
        h.dispatcher.flush().await;

        let result = last.unwrap();
        assert_eq!(result.progress, Percentage::HUNDRED);
        let record = result.record.unwrap();
        assert_eq!(
            record.outcome(),
            AssessmentOutcome::DiagnosisComplete {
                condition: Condition::Trauma,
                subtype: "Developmental Trauma".into(),
            }
        );
        assert_eq!(h.repo.record_count().await, 1);
    }

    #[tokio::test]
    async fn navigation_after_conclusion_is_rejected() {
        let mut h = Harness::new();
        h.answer(ResponseValue::multi(["none"]));
        h.navigate
            .handle(&mut h.active, NavigateQuestionCommand::advance())
            .unwrap();
        h.answer(ResponseValue::single("no_symptoms"));
        assert!(h.active.is_terminated());

        let err = h
            .navigate
            .handle(&mut h.active, NavigateQuestionCommand::back())
            .unwrap_err();
        assert_eq!(err, QuestionnaireError::SessionTerminated);
    }
}
