//! Replay runner - drives a scripted patient through the questionnaire.
//!
//! A script names the patient, an optional profile and the answers in the
//! order they are asked:
//!
//! ```yaml
//! patient_id: sam@example.com
//! profile:
//!   gender: female
//!   birthHistory: "no"
//! answers:
//!   - question: question1
//!     value: [repetitiveBehavior]
//!   - question: question2
//!     value: yes_symptoms
//! ```
//!
//! Each answer is recorded and followed by an advance until the
//! assessment concludes.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::adapters::{
    EmbeddedQuestionSource, FileAssessmentRepository, FileQuestionSource,
    InMemoryAssessmentRepository, InMemoryProfileReader,
};
use crate::application::{
    ActiveAssessment, GetLatestDiagnosisHandler, GetLatestDiagnosisQuery, LatestDiagnosis,
    NavigateQuestionCommand, NavigateQuestionHandler, PersistenceDispatcher,
    RecordResponseCommand, RecordResponseHandler, StartAssessmentCommand, StartAssessmentError,
    StartAssessmentHandler,
};
use crate::config::{self, AppConfig, CatalogSource, StorageBackend};
use crate::domain::foundation::{DomainError, PatientId, QuestionId};
use crate::domain::questionnaire::{
    AssessmentRecord, PatientProfile, QuestionnaireError, QuestionnaireLayout, ResponseValue,
};
use crate::ports::{AssessmentRepository, QuestionSource};

/// A scripted assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub patient_id: PatientId,
    #[serde(default)]
    pub profile: Option<PatientProfile>,
    pub answers: Vec<ScriptedAnswer>,
}

/// One answer of a script.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedAnswer {
    pub question: QuestionId,
    pub value: ResponseValue,
}

/// What a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub record: AssessmentRecord,
    pub diagnosis: Option<LatestDiagnosis>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse script: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ValidationError),

    #[error("{0}")]
    Start(#[from] StartAssessmentError),

    #[error("{0}")]
    Questionnaire(#[from] QuestionnaireError),

    #[error("{0}")]
    Storage(#[from] DomainError),

    #[error("script answers '{found}' but the current question is '{expected}'")]
    UnexpectedQuestion { expected: QuestionId, found: QuestionId },

    #[error("script answers '{0}' after the assessment concluded")]
    AnswerAfterConclusion(QuestionId),

    #[error("script ended at ordinal {0} before the assessment concluded")]
    Incomplete(usize),
}

impl ReplayScript {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let yaml = tokio::fs::read_to_string(path).await?;
        Ok(serde_yaml::from_str(&yaml)?)
    }
}

/// Replays `script` against the adapters selected by `config`.
pub async fn replay(config: &AppConfig, script: ReplayScript) -> Result<ReplayOutcome, ReplayError> {
    config.validate()?;

    let question_source: Arc<dyn QuestionSource> = match (config.catalog.source, &config.catalog.path)
    {
        (CatalogSource::File, Some(path)) => Arc::new(FileQuestionSource::new(path)),
        _ => Arc::new(EmbeddedQuestionSource::new()),
    };
    let repository: Arc<dyn AssessmentRepository> =
        match (config.storage.backend, &config.storage.data_dir) {
            (StorageBackend::File, Some(dir)) => Arc::new(FileAssessmentRepository::new(dir)),
            _ => Arc::new(InMemoryAssessmentRepository::new()),
        };

    let profiles = InMemoryProfileReader::new();
    if let Some(profile) = script.profile.clone() {
        profiles.insert(script.patient_id.clone(), profile).await;
    }

    let layout = Arc::new(QuestionnaireLayout::embedded()?);
    let dispatcher = Arc::new(PersistenceDispatcher::new(Arc::clone(&repository)));
    let start = StartAssessmentHandler::new(question_source, Arc::new(profiles), layout)
        .with_score_rollback(config.engine.rollback_scores_on_back);

    let mut active = start
        .handle(StartAssessmentCommand {
            patient_id: script.patient_id.clone(),
        })
        .await?;
    let record = run_answers(&mut active, &dispatcher, script.answers);
    dispatcher.flush().await;
    let record = record?;

    let diagnosis = GetLatestDiagnosisHandler::new(repository)
        .handle(GetLatestDiagnosisQuery {
            patient_id: script.patient_id,
        })
        .await?;

    info!(
        assessment_id = %record.assessment_id(),
        outcome = ?record.outcome(),
        "Replay finished"
    );
    Ok(ReplayOutcome { record, diagnosis })
}

fn run_answers(
    active: &mut ActiveAssessment,
    dispatcher: &Arc<PersistenceDispatcher>,
    answers: Vec<ScriptedAnswer>,
) -> Result<AssessmentRecord, ReplayError> {
    let record_handler = RecordResponseHandler::new(Arc::clone(dispatcher));
    let navigate_handler = NavigateQuestionHandler::new(Arc::clone(dispatcher));
    let mut concluded = None;

    for answer in answers {
        if concluded.is_some() {
            return Err(ReplayError::AnswerAfterConclusion(answer.question));
        }
        let expected = active.current_question()?.id().clone();
        if expected != answer.question {
            return Err(ReplayError::UnexpectedQuestion {
                expected,
                found: answer.question,
            });
        }

        let recorded =
            record_handler.handle(active, RecordResponseCommand { value: answer.value })?;
        if recorded.record.is_some() {
            concluded = recorded.record;
            continue;
        }
        concluded = navigate_handler
            .handle(active, NavigateQuestionCommand::advance())?
            .record;
    }

    concluded.ok_or_else(|| ReplayError::Incomplete(active.session().ordinal()))
}
