//! Immutable assessment record written at a terminal outcome.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::condition::Condition;
use super::errors::QuestionnaireError;
use super::question::ResponseValue;
use super::session::{AssessmentOutcome, AssessmentSession};
use crate::domain::foundation::{AssessmentId, PatientId, QuestionId, Timestamp};

/// A single stored answer, as written by `put_response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    pub question_text: String,
    pub value: ResponseValue,
    pub recorded_at: Timestamp,
}

/// Final record of one assessment attempt.
///
/// Records are never mutated; a new attempt produces a new record under a
/// fresh `AssessmentId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    assessment_id: AssessmentId,
    patient_id: PatientId,
    timestamp: Timestamp,
    no_condition_diagnosed: bool,
    suicidal_thoughts: bool,
    detected_condition: Option<Condition>,
    diagnosed_subtype: Option<String>,
    responses: IndexMap<QuestionId, ResponseEntry>,
}

impl AssessmentRecord {
    /// Builds the record of a terminated session.
    pub fn from_session(
        assessment_id: AssessmentId,
        session: &AssessmentSession,
        catalog: &QuestionCatalog,
    ) -> Result<Self, QuestionnaireError> {
        let outcome = session.outcome().ok_or_else(|| {
            QuestionnaireError::invalid_transition(
                session.ordinal(),
                "session has not reached a terminal outcome",
            )
        })?;

        let mut responses = IndexMap::with_capacity(session.responses().len());
        for (question_id, recorded) in session.responses().iter() {
            let question = catalog
                .by_id(question_id)
                .ok_or_else(|| QuestionnaireError::QuestionNotFound(question_id.to_string()))?;
            responses.insert(
                question_id.clone(),
                ResponseEntry {
                    question_text: question.prompt().to_string(),
                    value: recorded.value.clone(),
                    recorded_at: recorded.recorded_at,
                },
            );
        }

        let (detected_condition, diagnosed_subtype) = match outcome {
            AssessmentOutcome::DiagnosisComplete { condition, subtype } => {
                (Some(*condition), Some(subtype.clone()))
            }
            _ => (None, None),
        };

        Ok(Self {
            assessment_id,
            patient_id: session.patient_id().clone(),
            timestamp: Timestamp::now(),
            no_condition_diagnosed: matches!(outcome, AssessmentOutcome::NoConditionDiagnosed),
            suicidal_thoughts: matches!(outcome, AssessmentOutcome::SuicidalThoughtsDetected),
            detected_condition,
            diagnosed_subtype,
            responses,
        })
    }

    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn no_condition_diagnosed(&self) -> bool {
        self.no_condition_diagnosed
    }

    pub fn suicidal_thoughts(&self) -> bool {
        self.suicidal_thoughts
    }

    pub fn detected_condition(&self) -> Option<Condition> {
        self.detected_condition
    }

    pub fn diagnosed_subtype(&self) -> Option<&str> {
        self.diagnosed_subtype.as_deref()
    }

    pub fn responses(&self) -> &IndexMap<QuestionId, ResponseEntry> {
        &self.responses
    }

    /// Outcome the record was written for.
    pub fn outcome(&self) -> AssessmentOutcome {
        match (self.detected_condition, &self.diagnosed_subtype) {
            (Some(condition), Some(subtype)) => AssessmentOutcome::DiagnosisComplete {
                condition,
                subtype: subtype.clone(),
            },
            _ if self.suicidal_thoughts => AssessmentOutcome::SuicidalThoughtsDetected,
            _ => AssessmentOutcome::NoConditionDiagnosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::question::{AnswerOption, QuestionDocument};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::load(vec![QuestionDocument {
            id: "question1".into(),
            position: 1,
            prompt: "Have you been feeling any of the following lately?".into(),
            category: "screening".into(),
            kind: None,
            options: vec![AnswerOption {
                value: "none".into(),
                label: "None of the above".into(),
                score: None,
            }],
            subquestions: vec![],
        }])
        .unwrap()
    }

    fn session() -> AssessmentSession {
        let mut s = AssessmentSession::new(PatientId::new("patient@example.com").unwrap(), None);
        s.responses.record(
            QuestionId::new("question1").unwrap(),
            ResponseValue::single("none"),
            Timestamp::now(),
        );
        s
    }

    #[test]
    fn record_requires_terminal_session() {
        let err = AssessmentRecord::from_session(AssessmentId::new(), &session(), &catalog())
            .unwrap_err();
        assert!(matches!(err, QuestionnaireError::InvalidTransitionRequest { .. }));
    }

    #[test]
    fn record_carries_outcome_flags_and_question_text() {
        let mut s = session();
        s.finish(AssessmentOutcome::NoConditionDiagnosed).unwrap();
        let record = AssessmentRecord::from_session(AssessmentId::new(), &s, &catalog()).unwrap();

        assert!(record.no_condition_diagnosed());
        assert!(!record.suicidal_thoughts());
        assert_eq!(record.detected_condition(), None);
        assert_eq!(record.outcome(), AssessmentOutcome::NoConditionDiagnosed);
        let entry = &record.responses()[&QuestionId::new("question1").unwrap()];
        assert_eq!(
            entry.question_text,
            "Have you been feeling any of the following lately?"
        );
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let mut s = session();
        s.finish(AssessmentOutcome::SuicidalThoughtsDetected).unwrap();
        let record = AssessmentRecord::from_session(AssessmentId::new(), &s, &catalog()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["suicidalThoughts"], true);
        assert_eq!(json["noConditionDiagnosed"], false);
        assert!(json["responses"]["question1"]["questionText"].is_string());
    }
}
