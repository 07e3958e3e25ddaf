//! Explicit per-patient questionnaire session.
//!
//! All mutable engine state lives here and is handed to every
//! `NavigationEngine` call. Sessions are never shared between patients.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::condition::Condition;
use super::profile::PatientProfile;
use super::question::ResponseValue;
use super::scoring::{ScoreMap, ScoringAccumulator};
use crate::domain::foundation::{
    PatientId, QuestionId, SessionId, StateMachine, Timestamp, ValidationError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Phase
// ─────────────────────────────────────────────────────────────────────────────

/// Active phase of a session. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Screening,
    ConditionClassification,
    SubtypeDeepDive,
    NoConditionDiagnosed,
    SuicidalThoughtsDetected,
    DiagnosisComplete,
}

impl StateMachine for Phase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Phase::*;
        match self {
            Screening => vec![
                ConditionClassification,
                NoConditionDiagnosed,
                SuicidalThoughtsDetected,
            ],
            ConditionClassification => vec![Screening, SubtypeDeepDive],
            SubtypeDeepDive => vec![ConditionClassification, DiagnosisComplete],
            NoConditionDiagnosed | SuicidalThoughtsDetected | DiagnosisComplete => vec![],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Screening => "screening",
            Phase::ConditionClassification => "condition_classification",
            Phase::SubtypeDeepDive => "subtype_deep_dive",
            Phase::NoConditionDiagnosed => "no_condition_diagnosed",
            Phase::SuicidalThoughtsDetected => "suicidal_thoughts_detected",
            Phase::DiagnosisComplete => "diagnosis_complete",
        };
        write!(f, "{}", s)
    }
}

/// Terminal result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    NoConditionDiagnosed,
    SuicidalThoughtsDetected,
    DiagnosisComplete { condition: Condition, subtype: String },
}

impl AssessmentOutcome {
    /// Phase the session ends in.
    pub fn phase(&self) -> Phase {
        match self {
            AssessmentOutcome::NoConditionDiagnosed => Phase::NoConditionDiagnosed,
            AssessmentOutcome::SuicidalThoughtsDetected => Phase::SuicidalThoughtsDetected,
            AssessmentOutcome::DiagnosisComplete { .. } => Phase::DiagnosisComplete,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// A response together with the moment it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub value: ResponseValue,
    pub recorded_at: Timestamp,
}

/// One entry per answered question, in first-answered order.
///
/// Answering a question again replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(IndexMap<QuestionId, RecordedResponse>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question: QuestionId, value: ResponseValue, recorded_at: Timestamp) {
        self.0.insert(question, RecordedResponse { value, recorded_at });
    }

    pub fn get(&self, question: &QuestionId) -> Option<&ResponseValue> {
        self.0.get(question).map(|r| &r.value)
    }

    pub fn entry(&self, question: &QuestionId) -> Option<&RecordedResponse> {
        self.0.get(question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &RecordedResponse)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A deep-dive increment, kept so it can be compensated on `Back`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreEntry {
    pub ordinal: usize,
    pub category: String,
    pub amount: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: SessionId,
    patient_id: PatientId,
    profile: Option<PatientProfile>,
    started_at: Timestamp,
    pub(crate) ordinal: usize,
    pub(crate) phase: Phase,
    pub(crate) detected_condition: Option<Condition>,
    /// Visible ordinals of the detected condition's block.
    pub(crate) deep_dive: Vec<usize>,
    pub(crate) outcome: Option<AssessmentOutcome>,
    pub(crate) responses: ResponseSet,
    pub(crate) scores: ScoringAccumulator,
    pub(crate) ledger: Vec<ScoreEntry>,
}

impl AssessmentSession {
    /// Starts a session at the first screening question.
    pub fn new(patient_id: PatientId, profile: Option<PatientProfile>) -> Self {
        Self {
            id: SessionId::new(),
            patient_id,
            profile,
            started_at: Timestamp::now(),
            ordinal: 0,
            phase: Phase::Screening,
            detected_condition: None,
            deep_dive: Vec::new(),
            outcome: None,
            responses: ResponseSet::new(),
            scores: ScoringAccumulator::new(),
            ledger: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn profile(&self) -> Option<&PatientProfile> {
        self.profile.as_ref()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Ordinal of the current question.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn detected_condition(&self) -> Option<Condition> {
        self.detected_condition
    }

    /// Set only once the session reaches `DiagnosisComplete`.
    pub fn diagnosed_subtype(&self) -> Option<&str> {
        match &self.outcome {
            Some(AssessmentOutcome::DiagnosisComplete { subtype, .. }) => Some(subtype.as_str()),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&AssessmentOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn scores(&self) -> ScoreMap {
        self.scores.snapshot()
    }

    /// Moves to `target`, enforcing the phase state machine.
    pub(crate) fn enter(&mut self, target: Phase) -> Result<(), ValidationError> {
        if self.phase != target {
            self.phase = self.phase.transition_to(target)?;
        }
        Ok(())
    }

    pub(crate) fn finish(
        &mut self,
        outcome: AssessmentOutcome,
    ) -> Result<(), ValidationError> {
        self.enter(outcome.phase())?;
        self.outcome = Some(outcome);
        Ok(())
    }
}
