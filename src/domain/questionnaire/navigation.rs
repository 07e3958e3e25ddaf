//! Navigation engine - the questionnaire state machine.
//!
//! The engine itself is immutable and shareable; every call takes the
//! patient's `AssessmentSession` explicitly. Calls for one session must not
//! overlap.

use std::sync::Arc;
use tracing::{debug, info};

use super::catalog::QuestionCatalog;
use super::condition::Condition;
use super::errors::QuestionnaireError;
use super::layout::QuestionnaireLayout;
use super::profile::PatientProfile;
use super::progress::ProgressCalculator;
use super::question::{Question, ResponseValue};
use super::resolver::DiagnosisResolver;
use super::scoring::{ScoreMap, ScoringAccumulator};
use super::session::{AssessmentOutcome, AssessmentSession, Phase, ScoreEntry};
use crate::domain::foundation::{PatientId, Percentage, Timestamp, ValidationError};

/// Where a session stands after an engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationStep {
    /// The session is waiting on the question at this ordinal.
    Question(usize),
    /// The session reached a terminal outcome.
    Finished(AssessmentOutcome),
}

impl NavigationStep {
    pub fn is_finished(&self) -> bool {
        matches!(self, NavigationStep::Finished(_))
    }
}

#[derive(Debug, Clone)]
pub struct NavigationEngine {
    catalog: Arc<QuestionCatalog>,
    layout: Arc<QuestionnaireLayout>,
    rollback_on_back: bool,
}

impl NavigationEngine {
    /// Creates an engine after validating the layout against the catalog.
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        layout: Arc<QuestionnaireLayout>,
    ) -> Result<Self, QuestionnaireError> {
        layout.validate(&catalog)?;
        Ok(Self {
            catalog,
            layout,
            rollback_on_back: true,
        })
    }

    /// Whether `back` compensates deep-dive scores. Enabled by default.
    pub fn with_score_rollback(mut self, enabled: bool) -> Self {
        self.rollback_on_back = enabled;
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &QuestionnaireLayout {
        &self.layout
    }

    /// Opens a new session at the first question.
    pub fn start(&self, patient_id: PatientId, profile: Option<PatientProfile>) -> AssessmentSession {
        let session = AssessmentSession::new(patient_id, profile);
        debug!(session_id = %session.id(), patient_id = %session.patient_id(), "Assessment session started");
        session
    }

    pub fn current_question(
        &self,
        session: &AssessmentSession,
    ) -> Result<&Question, QuestionnaireError> {
        ensure_active(session)?;
        self.catalog.require(session.ordinal)
    }

    pub fn progress(&self, session: &AssessmentSession) -> Percentage {
        ProgressCalculator::progress(session, &self.layout)
    }

    // ─────────────────────────────────────────────────────────────────────
    // RecordResponse
    // ─────────────────────────────────────────────────────────────────────

    /// Stores the answer to the current question and evaluates the
    /// screening exits.
    pub fn record_response(
        &self,
        session: &mut AssessmentSession,
        value: ResponseValue,
    ) -> Result<NavigationStep, QuestionnaireError> {
        ensure_active(session)?;
        let question = self.catalog.require(session.ordinal)?;
        question.validate_response(&value)?;

        session
            .responses
            .record(question.id().clone(), value, Timestamp::now());
        debug!(
            session_id = %session.id(),
            ordinal = session.ordinal,
            question_id = %question.id(),
            "Response recorded"
        );

        if let Some(outcome) = self.screening_exit(session) {
            session.finish(outcome.clone()).map_err(|e| transition_error(session, e))?;
            info!(
                session_id = %session.id(),
                ordinal = session.ordinal,
                outcome = %session.phase(),
                "Assessment ended during screening"
            );
            return Ok(NavigationStep::Finished(outcome));
        }

        Ok(NavigationStep::Question(session.ordinal))
    }

    /// Suicidal ideation is checked first so a no-condition exit can never
    /// mask it.
    fn screening_exit(&self, session: &AssessmentSession) -> Option<AssessmentOutcome> {
        if session.phase != Phase::Screening {
            return None;
        }
        let screening = &self.layout.screening;

        let answered = |ordinal: usize, value: &str| {
            self.catalog
                .get(ordinal)
                .and_then(|q| session.responses.get(q.id()))
                .map(|r| r.contains(value))
                .unwrap_or(false)
        };

        if answered(
            screening.suicidal_ideation.ordinal,
            &screening.suicidal_ideation.value,
        ) {
            return Some(AssessmentOutcome::SuicidalThoughtsDetected);
        }

        if session.ordinal == screening.no_symptoms.ordinal
            && answered(screening.none_selected.ordinal, &screening.none_selected.value)
            && answered(screening.no_symptoms.ordinal, &screening.no_symptoms.value)
        {
            return Some(AssessmentOutcome::NoConditionDiagnosed);
        }

        None
    }

    // ─────────────────────────────────────────────────────────────────────
    // Advance
    // ─────────────────────────────────────────────────────────────────────

    /// Moves forward from an answered question.
    ///
    /// Fails with `InvalidTransitionRequest`, leaving the session untouched,
    /// when the current question has no recorded response.
    pub fn advance(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<NavigationStep, QuestionnaireError> {
        ensure_active(session)?;
        let question = self.catalog.require(session.ordinal)?;
        let response = session.responses.get(question.id()).cloned().ok_or_else(|| {
            QuestionnaireError::invalid_transition(
                session.ordinal,
                format!("no response recorded for '{}'", question.id()),
            )
        })?;

        match session.phase {
            Phase::Screening => {
                let next = session.ordinal + 1;
                if next >= self.layout.classification.start {
                    session
                        .enter(Phase::ConditionClassification)
                        .map_err(|e| transition_error(session, e))?;
                }
                session.ordinal = next;
            }
            Phase::ConditionClassification => {
                if session.ordinal < self.layout.classification.end {
                    session.ordinal += 1;
                } else {
                    self.enter_deep_dive(session)?;
                }
            }
            Phase::SubtypeDeepDive => {
                return self.advance_deep_dive(session, question, &response);
            }
            _ => return Err(QuestionnaireError::SessionTerminated),
        }

        debug!(session_id = %session.id(), ordinal = session.ordinal, phase = %session.phase, "Advanced");
        Ok(NavigationStep::Question(session.ordinal))
    }

    fn enter_deep_dive(&self, session: &mut AssessmentSession) -> Result<(), QuestionnaireError> {
        let condition = self.classify(session)?;
        let range = self.layout.range_for(condition).ok_or_else(|| {
            QuestionnaireError::layout(format!("no range for condition {}", condition))
        })?;
        let visible = range.visible_ordinals(session.profile());
        let first = *visible.first().ok_or_else(|| {
            QuestionnaireError::layout(format!("range of {} has no visible ordinals", condition))
        })?;

        session
            .enter(Phase::SubtypeDeepDive)
            .map_err(|e| transition_error(session, e))?;
        if visible.len() < range.end - range.start + 1 {
            debug!(
                session_id = %session.id(),
                condition = %condition,
                hidden = range.end - range.start + 1 - visible.len(),
                "Skip rules hide part of the deep-dive block"
            );
        }
        session.detected_condition = Some(condition);
        session.deep_dive = visible;
        session.ordinal = first;

        info!(
            session_id = %session.id(),
            condition = %condition,
            ordinal = first,
            "Condition classified"
        );
        Ok(())
    }

    fn classify(&self, session: &AssessmentSession) -> Result<Condition, QuestionnaireError> {
        let span = self.layout.classification;
        let mut votes = Vec::with_capacity(span.end - span.start + 1);
        for ordinal in span.ordinals() {
            let question = self.catalog.require(ordinal)?;
            let vote = session
                .responses
                .get(question.id())
                .and_then(ResponseValue::as_single)
                .and_then(Condition::from_option_value)
                .ok_or_else(|| {
                    QuestionnaireError::invalid_transition(
                        ordinal,
                        format!("no condition vote recorded for '{}'", question.id()),
                    )
                })?;
            votes.push(vote);
        }
        DiagnosisResolver::classify(votes)
            .ok_or_else(|| QuestionnaireError::invalid_transition(session.ordinal, "no votes cast"))
    }

    fn advance_deep_dive(
        &self,
        session: &mut AssessmentSession,
        question: &Question,
        response: &ResponseValue,
    ) -> Result<NavigationStep, QuestionnaireError> {
        let ordinal = session.ordinal;
        let position = session
            .deep_dive
            .iter()
            .position(|o| *o == ordinal)
            .ok_or_else(|| {
                QuestionnaireError::invalid_transition(ordinal, "ordinal outside the deep-dive block")
            })?;

        let amount = i64::from(question.score_of(response, self.layout.is_scorable(ordinal)));
        session.scores.add(question.category(), amount);
        session.ledger.push(ScoreEntry {
            ordinal,
            category: question.category().to_string(),
            amount,
        });

        match session.deep_dive.get(position + 1).copied() {
            Some(next) => {
                if next != ordinal + 1 {
                    debug!(
                        session_id = %session.id(),
                        from = ordinal,
                        to = next,
                        "Skipping sub-block"
                    );
                }
                session.ordinal = next;
                debug!(session_id = %session.id(), ordinal = next, "Advanced");
                Ok(NavigationStep::Question(next))
            }
            None => self.complete(session),
        }
    }

    fn complete(&self, session: &mut AssessmentSession) -> Result<NavigationStep, QuestionnaireError> {
        let condition = session.detected_condition.ok_or_else(|| {
            QuestionnaireError::invalid_transition(session.ordinal, "no detected condition")
        })?;
        let subtype = DiagnosisResolver::resolve(&self.block_scores(session)).ok_or_else(|| {
            QuestionnaireError::invalid_transition(session.ordinal, "no deep-dive scores")
        })?;

        let outcome = AssessmentOutcome::DiagnosisComplete {
            condition,
            subtype: subtype.clone(),
        };
        session
            .finish(outcome.clone())
            .map_err(|e| transition_error(session, e))?;

        info!(
            session_id = %session.id(),
            condition = %condition,
            subtype = %subtype,
            "Diagnosis complete"
        );
        Ok(NavigationStep::Finished(outcome))
    }

    /// Scores restricted to categories of the current deep-dive block.
    ///
    /// Without rollback the accumulator may still hold categories of a block
    /// the patient backed out of; those never compete for the subtype.
    fn block_scores(&self, session: &AssessmentSession) -> ScoreMap {
        let categories: Vec<&str> = session
            .deep_dive
            .iter()
            .filter_map(|ordinal| self.catalog.get(*ordinal))
            .map(Question::category)
            .collect();
        let mut scores = session.scores.snapshot();
        scores.retain(|category, _| categories.contains(&category.as_str()));
        scores
    }

    // ─────────────────────────────────────────────────────────────────────
    // Back
    // ─────────────────────────────────────────────────────────────────────

    /// Moves to the previous visible question.
    ///
    /// Leaving the deep-dive from its first question clears the detected
    /// condition and returns to the last classification question; leaving
    /// classification returns to the last screening question. Clamps at 0.
    pub fn back(&self, session: &mut AssessmentSession) -> Result<NavigationStep, QuestionnaireError> {
        ensure_active(session)?;
        let classification = self.layout.classification;

        match session.phase {
            Phase::Screening => {
                session.ordinal = session.ordinal.saturating_sub(1);
            }
            Phase::ConditionClassification => {
                if session.ordinal <= classification.start {
                    session
                        .enter(Phase::Screening)
                        .map_err(|e| transition_error(session, e))?;
                    session.ordinal = classification.start.saturating_sub(1);
                } else {
                    session.ordinal -= 1;
                }
            }
            Phase::SubtypeDeepDive => {
                let ordinal = session.ordinal;
                let position = session.deep_dive.iter().position(|o| *o == ordinal);
                match position {
                    Some(position) if position > 0 => {
                        let target = session.deep_dive[position - 1];
                        if self.rollback_on_back {
                            self.compensate_from(session, target);
                        }
                        if target + 1 != ordinal {
                            debug!(
                                session_id = %session.id(),
                                from = ordinal,
                                to = target,
                                "Skipping sub-block backwards"
                            );
                        }
                        session.ordinal = target;
                    }
                    _ => {
                        session
                            .enter(Phase::ConditionClassification)
                            .map_err(|e| transition_error(session, e))?;
                        session.detected_condition = None;
                        session.deep_dive.clear();
                        if self.rollback_on_back {
                            session.scores = ScoringAccumulator::new();
                            session.ledger.clear();
                        }
                        session.ordinal = classification.end;
                        debug!(session_id = %session.id(), "Left deep-dive, condition cleared");
                    }
                }
            }
            _ => return Err(QuestionnaireError::SessionTerminated),
        }

        debug!(session_id = %session.id(), ordinal = session.ordinal, phase = %session.phase, "Moved back");
        Ok(NavigationStep::Question(session.ordinal))
    }

    /// Reverses every ledger increment made at or after `ordinal`.
    fn compensate_from(&self, session: &mut AssessmentSession, ordinal: usize) {
        while let Some(entry) = session.ledger.last() {
            if entry.ordinal < ordinal {
                break;
            }
            if let Some(entry) = session.ledger.pop() {
                session.scores.add(&entry.category, -entry.amount);
                debug!(
                    session_id = %session.id(),
                    ordinal = entry.ordinal,
                    category = %entry.category,
                    amount = entry.amount,
                    "Score increment rolled back"
                );
            }
        }
    }
}

fn ensure_active(session: &AssessmentSession) -> Result<(), QuestionnaireError> {
    if session.is_terminated() {
        return Err(QuestionnaireError::SessionTerminated);
    }
    Ok(())
}

fn transition_error(session: &AssessmentSession, err: ValidationError) -> QuestionnaireError {
    QuestionnaireError::invalid_transition(session.ordinal, err.to_string())
}
