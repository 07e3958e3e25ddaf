//! Shared fixtures for unit tests across the crate.

use std::sync::Arc;

use super::{
    AssessmentOutcome, AssessmentRecord, AssessmentSession, Condition, NavigationEngine,
    QuestionCatalog, QuestionDocument, QuestionnaireLayout,
};
use crate::domain::foundation::{AssessmentId, PatientId};

pub fn embedded_documents() -> Vec<QuestionDocument> {
    serde_json::from_str(include_str!("../../../data/questions.json")).unwrap()
}

pub fn embedded_catalog() -> Arc<QuestionCatalog> {
    Arc::new(QuestionCatalog::load(embedded_documents()).unwrap())
}

pub fn embedded_engine() -> NavigationEngine {
    NavigationEngine::new(
        embedded_catalog(),
        Arc::new(QuestionnaireLayout::embedded().unwrap()),
    )
    .unwrap()
}

pub fn patient(id: &str) -> PatientId {
    PatientId::new(id).unwrap()
}

/// A record for a session that ended with `outcome` without any answers.
pub fn record_with(patient_id: &PatientId, outcome: AssessmentOutcome) -> AssessmentRecord {
    let mut session = AssessmentSession::new(patient_id.clone(), None);
    if let AssessmentOutcome::DiagnosisComplete { condition, .. } = &outcome {
        session.enter(super::Phase::ConditionClassification).unwrap();
        session.enter(super::Phase::SubtypeDeepDive).unwrap();
        session.detected_condition = Some(*condition);
    }
    session.finish(outcome).unwrap();
    AssessmentRecord::from_session(AssessmentId::new(), &session, &embedded_catalog()).unwrap()
}

pub fn diagnosis(condition: Condition, subtype: &str) -> AssessmentOutcome {
    AssessmentOutcome::DiagnosisComplete {
        condition,
        subtype: subtype.to_string(),
    }
}
