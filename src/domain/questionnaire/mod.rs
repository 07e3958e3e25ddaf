//! Questionnaire module - Adaptive diagnostic questionnaire engine.
//!
//! A session walks a patient through screening, a plurality vote that
//! classifies a top-level condition, and a condition-specific deep-dive
//! whose scores resolve a diagnosed subtype. Early exits end the session
//! when no condition is present or suicidal ideation is reported.

mod catalog;
mod condition;
mod errors;
mod layout;
mod navigation;
mod profile;
mod progress;
mod question;
mod record;
mod resolver;
mod scoring;
mod session;
mod symptoms;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::QuestionCatalog;
pub use condition::Condition;
pub use errors::QuestionnaireError;
pub use layout::{
    ConditionRange, OrdinalSpan, QuestionnaireLayout, ScreeningCheck, ScreeningLayout, SkipRule,
};
pub use navigation::{NavigationEngine, NavigationStep};
pub use profile::{BirthHistory, Gender, PatientProfile, SkipPredicate};
pub use progress::ProgressCalculator;
pub use question::{
    AnswerOption, DocumentKind, Question, QuestionDocument, QuestionKind, ResponseValue,
    SubQuestion, SubQuestionDocument,
};
pub use record::{AssessmentRecord, ResponseEntry};
pub use resolver::DiagnosisResolver;
pub use scoring::{ScoreMap, ScoringAccumulator};
pub use session::{AssessmentOutcome, AssessmentSession, Phase, RecordedResponse, ResponseSet};
pub use symptoms::{symptom_profile, SymptomProfile};
