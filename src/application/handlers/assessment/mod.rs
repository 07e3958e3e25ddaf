//! Assessment handlers - Command and query handlers for the questionnaire.
//!
//! Commands:
//! - `StartAssessmentHandler` - Load the catalog and open a session
//! - `RecordResponseHandler` - Answer the current question
//! - `NavigateQuestionHandler` - Advance or go back
//!
//! Queries:
//! - `GetLatestDiagnosisHandler` - Most recent diagnosed subtype of a patient
//!
//! Storage writes go through the `PersistenceDispatcher` and never block
//! navigation.

mod active_assessment;
mod get_latest_diagnosis;
mod navigate_question;
mod persistence_dispatcher;
mod record_response;
mod start_assessment;

pub use active_assessment::ActiveAssessment;
pub use get_latest_diagnosis::{GetLatestDiagnosisHandler, GetLatestDiagnosisQuery, LatestDiagnosis};
pub use navigate_question::{
    NavigateDirection, NavigateQuestionCommand, NavigateQuestionHandler, NavigateQuestionResult,
};
pub use persistence_dispatcher::{PersistenceDispatcher, PersistenceFailure, PersistenceOperation};
pub use record_response::{RecordResponseCommand, RecordResponseHandler, RecordResponseResult};
pub use start_assessment::{StartAssessmentCommand, StartAssessmentError, StartAssessmentHandler};
