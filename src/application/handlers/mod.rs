//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod assessment;

pub use assessment::{
    // Session
    ActiveAssessment,
    // Commands
    NavigateDirection, NavigateQuestionCommand, NavigateQuestionHandler, NavigateQuestionResult,
    RecordResponseCommand, RecordResponseHandler, RecordResponseResult,
    StartAssessmentCommand, StartAssessmentError, StartAssessmentHandler,
    // Queries
    GetLatestDiagnosisHandler, GetLatestDiagnosisQuery, LatestDiagnosis,
    // Persistence
    PersistenceDispatcher, PersistenceFailure, PersistenceOperation,
};
