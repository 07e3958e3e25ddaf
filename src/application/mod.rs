//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer drives the questionnaire engine and coordinates between ports.
//! Command handlers mutate an `ActiveAssessment`; the query handler reads
//! stored records.

pub mod handlers;

pub use handlers::{
    ActiveAssessment, GetLatestDiagnosisHandler, GetLatestDiagnosisQuery, LatestDiagnosis,
    NavigateDirection, NavigateQuestionCommand, NavigateQuestionHandler, NavigateQuestionResult,
    PersistenceDispatcher, PersistenceFailure, PersistenceOperation, RecordResponseCommand,
    RecordResponseHandler, RecordResponseResult, StartAssessmentCommand, StartAssessmentError,
    StartAssessmentHandler,
};
