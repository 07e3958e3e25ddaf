//! Questionnaire engine error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, ValidationError};

/// Errors raised by the catalog, layout and navigation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionnaireError {
    /// The question catalog could not be loaded or is structurally invalid.
    #[error("Catalog load failed: {0}")]
    CatalogLoadFailure(String),

    /// The condition layout does not fit the catalog.
    #[error("Malformed questionnaire layout: {0}")]
    MalformedLayout(String),

    /// Navigation was requested without the data it needs.
    #[error("Invalid transition at ordinal {ordinal}: {reason}")]
    InvalidTransitionRequest { ordinal: usize, reason: String },

    /// The supplied answer does not match the question's options.
    #[error("Invalid response for '{question}': {reason}")]
    InvalidResponse { question: QuestionId, reason: String },

    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    /// The session already reached a terminal outcome.
    #[error("Session has already terminated")]
    SessionTerminated,

    /// A persistence write failed. Never fatal to navigation.
    #[error("Persistence write failed: {0}")]
    PersistenceWriteFailure(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl QuestionnaireError {
    pub fn catalog(message: impl Into<String>) -> Self {
        QuestionnaireError::CatalogLoadFailure(message.into())
    }

    pub fn layout(message: impl Into<String>) -> Self {
        QuestionnaireError::MalformedLayout(message.into())
    }

    pub fn invalid_transition(ordinal: usize, reason: impl Into<String>) -> Self {
        QuestionnaireError::InvalidTransitionRequest {
            ordinal,
            reason: reason.into(),
        }
    }

    pub fn invalid_response(question: &QuestionId, reason: impl Into<String>) -> Self {
        QuestionnaireError::InvalidResponse {
            question: question.clone(),
            reason: reason.into(),
        }
    }

    /// Returns the coded category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuestionnaireError::CatalogLoadFailure(_) => ErrorCode::CatalogLoadFailure,
            QuestionnaireError::MalformedLayout(_) => ErrorCode::MalformedLayout,
            QuestionnaireError::InvalidTransitionRequest { .. } => {
                ErrorCode::InvalidStateTransition
            }
            QuestionnaireError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            QuestionnaireError::QuestionNotFound(_) => ErrorCode::QuestionNotFound,
            QuestionnaireError::SessionTerminated => ErrorCode::SessionTerminated,
            QuestionnaireError::PersistenceWriteFailure(_) => ErrorCode::PersistenceWriteFailure,
            QuestionnaireError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    /// True for structural errors that prevent a session from starting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QuestionnaireError::CatalogLoadFailure(_) | QuestionnaireError::MalformedLayout(_)
        )
    }
}

impl From<QuestionnaireError> for DomainError {
    fn from(err: QuestionnaireError) -> Self {
        match err {
            QuestionnaireError::Validation(inner) => inner.into(),
            QuestionnaireError::InvalidTransitionRequest { ordinal, .. } => {
                DomainError::new(err.code(), err.to_string())
                    .with_detail("ordinal", ordinal.to_string())
            }
            QuestionnaireError::InvalidResponse { ref question, .. } => {
                DomainError::new(err.code(), err.to_string())
                    .with_detail("question_id", question.as_str())
            }
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}

impl From<DomainError> for QuestionnaireError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::CatalogLoadFailure => QuestionnaireError::CatalogLoadFailure(err.message),
            ErrorCode::MalformedLayout => QuestionnaireError::MalformedLayout(err.message),
            ErrorCode::QuestionNotFound => QuestionnaireError::QuestionNotFound(err.message),
            ErrorCode::SessionTerminated => QuestionnaireError::SessionTerminated,
            _ => QuestionnaireError::PersistenceWriteFailure(err.to_string()),
        }
    }
}
