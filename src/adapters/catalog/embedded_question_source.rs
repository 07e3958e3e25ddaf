//! Embedded Question Source - the built-in questionnaire.
//!
//! The catalog is compiled into the binary via `include_str!` and parsed
//! once on first use.

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::questionnaire::QuestionDocument;
use crate::ports::QuestionSource;

static EMBEDDED_QUESTIONS: &str = include_str!("../../../data/questions.json");

static DOCUMENTS: Lazy<Result<Vec<QuestionDocument>, String>> =
    Lazy::new(|| serde_json::from_str(EMBEDDED_QUESTIONS).map_err(|e| e.to_string()));

/// Question source backed by the embedded catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedQuestionSource;

impl EmbeddedQuestionSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuestionSource for EmbeddedQuestionSource {
    async fn get_ordered_questions(&self) -> Result<Vec<QuestionDocument>, DomainError> {
        (*DOCUMENTS).clone().map_err(|e| {
            DomainError::new(
                ErrorCode::CatalogLoadFailure,
                format!("embedded catalog is invalid: {}", e),
            )
        })
    }
}
