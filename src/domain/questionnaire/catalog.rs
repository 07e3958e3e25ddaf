//! Ordered, immutable question catalog.

use std::collections::HashMap;

use super::errors::QuestionnaireError;
use super::question::{Question, QuestionDocument};
use crate::domain::foundation::QuestionId;

/// The full ordered question sequence of a questionnaire.
///
/// Ordinal lookup is a direct index; lookup by id goes through a secondary
/// map and is never used for navigation.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    by_id: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    /// Builds the catalog from raw documents, sorted by `position`.
    ///
    /// Positions must run 1..=n without gaps or duplicates.
    pub fn load(mut documents: Vec<QuestionDocument>) -> Result<Self, QuestionnaireError> {
        if documents.is_empty() {
            return Err(QuestionnaireError::catalog("question source returned no questions"));
        }

        documents.sort_by_key(|d| d.position);

        let mut questions = Vec::with_capacity(documents.len());
        let mut by_id = HashMap::with_capacity(documents.len());

        for (ordinal, doc) in documents.into_iter().enumerate() {
            let expected = ordinal as u32 + 1;
            if doc.position != expected {
                let reason = if doc.position < expected {
                    "duplicated"
                } else {
                    "non-contiguous"
                };
                return Err(QuestionnaireError::catalog(format!(
                    "position {} of '{}' is {}, expected {}",
                    doc.position, doc.id, reason, expected
                )));
            }

            let question = Question::from_document(ordinal, doc)?;
            if by_id.insert(question.id().clone(), ordinal).is_some() {
                return Err(QuestionnaireError::catalog(format!(
                    "question id '{}' appears more than once",
                    question.id()
                )));
            }
            questions.push(question);
        }

        Ok(Self { questions, by_id })
    }

    /// Question at the given ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&Question> {
        self.questions.get(ordinal)
    }

    /// Question at the given ordinal, or `QuestionNotFound`.
    pub fn require(&self, ordinal: usize) -> Result<&Question, QuestionnaireError> {
        self.get(ordinal).ok_or_else(|| {
            QuestionnaireError::QuestionNotFound(format!("no question at ordinal {}", ordinal))
        })
    }

    pub fn by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.by_id.get(id).and_then(|&ordinal| self.questions.get(ordinal))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn last_ordinal(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
