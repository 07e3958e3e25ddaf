//! Question definitions and the responses they accept.
//!
//! Raw catalog documents are loosely shaped (optional `kind`, optional
//! `subquestions`). They are resolved once into the tagged [`QuestionKind`]
//! so navigation never has to inspect document shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::errors::QuestionnaireError;
use crate::domain::foundation::QuestionId;

// ─────────────────────────────────────────────────────────────────────────────
// Raw documents
// ─────────────────────────────────────────────────────────────────────────────

/// Question as stored by the question source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub id: String,
    /// 1-based ordering field.
    pub position: u32,
    pub prompt: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subquestions: Vec<SubQuestionDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    SingleChoice,
    MultiChoice,
    Composite,
}

/// Single-choice member of a composite question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestionDocument {
    pub id: String,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

/// A selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl AnswerOption {
    /// Explicit score, or the default for options without one.
    pub fn score_or(&self, default: u32) -> u32 {
        self.score.unwrap_or(default)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved questions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

/// Resolved question shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice { options: Vec<AnswerOption> },
    MultiChoice { options: Vec<AnswerOption> },
    Composite { subquestions: Vec<SubQuestion> },
}

/// An immutable catalog question addressed by its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    ordinal: usize,
    id: QuestionId,
    prompt: String,
    category: String,
    kind: QuestionKind,
}

impl Question {
    /// Resolves a raw document into a question at the given ordinal.
    pub fn from_document(
        ordinal: usize,
        doc: QuestionDocument,
    ) -> Result<Self, QuestionnaireError> {
        let id = QuestionId::new(doc.id.clone())
            .map_err(|e| QuestionnaireError::catalog(e.to_string()))?;

        let kind = match (doc.kind, doc.subquestions.is_empty()) {
            (Some(DocumentKind::Composite), _) | (None, false) => {
                if doc.subquestions.is_empty() {
                    return Err(QuestionnaireError::catalog(format!(
                        "composite question '{}' has no subquestions",
                        doc.id
                    )));
                }
                let subquestions = doc
                    .subquestions
                    .into_iter()
                    .map(|sub| SubQuestion {
                        id: sub.id,
                        prompt: sub.prompt,
                        options: sub.options,
                    })
                    .collect::<Vec<_>>();
                if let Some(empty) = subquestions.iter().find(|s| s.options.is_empty()) {
                    return Err(QuestionnaireError::catalog(format!(
                        "subquestion '{}' of '{}' has no options",
                        empty.id, doc.id
                    )));
                }
                QuestionKind::Composite { subquestions }
            }
            (Some(DocumentKind::MultiChoice), _) => QuestionKind::MultiChoice {
                options: non_empty_options(&doc.id, doc.options)?,
            },
            (Some(DocumentKind::SingleChoice), _) | (None, true) => QuestionKind::SingleChoice {
                options: non_empty_options(&doc.id, doc.options)?,
            },
        };

        Ok(Self {
            ordinal,
            id,
            prompt: doc.prompt,
            category: doc.category,
            kind,
        })
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Score category the question contributes to.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// All option values offered anywhere in the question.
    pub fn option_values(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                options.iter().map(|o| o.value.as_str()).collect()
            }
            QuestionKind::Composite { subquestions } => subquestions
                .iter()
                .flat_map(|s| s.options.iter().map(|o| o.value.as_str()))
                .collect(),
        }
    }

    /// Checks that a response fits this question's shape and options.
    pub fn validate_response(&self, response: &ResponseValue) -> Result<(), QuestionnaireError> {
        match (&self.kind, response) {
            (QuestionKind::SingleChoice { options }, ResponseValue::Single(value)) => {
                find_option(options, value)
                    .map(|_| ())
                    .ok_or_else(|| self.unknown_option(value))
            }
            (QuestionKind::MultiChoice { options }, ResponseValue::Multi(values)) => {
                if values.is_empty() {
                    return Err(QuestionnaireError::invalid_response(
                        &self.id,
                        "at least one option must be selected",
                    ));
                }
                for value in values {
                    find_option(options, value).ok_or_else(|| self.unknown_option(value))?;
                }
                Ok(())
            }
            // A single selection is accepted for a multi-choice question.
            (QuestionKind::MultiChoice { options }, ResponseValue::Single(value)) => {
                find_option(options, value)
                    .map(|_| ())
                    .ok_or_else(|| self.unknown_option(value))
            }
            (QuestionKind::Composite { subquestions }, ResponseValue::Composite(answers)) => {
                for sub in subquestions {
                    let value = answers.get(&sub.id).ok_or_else(|| {
                        QuestionnaireError::invalid_response(
                            &self.id,
                            format!("missing answer for subquestion '{}'", sub.id),
                        )
                    })?;
                    find_option(&sub.options, value).ok_or_else(|| self.unknown_option(value))?;
                }
                if let Some(extra) = answers
                    .keys()
                    .find(|k| !subquestions.iter().any(|s| &s.id == *k))
                {
                    return Err(QuestionnaireError::invalid_response(
                        &self.id,
                        format!("unknown subquestion '{}'", extra),
                    ));
                }
                Ok(())
            }
            (kind, _) => Err(QuestionnaireError::invalid_response(
                &self.id,
                format!("response shape does not match {}", kind_name(kind)),
            )),
        }
    }

    /// Score contributed by a (validated) response.
    ///
    /// Options without an explicit score count 1 when the question is
    /// scorable and 0 otherwise. Multi-choice sums selected options and
    /// composite questions sum their subquestions.
    pub fn score_of(&self, response: &ResponseValue, scorable: bool) -> u32 {
        let default = u32::from(scorable);
        match (&self.kind, response) {
            (QuestionKind::SingleChoice { options }, ResponseValue::Single(value))
            | (QuestionKind::MultiChoice { options }, ResponseValue::Single(value)) => {
                option_score(options, value, default)
            }
            (QuestionKind::MultiChoice { options }, ResponseValue::Multi(values)) => values
                .iter()
                .map(|v| option_score(options, v, default))
                .sum(),
            (QuestionKind::Composite { subquestions }, ResponseValue::Composite(answers)) => {
                subquestions
                    .iter()
                    .filter_map(|s| answers.get(&s.id).map(|v| option_score(&s.options, v, default)))
                    .sum()
            }
            _ => 0,
        }
    }

    fn unknown_option(&self, value: &str) -> QuestionnaireError {
        QuestionnaireError::invalid_response(&self.id, format!("'{}' is not an option", value))
    }
}

fn non_empty_options(
    id: &str,
    options: Vec<AnswerOption>,
) -> Result<Vec<AnswerOption>, QuestionnaireError> {
    if options.is_empty() {
        return Err(QuestionnaireError::catalog(format!(
            "question '{}' has no options",
            id
        )));
    }
    Ok(options)
}

fn find_option<'a>(options: &'a [AnswerOption], value: &str) -> Option<&'a AnswerOption> {
    options.iter().find(|o| o.value == value)
}

fn option_score(options: &[AnswerOption], value: &str, default: u32) -> u32 {
    find_option(options, value)
        .map(|o| o.score_or(default))
        .unwrap_or(0)
}

fn kind_name(kind: &QuestionKind) -> &'static str {
    match kind {
        QuestionKind::SingleChoice { .. } => "a single-choice question",
        QuestionKind::MultiChoice { .. } => "a multi-choice question",
        QuestionKind::Composite { .. } => "a composite question",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Selected option value(s) for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Single(String),
    Multi(Vec<String>),
    /// Subquestion id to selected value.
    Composite(IndexMap<String, String>),
}

impl ResponseValue {
    pub fn single(value: impl Into<String>) -> Self {
        ResponseValue::Single(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResponseValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// True if the response selected `value` anywhere.
    pub fn contains(&self, value: &str) -> bool {
        match self {
            ResponseValue::Single(v) => v == value,
            ResponseValue::Multi(values) => values.iter().any(|v| v == value),
            ResponseValue::Composite(answers) => answers.values().any(|v| v == value),
        }
    }

    /// Returns the value of a single selection.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ResponseValue::Single(v) => Some(v.as_str()),
            ResponseValue::Multi(values) if values.len() == 1 => Some(values[0].as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: &str, score: Option<u32>) -> AnswerOption {
        AnswerOption {
            value: value.to_string(),
            label: value.to_uppercase(),
            score,
        }
    }

    fn doc(kind: Option<DocumentKind>, options: Vec<AnswerOption>) -> QuestionDocument {
        QuestionDocument {
            id: "question8".to_string(),
            position: 8,
            prompt: "How often do you check locks?".to_string(),
            category: "Checking OCD".to_string(),
            kind,
            options,
            subquestions: vec![],
        }
    }

    fn composite() -> Question {
        let mut d = doc(Some(DocumentKind::Composite), vec![]);
        d.subquestions = vec![
            SubQuestionDocument {
                id: "a".into(),
                prompt: "A".into(),
                options: vec![option("low", Some(0)), option("high", Some(3))],
            },
            SubQuestionDocument {
                id: "b".into(),
                prompt: "B".into(),
                options: vec![option("low", Some(1)), option("high", Some(2))],
            },
        ];
        Question::from_document(7, d).unwrap()
    }

    #[test]
    fn missing_kind_resolves_to_single_choice() {
        let q = Question::from_document(7, doc(None, vec![option("never", Some(0))])).unwrap();
        assert!(matches!(q.kind(), QuestionKind::SingleChoice { .. }));
        assert_eq!(q.ordinal(), 7);
    }

    #[test]
    fn subquestions_without_kind_resolve_to_composite() {
        let mut d = doc(None, vec![]);
        d.subquestions = vec![SubQuestionDocument {
            id: "a".into(),
            prompt: "A".into(),
            options: vec![option("x", None)],
        }];
        let q = Question::from_document(0, d).unwrap();
        assert!(matches!(q.kind(), QuestionKind::Composite { .. }));
    }

    #[test]
    fn question_without_options_fails_to_load() {
        let err = Question::from_document(0, doc(None, vec![])).unwrap_err();
        assert!(matches!(err, QuestionnaireError::CatalogLoadFailure(_)));
    }

    #[test]
    fn single_choice_rejects_unknown_option_and_wrong_shape() {
        let q = Question::from_document(7, doc(None, vec![option("never", Some(0))])).unwrap();
        assert!(q.validate_response(&ResponseValue::single("never")).is_ok());
        assert!(matches!(
            q.validate_response(&ResponseValue::single("always")),
            Err(QuestionnaireError::InvalidResponse { .. })
        ));
        assert!(q
            .validate_response(&ResponseValue::multi(["never", "never"]))
            .is_err());
    }

    #[test]
    fn multi_choice_requires_a_selection() {
        let q = Question::from_document(
            0,
            doc(
                Some(DocumentKind::MultiChoice),
                vec![option("none", None), option("flashbacks", None)],
            ),
        )
        .unwrap();
        assert!(q.validate_response(&ResponseValue::Multi(vec![])).is_err());
        assert!(q
            .validate_response(&ResponseValue::multi(["none", "flashbacks"]))
            .is_ok());
    }

    #[test]
    fn composite_requires_every_subquestion() {
        let q = composite();
        let mut answers = IndexMap::new();
        answers.insert("a".to_string(), "high".to_string());
        assert!(q
            .validate_response(&ResponseValue::Composite(answers.clone()))
            .is_err());
        answers.insert("b".to_string(), "low".to_string());
        assert!(q.validate_response(&ResponseValue::Composite(answers)).is_ok());
    }

    #[test]
    fn scores_default_by_scorability() {
        let q = Question::from_document(7, doc(None, vec![option("yes", None), option("no", Some(0))]))
            .unwrap();
        assert_eq!(q.score_of(&ResponseValue::single("yes"), true), 1);
        assert_eq!(q.score_of(&ResponseValue::single("yes"), false), 0);
        assert_eq!(q.score_of(&ResponseValue::single("no"), true), 0);
    }

    #[test]
    fn composite_sums_subquestion_scores() {
        let q = composite();
        let mut answers = IndexMap::new();
        answers.insert("a".to_string(), "high".to_string());
        answers.insert("b".to_string(), "high".to_string());
        assert_eq!(q.score_of(&ResponseValue::Composite(answers), true), 5);
    }

    #[test]
    fn response_value_deserializes_untagged() {
        let single: ResponseValue = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(single, ResponseValue::single("none"));
        let multi: ResponseValue = serde_json::from_str("[\"none\",\"x\"]").unwrap();
        assert!(multi.contains("none"));
        assert_eq!(multi.as_single(), None);
    }
}
