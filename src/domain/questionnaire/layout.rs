//! Ordinal layout of a questionnaire.
//!
//! Screening checks, the classification span and per-condition deep-dive
//! ranges (with their skip rules) are configuration data validated against
//! the catalog before any session starts.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::condition::Condition;
use super::errors::QuestionnaireError;
use super::profile::{PatientProfile, SkipPredicate};

static EMBEDDED_LAYOUT: &str = include_str!("../../../data/layout.yaml");

static DEFAULT_LAYOUT: Lazy<Result<QuestionnaireLayout, QuestionnaireError>> =
    Lazy::new(|| QuestionnaireLayout::from_yaml(EMBEDDED_LAYOUT));

// ─────────────────────────────────────────────────────────────────────────────
// Layout data
// ─────────────────────────────────────────────────────────────────────────────

/// A designated answer value at a fixed ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningCheck {
    pub ordinal: usize,
    pub value: String,
}

/// Early-exit checks of the screening phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningLayout {
    /// "None of the above" selection.
    pub none_selected: ScreeningCheck,
    pub no_symptoms: ScreeningCheck,
    /// Affirmative suicidal-ideation answer.
    pub suicidal_ideation: ScreeningCheck,
}

/// Inclusive ordinal span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalSpan {
    pub start: usize,
    pub end: usize,
}

impl OrdinalSpan {
    pub fn contains(&self, ordinal: usize) -> bool {
        (self.start..=self.end).contains(&ordinal)
    }

    pub fn ordinals(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

/// Sub-block removed from a deep-dive when its predicate holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRule {
    pub predicate: SkipPredicate,
    pub start: usize,
    pub end: usize,
}

impl SkipRule {
    pub fn span(&self) -> OrdinalSpan {
        OrdinalSpan {
            start: self.start,
            end: self.end,
        }
    }
}

/// Deep-dive block of one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRange {
    pub condition: Condition,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub skip_rules: Vec<SkipRule>,
}

impl ConditionRange {
    pub fn span(&self) -> OrdinalSpan {
        OrdinalSpan {
            start: self.start,
            end: self.end,
        }
    }

    pub fn contains(&self, ordinal: usize) -> bool {
        self.span().contains(ordinal)
    }

    /// Ordinals of the block a patient will actually see, in order.
    pub fn visible_ordinals(&self, profile: Option<&PatientProfile>) -> Vec<usize> {
        let skipped: Vec<OrdinalSpan> = self
            .skip_rules
            .iter()
            .filter(|rule| rule.predicate.applies(profile))
            .map(SkipRule::span)
            .collect();

        self.span()
            .ordinals()
            .filter(|ordinal| !skipped.iter().any(|span| span.contains(*ordinal)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireLayout {
    pub screening: ScreeningLayout,
    pub classification: OrdinalSpan,
    pub conditions: Vec<ConditionRange>,
}

impl QuestionnaireLayout {
    /// Layout of the embedded questionnaire.
    pub fn embedded() -> Result<Self, QuestionnaireError> {
        (*DEFAULT_LAYOUT).clone()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, QuestionnaireError> {
        serde_yaml::from_str(yaml).map_err(|e| QuestionnaireError::layout(e.to_string()))
    }

    pub fn range_for(&self, condition: Condition) -> Option<&ConditionRange> {
        self.conditions.iter().find(|r| r.condition == condition)
    }

    /// Range containing the ordinal, if it lies in any deep-dive block.
    pub fn range_containing(&self, ordinal: usize) -> Option<&ConditionRange> {
        self.conditions.iter().find(|r| r.contains(ordinal))
    }

    /// Deep-dive questions are the only scorable ones.
    pub fn is_scorable(&self, ordinal: usize) -> bool {
        self.range_containing(ordinal).is_some()
    }

    /// Checks the layout against the catalog it will drive.
    pub fn validate(&self, catalog: &QuestionCatalog) -> Result<(), QuestionnaireError> {
        let last = catalog.last_ordinal();
        self.validate_screening(catalog)?;
        self.validate_classification(catalog)?;

        for condition in Condition::all() {
            match self
                .conditions
                .iter()
                .filter(|r| r.condition == *condition)
                .count()
            {
                1 => {}
                0 => {
                    return Err(QuestionnaireError::layout(format!(
                        "no range for condition {}",
                        condition
                    )))
                }
                _ => {
                    return Err(QuestionnaireError::layout(format!(
                        "condition {} has more than one range",
                        condition
                    )))
                }
            }
        }

        let mut ranges: Vec<&ConditionRange> = self.conditions.iter().collect();
        ranges.sort_by_key(|r| r.start);

        for range in &ranges {
            if range.start > range.end || range.end > last {
                return Err(QuestionnaireError::layout(format!(
                    "range {}..={} of {} is out of range (last ordinal {})",
                    range.start, range.end, range.condition, last
                )));
            }
            if range.start <= self.classification.end {
                return Err(QuestionnaireError::layout(format!(
                    "range of {} starts inside the screening or classification phase",
                    range.condition
                )));
            }
            self.validate_skip_rules(range)?;
        }

        for pair in ranges.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(QuestionnaireError::layout(format!(
                    "ranges of {} and {} overlap",
                    pair[0].condition, pair[1].condition
                )));
            }
        }

        Ok(())
    }

    fn validate_screening(&self, catalog: &QuestionCatalog) -> Result<(), QuestionnaireError> {
        let checks = [
            ("none_selected", &self.screening.none_selected),
            ("no_symptoms", &self.screening.no_symptoms),
            ("suicidal_ideation", &self.screening.suicidal_ideation),
        ];
        for (name, check) in checks {
            if check.ordinal >= self.classification.start {
                return Err(QuestionnaireError::layout(format!(
                    "screening check {} at ordinal {} is not before classification",
                    name, check.ordinal
                )));
            }
            let question = catalog.get(check.ordinal).ok_or_else(|| {
                QuestionnaireError::layout(format!(
                    "screening check {} points at missing ordinal {}",
                    name, check.ordinal
                ))
            })?;
            if !question.option_values().contains(&check.value.as_str()) {
                return Err(QuestionnaireError::layout(format!(
                    "question '{}' does not offer designated value '{}'",
                    question.id(),
                    check.value
                )));
            }
        }
        Ok(())
    }

    fn validate_classification(&self, catalog: &QuestionCatalog) -> Result<(), QuestionnaireError> {
        let span = self.classification;
        if span.start > span.end || span.end > catalog.last_ordinal() {
            return Err(QuestionnaireError::layout(format!(
                "classification span {}..={} is out of range",
                span.start, span.end
            )));
        }
        for ordinal in span.ordinals() {
            let question = catalog.require(ordinal)?;
            if let Some(value) = question
                .option_values()
                .into_iter()
                .find(|v| Condition::from_option_value(v).is_none())
            {
                return Err(QuestionnaireError::catalog(format!(
                    "classification question '{}' offers non-condition value '{}'",
                    question.id(),
                    value
                )));
            }
        }
        Ok(())
    }

    fn validate_skip_rules(&self, range: &ConditionRange) -> Result<(), QuestionnaireError> {
        for rule in &range.skip_rules {
            if rule.start > rule.end || rule.start < range.start || rule.end > range.end {
                return Err(QuestionnaireError::layout(format!(
                    "skip rule {}..={} lies outside the {} range",
                    rule.start, rule.end, range.condition
                )));
            }
            if rule.start == range.start && rule.end == range.end {
                return Err(QuestionnaireError::layout(format!(
                    "skip rule would hide the whole {} range",
                    range.condition
                )));
            }
        }
        if range.skip_rules.len() > 1 {
            // Combined rules must still leave at least one ordinal visible.
            let hidden = range
                .span()
                .ordinals()
                .filter(|o| range.skip_rules.iter().any(|r| r.span().contains(*o)))
                .count();
            if hidden == range.end - range.start + 1 {
                return Err(QuestionnaireError::layout(format!(
                    "skip rules would hide the whole {} range",
                    range.condition
                )));
            }
        }
        Ok(())
    }
}
