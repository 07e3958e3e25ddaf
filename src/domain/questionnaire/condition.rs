//! Condition enum for the top-level classification vote.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Top-level mental-health condition detected by the classification phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Stress,
    Anxiety,
    Depression,
    Trauma,
    #[serde(rename = "OCD")]
    Ocd,
}

impl Condition {
    /// Canonical priority order, used to break tied votes.
    pub const ORDER: [Condition; 5] = [
        Condition::Stress,
        Condition::Anxiety,
        Condition::Depression,
        Condition::Trauma,
        Condition::Ocd,
    ];

    /// Returns all conditions in canonical order.
    pub fn all() -> &'static [Condition] {
        &Self::ORDER
    }

    /// Position in the canonical order; lower wins a tie.
    pub fn priority(&self) -> usize {
        match self {
            Condition::Stress => 0,
            Condition::Anxiety => 1,
            Condition::Depression => 2,
            Condition::Trauma => 3,
            Condition::Ocd => 4,
        }
    }

    /// Option value a classification question uses for this condition.
    pub fn option_value(&self) -> &'static str {
        match self {
            Condition::Stress => "Stress",
            Condition::Anxiety => "Anxiety",
            Condition::Depression => "Depression",
            Condition::Trauma => "Trauma",
            Condition::Ocd => "OCD",
        }
    }

    /// Parses a classification option value. Returns `None` for anything else.
    pub fn from_option_value(value: &str) -> Option<Condition> {
        Self::ORDER
            .iter()
            .copied()
            .find(|c| c.option_value() == value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.option_value())
    }
}

impl FromStr for Condition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_option_value(s).ok_or_else(|| {
            ValidationError::invalid_format("condition", format!("unknown condition '{}'", s))
        })
    }
}
