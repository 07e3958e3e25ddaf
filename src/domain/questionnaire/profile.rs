//! Read-only patient profile consulted by skip rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Patient gender as recorded by the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Other,
}

/// Whether the patient gave birth recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirthHistory {
    #[serde(alias = "Yes", alias = "YES")]
    Yes,
    #[serde(alias = "No", alias = "NO")]
    No,
    /// Any other recorded answer; treated like missing data.
    #[serde(other)]
    Unknown,
}

/// Profile fields used for skip decisions.
///
/// Every field is optional; absent data never causes a skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Whether the patient gave birth recently.
    #[serde(default, alias = "birthHistory")]
    pub birth_history: Option<BirthHistory>,
}

impl PatientProfile {
    pub fn new(gender: Option<Gender>, birth_history: Option<BirthHistory>) -> Self {
        Self {
            gender,
            birth_history,
        }
    }

    fn has_recent_birth(&self) -> Option<bool> {
        match self.birth_history? {
            BirthHistory::Yes => Some(true),
            BirthHistory::No => Some(false),
            BirthHistory::Unknown => None,
        }
    }
}

/// Condition under which a skip rule removes its sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPredicate {
    /// Male, or female without a recent birth.
    NoRecentBirth,
}

impl SkipPredicate {
    /// Evaluates the predicate. Missing profile data yields `false`.
    pub fn applies(&self, profile: Option<&PatientProfile>) -> bool {
        match self {
            SkipPredicate::NoRecentBirth => {
                let Some(profile) = profile else {
                    warn!(predicate = %self, "Patient profile unavailable, not skipping");
                    return false;
                };
                match (&profile.gender, profile.has_recent_birth()) {
                    (Some(Gender::Male), _) => true,
                    (Some(Gender::Female), Some(recent)) => !recent,
                    (Some(Gender::Female), None) => {
                        warn!(predicate = %self, "Birth history missing, not skipping");
                        false
                    }
                    (Some(Gender::Other), _) => false,
                    (None, _) => {
                        warn!(predicate = %self, "Gender missing, not skipping");
                        false
                    }
                }
            }
        }
    }
}

impl fmt::Display for SkipPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipPredicate::NoRecentBirth => write!(f, "no_recent_birth"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_profiles_skip() {
        let profile = PatientProfile::new(Some(Gender::Male), None);
        assert!(SkipPredicate::NoRecentBirth.applies(Some(&profile)));
    }

    #[test]
    fn female_without_recent_birth_skips() {
        let profile = PatientProfile::new(Some(Gender::Female), Some(BirthHistory::No));
        assert!(SkipPredicate::NoRecentBirth.applies(Some(&profile)));
    }

    #[test]
    fn female_with_recent_birth_does_not_skip() {
        let profile = PatientProfile::new(Some(Gender::Female), Some(BirthHistory::Yes));
        assert!(!SkipPredicate::NoRecentBirth.applies(Some(&profile)));
    }

    #[test]
    fn missing_data_does_not_skip() {
        assert!(!SkipPredicate::NoRecentBirth.applies(None));
        assert!(!SkipPredicate::NoRecentBirth.applies(Some(&PatientProfile::default())));
        let female = PatientProfile::new(Some(Gender::Female), None);
        assert!(!SkipPredicate::NoRecentBirth.applies(Some(&female)));
    }

    #[test]
    fn birth_history_parses_case_variants_and_unknown_values() {
        let yes: PatientProfile =
            serde_json::from_str(r#"{"gender":"female","birthHistory":"Yes"}"#).unwrap();
        assert_eq!(yes.birth_history, Some(BirthHistory::Yes));
        assert!(!SkipPredicate::NoRecentBirth.applies(Some(&yes)));

        let unsure: PatientProfile =
            serde_yaml::from_str("gender: female\nbirth_history: unsure\n").unwrap();
        assert_eq!(unsure.birth_history, Some(BirthHistory::Unknown));
        assert!(!SkipPredicate::NoRecentBirth.applies(Some(&unsure)));
    }

    #[test]
    fn unrecognised_gender_deserializes_as_other() {
        let profile: PatientProfile =
            serde_json::from_str(r#"{"gender":"nonbinary","birthHistory":"no"}"#).unwrap();
        assert_eq!(profile.gender, Some(Gender::Other));
        assert!(!SkipPredicate::NoRecentBirth.applies(Some(&profile)));
    }
}
