//! Display progress derived from session state.

use super::layout::QuestionnaireLayout;
use super::session::{AssessmentSession, Phase};
use crate::domain::foundation::Percentage;

/// Share of the bar covered once classification is reached.
const CLASSIFICATION_PERCENT: usize = 75;

/// Stateless progress calculator.
///
/// Screening spreads evenly below 75%, classification sits at 75% and the
/// deep-dive interpolates over the questions actually visible to the
/// patient, so a skipped sub-block never repeats or rewinds the bar.
pub struct ProgressCalculator;

impl ProgressCalculator {
    pub fn progress(session: &AssessmentSession, layout: &QuestionnaireLayout) -> Percentage {
        match session.phase() {
            Phase::NoConditionDiagnosed
            | Phase::SuicidalThoughtsDetected
            | Phase::DiagnosisComplete => Percentage::HUNDRED,
            Phase::Screening => {
                let screening_len = layout.classification.start.max(1);
                let ordinal = session.ordinal().min(screening_len - 1);
                percent(CLASSIFICATION_PERCENT * ordinal / screening_len)
            }
            Phase::ConditionClassification => percent(CLASSIFICATION_PERCENT),
            Phase::SubtypeDeepDive => {
                Self::deep_dive(&session.deep_dive, session.ordinal())
            }
        }
    }

    /// `75 + 25 * pos / (visible - 1)` where `pos` counts visible ordinals.
    pub fn deep_dive(visible: &[usize], ordinal: usize) -> Percentage {
        let span = 100 - CLASSIFICATION_PERCENT;
        let position = visible.iter().position(|o| *o == ordinal).unwrap_or(0);
        let steps = visible.len().saturating_sub(1);
        if steps == 0 {
            return percent(CLASSIFICATION_PERCENT);
        }
        percent(CLASSIFICATION_PERCENT + span * position / steps)
    }
}

fn percent(value: usize) -> Percentage {
    Percentage::new(value.min(100) as u8)
}
