//! Navigation engine configuration

use serde::Deserialize;

/// Engine behaviour switches
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Undo a deep-dive answer's score when the patient goes back over it
    #[serde(default = "default_rollback")]
    pub rollback_scores_on_back: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rollback_scores_on_back: default_rollback(),
        }
    }
}

fn default_rollback() -> bool {
    true
}
