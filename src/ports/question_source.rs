//! QuestionSource port - where catalog documents come from.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::questionnaire::QuestionDocument;

/// Supplies the raw question documents of the questionnaire.
///
/// Called once per session start. Ordering is done by the catalog, so
/// implementations may return documents in any order.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Returns every question document.
    ///
    /// # Errors
    ///
    /// - `CatalogLoadFailure` when the source cannot be read or parsed
    async fn get_ordered_questions(&self) -> Result<Vec<QuestionDocument>, DomainError>;
}
