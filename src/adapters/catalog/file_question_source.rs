//! File Question Source - catalog documents read from a JSON file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::questionnaire::QuestionDocument;
use crate::ports::QuestionSource;

/// Question source reading a JSON array of question documents.
#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn get_ordered_questions(&self) -> Result<Vec<QuestionDocument>, DomainError> {
        let json = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::new(ErrorCode::CatalogLoadFailure, e.to_string())
                .with_detail("path", self.path.display().to_string())
        })?;

        serde_json::from_str(&json).map_err(|e| {
            DomainError::new(ErrorCode::CatalogLoadFailure, e.to_string())
                .with_detail("path", self.path.display().to_string())
        })
    }
}
