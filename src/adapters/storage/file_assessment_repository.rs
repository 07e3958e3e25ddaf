//! File-based Assessment Repository
//!
//! Stores answers and assessment records as YAML files on disk,
//! organized by patient for easy inspection.
//!
//! ```text
//! <base>/<patient>/responses/<question_id>.yaml
//! <base>/<patient>/assessments/<assessment_id>.yaml
//! ```
//!
//! Patient and question ids are escaped into path segments one-to-one, so
//! distinct ids never share a file and no id can name `.` or `..`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, PatientId, QuestionId};
use crate::domain::questionnaire::{AssessmentRecord, ResponseEntry};
use crate::ports::AssessmentRepository;

/// File-based storage for answers and records
#[derive(Debug, Clone)]
pub struct FileAssessmentRepository {
    base_path: PathBuf,
}

impl FileAssessmentRepository {
    /// Create a new file repository rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileAssessmentRepository::new("./data/assessments");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Directory of one patient.
    fn patient_dir(&self, patient_id: &PatientId) -> PathBuf {
        self.base_path.join(path_segment(patient_id.as_str()))
    }

    fn responses_dir(&self, patient_id: &PatientId) -> PathBuf {
        self.patient_dir(patient_id).join("responses")
    }

    fn assessments_dir(&self, patient_id: &PatientId) -> PathBuf {
        self.patient_dir(patient_id).join("assessments")
    }

    fn response_file_path(&self, patient_id: &PatientId, question_id: &QuestionId) -> PathBuf {
        self.responses_dir(patient_id)
            .join(format!("{}.yaml", path_segment(question_id.as_str())))
    }

    fn assessment_file_path(&self, patient_id: &PatientId, assessment_id: &AssessmentId) -> PathBuf {
        self.assessments_dir(patient_id)
            .join(format!("{}.yaml", assessment_id))
    }

    /// Ensure directory exists
    async fn ensure_dir(&self, path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(path).await.map_err(write_failure)
    }

    /// Stored answer for a patient's question
    pub async fn load_response(
        &self,
        patient_id: &PatientId,
        question_id: &QuestionId,
    ) -> Result<Option<ResponseEntry>, DomainError> {
        let path = self.response_file_path(patient_id, question_id);
        if !path.exists() {
            return Ok(None);
        }
        let yaml = fs::read_to_string(&path).await.map_err(read_failure)?;
        let entry = serde_yaml::from_str(&yaml).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, e.to_string())
                .with_detail("path", path.display().to_string())
        })?;
        Ok(Some(entry))
    }
}

#[async_trait]
impl AssessmentRepository for FileAssessmentRepository {
    async fn put_response(
        &self,
        patient_id: &PatientId,
        question_id: &QuestionId,
        entry: &ResponseEntry,
    ) -> Result<(), DomainError> {
        let dir = self.responses_dir(patient_id);
        self.ensure_dir(&dir).await?;

        let yaml = serde_yaml::to_string(entry).map_err(write_failure)?;
        fs::write(self.response_file_path(patient_id, question_id), yaml)
            .await
            .map_err(write_failure)?;

        Ok(())
    }

    async fn put_assessment(
        &self,
        patient_id: &PatientId,
        assessment_id: &AssessmentId,
        record: &AssessmentRecord,
    ) -> Result<(), DomainError> {
        let dir = self.assessments_dir(patient_id);
        self.ensure_dir(&dir).await?;

        let yaml = serde_yaml::to_string(record).map_err(write_failure)?;
        let file_path = self.assessment_file_path(patient_id, assessment_id);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => DomainError::new(
                    ErrorCode::PersistenceWriteFailure,
                    format!("assessment {} already stored", assessment_id),
                )
                .with_detail("assessment_id", assessment_id.to_string()),
                _ => write_failure(e),
            })?;
        file.write_all(yaml.as_bytes()).await.map_err(write_failure)?;
        file.flush().await.map_err(write_failure)?;

        Ok(())
    }

    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        let dir = self.assessments_dir(patient_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut entries = fs::read_dir(&dir).await.map_err(read_failure)?;
        while let Some(entry) = entries.next_entry().await.map_err(read_failure)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let yaml = fs::read_to_string(&path).await.map_err(read_failure)?;
            match serde_yaml::from_str::<AssessmentRecord>(&yaml) {
                Ok(record) if record.patient_id() == patient_id => records.push(record),
                Ok(record) => {
                    warn!(
                        path = %path.display(),
                        owner = %record.patient_id(),
                        "Skipping assessment record of another patient"
                    );
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable assessment record");
                }
            }
        }

        records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        Ok(records)
    }
}

/// Escapes an id into a single path segment.
///
/// Alphanumerics, `-`, `@` and non-leading `.` are kept; every other byte,
/// including `_` itself, becomes `_xx` (lowercase hex).
fn path_segment(raw: &str) -> String {
    let mut segment = String::with_capacity(raw.len());
    for (i, byte) in raw.bytes().enumerate() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'@' => segment.push(char::from(byte)),
            b'.' if i > 0 => segment.push('.'),
            _ => segment.push_str(&format!("_{:02x}", byte)),
        }
    }
    segment
}

fn write_failure(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::PersistenceWriteFailure, err.to_string())
}

fn read_failure(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}
