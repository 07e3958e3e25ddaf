//! PersistenceDispatcher - fire-and-forget writes to the assessment repository.
//!
//! Navigation never waits on storage. Each write runs as its own Tokio task;
//! failures are logged and forwarded to an optional notification channel
//! but never affect the session that triggered them.
//!
//! Writes of the same answer slot (patient, question) are chained: a write
//! starts only after the previous write of that slot settled, so the last
//! answer given is the one that ends up stored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, PatientId, QuestionId};
use crate::domain::questionnaire::{AssessmentRecord, ResponseEntry};
use crate::ports::AssessmentRepository;

/// Which write failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceOperation {
    /// Per-answer write.
    PutResponse { question_id: QuestionId },
    /// Final record write.
    PutAssessment { assessment_id: AssessmentId },
}

/// Non-blocking notification of a failed write.
#[derive(Debug, Clone)]
pub struct PersistenceFailure {
    /// Patient whose data was not stored.
    pub patient_id: PatientId,
    /// The write that failed.
    pub operation: PersistenceOperation,
    /// Repository error, or a missing-runtime error.
    pub error: DomainError,
}

type ResponseSlot = (PatientId, QuestionId);

/// Spawns repository writes without blocking the caller.
pub struct PersistenceDispatcher {
    repository: Arc<dyn AssessmentRepository>,
    tasks: Mutex<JoinSet<()>>,
    /// Completion signal of the latest write queued per answer slot.
    tails: Mutex<HashMap<ResponseSlot, oneshot::Receiver<()>>>,
    failures: Option<mpsc::UnboundedSender<PersistenceFailure>>,
}

impl PersistenceDispatcher {
    pub fn new(repository: Arc<dyn AssessmentRepository>) -> Self {
        Self {
            repository,
            tasks: Mutex::new(JoinSet::new()),
            tails: Mutex::new(HashMap::new()),
            failures: None,
        }
    }

    /// Forward write failures to `sender` in addition to logging them.
    pub fn with_failure_channel(mut self, sender: mpsc::UnboundedSender<PersistenceFailure>) -> Self {
        self.failures = Some(sender);
        self
    }

    pub fn repository(&self) -> Arc<dyn AssessmentRepository> {
        Arc::clone(&self.repository)
    }

    /// Queue a per-answer write, ordered after earlier writes of the same slot.
    pub fn put_response(&self, patient_id: PatientId, question_id: QuestionId, entry: ResponseEntry) {
        let repository = Arc::clone(&self.repository);
        let operation = PersistenceOperation::PutResponse {
            question_id: question_id.clone(),
        };

        let (done, settled) = oneshot::channel();
        let previous = {
            let mut tails = lock(&self.tails);
            tails.retain(|_, tail| matches!(tail.try_recv(), Err(oneshot::error::TryRecvError::Empty)));
            tails.insert((patient_id.clone(), question_id.clone()), settled)
        };

        self.spawn(patient_id.clone(), operation, async move {
            if let Some(previous) = previous {
                // Closed or sent, either way the previous write is over.
                let _ = previous.await;
            }
            let result = repository.put_response(&patient_id, &question_id, &entry).await;
            let _ = done.send(());
            result
        });
    }

    /// Queue a final record write.
    pub fn put_assessment(&self, record: AssessmentRecord) {
        let repository = Arc::clone(&self.repository);
        let patient_id = record.patient_id().clone();
        let operation = PersistenceOperation::PutAssessment {
            assessment_id: record.assessment_id(),
        };
        self.spawn(patient_id, operation, async move {
            repository
                .put_assessment(record.patient_id(), &record.assessment_id(), &record)
                .await
        });
    }

    /// Wait for every queued write to finish.
    pub async fn flush(&self) {
        let mut tasks = std::mem::replace(&mut *lock(&self.tasks), JoinSet::new());
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Persistence task did not complete");
            }
        }
    }

    /// Number of writes not yet reaped.
    pub fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }

    fn spawn<F>(&self, patient_id: PatientId, operation: PersistenceOperation, write: F)
    where
        F: std::future::Future<Output = Result<(), DomainError>> + Send + 'static,
    {
        let failures = self.failures.clone();

        if Handle::try_current().is_err() {
            let error = DomainError::new(
                ErrorCode::PersistenceWriteFailure,
                "no async runtime available for persistence",
            );
            report_failure(failures.as_ref(), patient_id, operation, error);
            return;
        }

        let mut tasks = lock(&self.tasks);
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            match write.await {
                Ok(()) => debug!(patient_id = %patient_id, operation = ?operation, "Persisted"),
                Err(error) => report_failure(failures.as_ref(), patient_id, operation, error),
            }
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn report_failure(
    failures: Option<&mpsc::UnboundedSender<PersistenceFailure>>,
    patient_id: PatientId,
    operation: PersistenceOperation,
    error: DomainError,
) {
    warn!(
        patient_id = %patient_id,
        operation = ?operation,
        error = %error,
        "Persistence write failed"
    );
    if let Some(sender) = failures {
        let _ = sender.send(PersistenceFailure {
            patient_id,
            operation,
            error,
        });
    }
}
