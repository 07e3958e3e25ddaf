//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the questionnaire engine and the outside world. Adapters implement these
//! ports.
//!
//! ## Inbound
//!
//! - `QuestionSource` - Raw question documents for the catalog
//! - `PatientProfileReader` - Gender / birth history for skip rules
//!
//! ## Outbound
//!
//! - `AssessmentRepository` - Per-answer writes, final records and history

mod assessment_repository;
mod patient_profile_reader;
mod question_source;

pub use assessment_repository::AssessmentRepository;
pub use patient_profile_reader::PatientProfileReader;
pub use question_source::QuestionSource;
