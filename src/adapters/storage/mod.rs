//! Storage adapters for assessment persistence.
//!
//! Provides file-based YAML storage of answers and assessment records.

mod file_assessment_repository;

pub use file_assessment_repository::FileAssessmentRepository;
