//! In-memory adapters for tests, development and the replay runner.

mod in_memory_assessment_repository;
mod in_memory_profile_reader;

pub use in_memory_assessment_repository::InMemoryAssessmentRepository;
pub use in_memory_profile_reader::InMemoryProfileReader;
