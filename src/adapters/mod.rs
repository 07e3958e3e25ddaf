//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the questionnaire engine to external systems:
//! - `catalog` - Question sources (embedded, JSON file)
//! - `memory` - In-memory repository and profile reader
//! - `storage` - YAML file repository

pub mod catalog;
pub mod memory;
pub mod storage;

pub use catalog::{EmbeddedQuestionSource, FileQuestionSource};
pub use memory::{InMemoryAssessmentRepository, InMemoryProfileReader};
pub use storage::FileAssessmentRepository;
