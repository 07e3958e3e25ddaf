//! Question source adapters.
//!
//! - **EmbeddedQuestionSource** - Catalog compiled into the binary
//! - **FileQuestionSource** - Catalog read from a JSON file

mod embedded_question_source;
mod file_question_source;

pub use embedded_question_source::EmbeddedQuestionSource;
pub use file_question_source::FileQuestionSource;
