//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine)
//! - `questionnaire` - Question catalog, navigation engine, scoring and diagnosis

pub mod foundation;
pub mod questionnaire;
