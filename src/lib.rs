//! TheraMind Questionnaire - Adaptive diagnostic questionnaire engine
//!
//! Walks a patient through screening, condition classification and a
//! condition-specific deep-dive, then resolves a diagnosed subtype.
//! Answers and final records are written through ports without blocking
//! navigation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod replay;
pub mod telemetry;
