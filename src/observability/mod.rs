//! # Observability Infrastructure
//!
//! Structured logging for the test-support helpers. Every helper emits
//! `tracing` events; test suites opt into seeing them with
//! [`init_test_logging`].

pub mod logging;

pub use logging::{init_test_logging, sanitize_url, LOG_FILTER_ENV};
