//! # Error Handling
//!
//! Error types shared by the database, golden-file and authentication helpers.

pub mod types;

pub use types::{ErrorContext, Result, TestingError};
