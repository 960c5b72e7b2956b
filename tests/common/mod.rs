//! Common test utilities for all integration tests.
//!
//! Provides the shared PostgreSQL test database and schema fixtures.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

pub mod test_db;
