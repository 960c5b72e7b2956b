//! # agnus-testing
//!
//! Test-support helpers for agnus-server suites:
//!
//! - [`storage`]: run a SELECT and capture it as JSON, disable/enable triggers,
//!   truncate tables and bulk-load JSON rows into PostgreSQL.
//! - [`golden`]: read and write golden files keyed by test name.
//! - [`auth`]: log a test user in against the Firebase identity toolkit.
//!
//! The database helpers return [`TestingError`]s carrying the statement and
//! data involved. The golden and login conveniences panic instead, failing the
//! running test on the spot.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use agnus_testing::{golden, sql_args, storage};
//!
//! # async fn example(pool: sqlx::PgPool) -> agnus_testing::Result<()> {
//! storage::truncate_tables(&pool, &["users"]).await?;
//! let sql = "SELECT * FROM users WHERE id = $1";
//! let users = storage::select_json(&pool, sql, &sql_args![1]).await?;
//! assert_eq!(users, golden::get("select_user"));
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod errors;
pub mod golden;
pub mod observability;
pub mod storage;

// Re-export commonly used types and traits
pub use config::{AuthConfig, GoldenConfig};
pub use errors::{ErrorContext, Result, TestingError};
pub use observability::init_test_logging;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
