//! # Database Helpers
//!
//! Query, reset and seed helpers for PostgreSQL-backed tests. Each helper
//! takes a live handle (pool, connection or transaction) and returns
//! errors annotated with the statement, arguments or records involved.

pub mod args;
pub mod copy;
pub mod maintenance;
pub mod select;

pub use args::{NullKind, SqlArg, SqlType};
pub use copy::{copy_from, Record};
pub use maintenance::{disable_triggers, enable_triggers, truncate_tables};
pub use select::select_json;
