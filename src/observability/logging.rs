//! # Structured Logging
//!
//! Span macros and subscriber setup using the tracing ecosystem.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter for test runs.
pub const LOG_FILTER_ENV: &str = "AGNUS_TESTING_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Create a tracing span for database operations.
///
/// ```rust,ignore
/// let span = db_span!("truncate_tables", table = "users");
/// ```
#[macro_export]
macro_rules! db_span {
    ($operation:expr) => {
        tracing::debug_span!(
            "db_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4(),
            table = tracing::field::Empty
        )
    };
    ($operation:expr, table = $table:expr) => {
        tracing::debug_span!(
            "db_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4(),
            table = %$table
        )
    };
}

/// Install a fmt subscriber writing to the test harness' captured output.
///
/// The filter comes from `AGNUS_TESTING_LOG` (default `warn`). Calling this
/// more than once, or after another subscriber was installed, is a no-op.
pub fn init_test_logging() {
    crate::config::load_dotenv();

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Sanitize a URL for logging (remove credentials and the `key` parameter)
pub fn sanitize_url(raw: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(raw) else {
        return raw.to_string();
    };

    if !parsed.username().is_empty() || parsed.password().is_some() {
        let _ = parsed.set_username("***");
        let _ = parsed.set_password(Some("***"));
    }

    if parsed.query().is_some() {
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| {
                let value = if k == "key" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), value)
            })
            .collect();
        parsed.query_pairs_mut().clear().extend_pairs(pairs);
    }

    parsed.to_string()
}
