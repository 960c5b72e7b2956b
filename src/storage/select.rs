//! SELECT results captured as JSON so they compare easily in tests.

use crate::errors::{ErrorContext, Result};
use crate::storage::args::{describe_args, SqlArg};
use sqlx::{Executor, Postgres};
use tracing::{debug, Instrument};

/// Body returned when the query produced no rows.
pub const EMPTY_RESULT: &[u8] = b"null";

/// Wrap `sql` in a CTE that aggregates every row into one JSON array,
/// rendered as text by the server.
pub fn wrap_json_agg(sql: &str) -> String {
    format!("WITH t AS (\n    {}\n  ) SELECT json_agg(t)::text FROM t", sql)
}

/// Run a SELECT and return its rows as a JSON array, byte for byte as
/// PostgreSQL renders it.
///
/// Row order and column order follow the query, and numerics keep their full
/// precision. A query producing no rows yields `null` rather than an empty
/// array, since `json_agg` over zero rows is NULL.
///
/// The query must be wrappable in a CTE: no trailing `;`, a single statement.
pub async fn select_json<'c, E>(executor: E, sql: &str, args: &[SqlArg]) -> Result<Vec<u8>>
where
    E: Executor<'c, Database = Postgres>,
{
    let wrapped = wrap_json_agg(sql);
    let span = crate::db_span!("select_json");

    async {
        debug!(sql = %wrapped, args = %describe_args(args), "Selecting rows as JSON");

        let mut query = sqlx::query_scalar::<Postgres, Option<String>>(&wrapped);
        for arg in args {
            query = arg.bind_to(query);
        }

        let aggregated = query.fetch_one(executor).await.with_context(|| {
            format!("failed to SelectJSON\nsql = {}\nargs = {}", wrapped, describe_args(args))
        })?;

        Ok(aggregated.map_or_else(|| EMPTY_RESULT.to_vec(), String::into_bytes))
    }
    .instrument(span)
    .await
}
