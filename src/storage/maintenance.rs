//! Trigger toggling and truncation for resetting tables between tests.
//!
//! WARNING: these statements remove referential-integrity enforcement or
//! delete data outright. Point the connection at a local, disposable database.

use crate::errors::{ErrorContext, Result};
use sqlx::{Acquire, Postgres};
use tracing::{debug, Instrument};

/// `ALTER TABLE <table> DISABLE TRIGGER ALL`
pub fn disable_triggers_sql(table: &str) -> String {
    format!("ALTER TABLE {} DISABLE TRIGGER ALL", table)
}

/// `ALTER TABLE <table> ENABLE TRIGGER ALL`
pub fn enable_triggers_sql(table: &str) -> String {
    format!("ALTER TABLE {} ENABLE TRIGGER ALL", table)
}

/// `TRUNCATE TABLE <table> CASCADE`
pub fn truncate_table_sql(table: &str) -> String {
    format!("TRUNCATE TABLE {} CASCADE", table)
}

/// Disable every trigger, including foreign-key triggers, on each table.
///
/// Tables are processed in order. The first failure is returned and tables
/// already altered stay altered.
pub async fn disable_triggers<'c, A>(conn: A, tables: &[&str]) -> Result<()>
where
    A: Acquire<'c, Database = Postgres>,
{
    exec_per_table(conn, "disable_triggers", tables, disable_triggers_sql).await
}

/// Re-enable every trigger on each table. Same ordering rules as
/// [`disable_triggers`].
pub async fn enable_triggers<'c, A>(conn: A, tables: &[&str]) -> Result<()>
where
    A: Acquire<'c, Database = Postgres>,
{
    exec_per_table(conn, "enable_triggers", tables, enable_triggers_sql).await
}

/// Truncate each table with `CASCADE`, which also empties every table
/// referencing it.
pub async fn truncate_tables<'c, A>(conn: A, tables: &[&str]) -> Result<()>
where
    A: Acquire<'c, Database = Postgres>,
{
    exec_per_table(conn, "truncate_tables", tables, truncate_table_sql).await
}

async fn exec_per_table<'c, A, F>(
    conn: A,
    operation: &str,
    tables: &[&str],
    render: F,
) -> Result<()>
where
    A: Acquire<'c, Database = Postgres>,
    F: Fn(&str) -> String,
{
    let mut conn = conn
        .acquire()
        .await
        .with_context(|| format!("failed to acquire connection for {}", operation))?;

    for table in tables {
        let sql = render(*table);
        async {
            debug!(sql = %sql, "Executing table maintenance statement");
            sqlx::query(&sql)
                .execute(&mut *conn)
                .await
                .with_context(|| format!("failed to {}\nsql = {}", operation, sql))
        }
        .instrument(crate::db_span!(operation, table = *table))
        .await?;
    }

    Ok(())
}
