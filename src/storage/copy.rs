//! Bulk loading of JSON-shaped rows through `COPY ... FROM STDIN`.
//!
//! The column list is the sorted key set of the first record and is reused
//! for the statement and every row. Records are validated before the COPY
//! starts, and a COPY that fails mid-stream is aborted, so a load either
//! writes every row or none.

use crate::errors::{ErrorContext, Result, TestingError};
use serde_json::{Map, Value};
use sqlx::{Acquire, Postgres};
use tracing::{debug, info, warn, Instrument};

/// One row to insert, keyed by column name.
pub type Record = Map<String, Value>;

/// Columns of a load: the first record's keys, sorted.
pub fn record_columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> =
        records.first().map(|first| first.keys().cloned().collect()).unwrap_or_default();
    columns.sort();
    columns
}

/// Quote an identifier, quoting each part of a schema-qualified name separately.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// `COPY <table> (<columns>) FROM STDIN WITH (FORMAT csv)`
pub fn copy_in_sql(table: &str, columns: &[String]) -> String {
    let columns: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    format!("COPY {} ({}) FROM STDIN WITH (FORMAT csv)", quote_ident(table), columns.join(", "))
}

/// Look up `columns` in `record`, in order.
pub fn record_values<'r>(columns: &[String], record: &'r Record) -> Result<Vec<&'r Value>> {
    columns
        .iter()
        .map(|column| {
            record.get(column).ok_or_else(|| {
                TestingError::missing_field(
                    column.as_str(),
                    "record is missing a column of the first record",
                )
            })
        })
        .collect()
}

/// Encode one row as a CSV line understood by `COPY ... WITH (FORMAT csv)`.
///
/// JSON null becomes an unquoted empty field, which COPY reads as SQL NULL.
/// Strings are always quoted so an empty string stays distinct from NULL.
pub fn encode_csv_row(values: &[&Value]) -> String {
    let fields: Vec<String> = values.iter().map(|value| encode_csv_field(value)).collect();
    let mut line = fields.join(",");
    line.push('\n');
    line
}

fn encode_csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_csv(s),
        Value::Array(_) | Value::Object(_) => quote_csv(&value.to_string()),
    }
}

fn quote_csv(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn describe_load(table: &str, records: &[Record]) -> String {
    let data = serde_json::to_string(records).unwrap_or_else(|_| format!("{:?}", records));
    format!("failed to run CopyFrom\ntable = {}\ndata = {}", table, data)
}

/// Bulk-insert `records` into `table` and return the number of rows written.
///
/// Every record must carry every key of the first record; extra keys are
/// ignored. An empty slice is a no-op, while a first record without keys is
/// a validation error.
///
/// WARNING: point the connection at a local, disposable database.
pub async fn copy_from<'c, A>(conn: A, table: &str, records: &[Record]) -> Result<u64>
where
    A: Acquire<'c, Database = Postgres>,
{
    if records.is_empty() {
        debug!(table = %table, "No records to copy");
        return Ok(0);
    }

    let span = crate::db_span!("copy_from", table = table);

    async {
        let columns = record_columns(records);
        if columns.is_empty() {
            return Err(TestingError::validation_field(
                format!("first record for table {} has no columns", table),
                "records",
            ));
        }

        let mut payload = String::new();
        for record in records {
            let values =
                record_values(&columns, record).with_context(|| describe_load(table, records))?;
            payload.push_str(&encode_csv_row(&values));
        }

        let statement = copy_in_sql(table, &columns);
        debug!(sql = %statement, rows = records.len(), "Starting COPY");

        let mut conn = conn.acquire().await.with_context(|| describe_load(table, records))?;
        let mut copy = conn
            .copy_in_raw(&statement)
            .await
            .with_context(|| describe_load(table, records))?;

        let sent = copy.send(payload.into_bytes()).await.map(|_| ());
        if let Err(e) = sent {
            warn!(error = %e, "COPY stream failed, aborting");
            if let Err(abort_error) = copy.abort("copy_from aborted").await {
                debug!(error = %abort_error, "COPY abort reported an error");
            }
            return Err(TestingError::database(e, describe_load(table, records)));
        }

        let rows = copy.finish().await.with_context(|| describe_load(table, records))?;

        info!(rows, "Copied records");
        Ok(rows)
    }
    .instrument(span)
    .await
}
