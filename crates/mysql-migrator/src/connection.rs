//! Database connection abstraction.
//!
//! The migrator needs very little from the database: run a statement, run a
//! parameterized query and get rows back, and wrap a unit of work in a
//! transaction. [`Connection`] captures exactly that, and is implemented for
//! [`sqlx::MySqlConnection`].

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};
use tracing::debug;

/// A value bound to, or read from, a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    /// Signed integer column or parameter.
    Int(i64),
    /// Unsigned integer column or parameter.
    UInt(u64),
    /// Character data, and any column type without a dedicated variant.
    Text(String),
    /// `TIMESTAMP` or `DATETIME`, read as UTC.
    Timestamp(DateTime<Utc>),
}

/// One result row, in column order.
pub type Row = Vec<SqlValue>;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Number of rows changed by the statement.
    pub rows_affected: u64,
    /// Generated `AUTO_INCREMENT` value, if the statement produced one.
    pub last_insert_id: Option<u64>,
}

/// A single database connection driven by the migrator.
///
/// Calls are strictly sequential; the migrator never holds two in flight.
/// Transactions are opened, committed and rolled back on the connection
/// itself, and `execute` runs inside the open transaction if there is one.
#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Executes a statement that returns no rows.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ExecResult, sqlx::Error>;

    /// Runs a query and returns all of its rows.
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error>;

    /// Starts a transaction.
    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    /// Commits the open transaction.
    async fn commit(&mut self) -> Result<(), sqlx::Error>;

    /// Rolls back the open transaction.
    async fn rollback(&mut self) -> Result<(), sqlx::Error>;
}

impl Connection for MySqlConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ExecResult, sqlx::Error> {
        debug!(sql = %sql, "Executing SQL");

        // DDL and transaction control go through the text protocol.
        let result = if params.is_empty() {
            sqlx::raw_sql(sql).execute(&mut *self).await?
        } else {
            params
                .iter()
                .fold(sqlx::query(sql), bind_param)
                .execute(&mut *self)
                .await?
        };

        let last_insert_id = result.last_insert_id();
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: (last_insert_id > 0).then_some(last_insert_id),
        })
    }

    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error> {
        debug!(sql = %sql, "Running query");

        let rows = params
            .iter()
            .fold(sqlx::query(sql), bind_param)
            .fetch_all(&mut *self)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql("START TRANSACTION").execute(&mut *self).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql("COMMIT").execute(&mut *self).await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql("ROLLBACK").execute(&mut *self).await?;
        Ok(())
    }
}

/// Binds a SqlValue parameter to a query.
fn bind_param<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Int(i) => query.bind(*i),
        SqlValue::UInt(u) => query.bind(*u),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Timestamp(t) => query.bind(*t),
    }
}

fn decode_row(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    (0..row.len()).map(|index| decode_value(row, index)).collect()
}

/// Decodes a column according to the MySQL type the server reported.
fn decode_value(row: &MySqlRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = row.column(index).type_info().name().to_uppercase();
    let value = if type_name.contains("INT") && type_name.contains("UNSIGNED") {
        SqlValue::UInt(row.try_get::<u64, _>(index)?)
    } else if type_name.contains("INT") {
        SqlValue::Int(row.try_get::<i64, _>(index)?)
    } else if type_name == "TIMESTAMP" {
        SqlValue::Timestamp(row.try_get::<DateTime<Utc>, _>(index)?)
    } else if type_name == "DATETIME" {
        SqlValue::Timestamp(row.try_get::<NaiveDateTime, _>(index)?.and_utc())
    } else {
        SqlValue::Text(row.try_get::<String, _>(index)?)
    };
    Ok(value)
}
