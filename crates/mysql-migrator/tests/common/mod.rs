#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use mysql_migrator::prelude::{Connection, ExecResult, Migration, Row, Schema, SqlValue, Table};

/// In-memory stand-in for a MySQL connection.
///
/// Records every statement it receives and models the tracking table: the
/// probe fails until the table is created, inserts get increasing ids and
/// `applied_at` values, and deletes remove rows by id. Everything else is
/// accepted and only logged.
pub struct FakeConnection {
    pub log: Vec<String>,
    table: String,
    rows: Option<Vec<Row>>,
    next_id: u64,
    clock: DateTime<Utc>,
    failures: Vec<String>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::with_table("migrations")
    }

    pub fn with_table(table: &str) -> Self {
        Self {
            log: Vec::new(),
            table: table.to_string(),
            rows: None,
            next_id: 1,
            clock: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            failures: Vec::new(),
        }
    }

    /// Makes every statement containing `pattern` fail.
    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    /// Creates the tracking table without any rows.
    pub fn with_tracking_table(mut self) -> Self {
        self.rows.get_or_insert_with(Vec::new);
        self
    }

    /// Adds a raw tracking row, creating the table if needed.
    pub fn seed(mut self, row: Row) -> Self {
        self.rows.get_or_insert_with(Vec::new).push(row);
        self
    }

    /// Adds a well-formed tracking row.
    pub fn seed_entry(self, id: u64, name: &str, batch: u64) -> Self {
        let applied_at = self.clock - Duration::hours(1) + Duration::seconds(id as i64);
        self.seed(vec![
            SqlValue::UInt(id),
            SqlValue::Text(name.to_string()),
            SqlValue::UInt(batch),
            SqlValue::Timestamp(applied_at),
        ])
    }

    pub fn has_tracking_table(&self) -> bool {
        self.rows.is_some()
    }

    /// `(name, batch)` of each tracking row, in insertion order.
    pub fn tracked(&self) -> Vec<(String, u64)> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|row| match (&row[1], &row[2]) {
                (SqlValue::Text(name), SqlValue::UInt(batch)) => Some((name.clone(), *batch)),
                _ => None,
            })
            .collect()
    }

    /// Statements that are neither tracking table traffic nor transaction control.
    pub fn ddl(&self) -> Vec<String> {
        let marker = format!("`{}`", self.table);
        self.log
            .iter()
            .filter(|sql| !sql.contains(&marker))
            .filter(|sql| !matches!(sql.as_str(), "BEGIN" | "COMMIT" | "ROLLBACK"))
            .cloned()
            .collect()
    }

    pub fn count(&self, statement: &str) -> usize {
        self.log.iter().filter(|sql| sql.as_str() == statement).count()
    }

    fn record(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        self.log.push(sql.to_string());
        if self.failures.iter().any(|pattern| sql.contains(pattern)) {
            return Err(sqlx::Error::Protocol(format!("injected failure: {sql}")));
        }
        Ok(())
    }
}

fn table_missing(table: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("Table '{table}' doesn't exist"))
}

impl Connection for FakeConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ExecResult, sqlx::Error> {
        self.record(sql)?;

        if sql.starts_with(&format!("CREATE TABLE `{}`", self.table)) {
            self.rows = Some(Vec::new());
            return Ok(ExecResult::default());
        }

        if sql.starts_with(&format!("INSERT INTO `{}`", self.table)) {
            let id = self.next_id;
            self.next_id += 1;
            self.clock += Duration::seconds(1);
            let row = vec![
                SqlValue::UInt(id),
                params[0].clone(),
                params[1].clone(),
                SqlValue::Timestamp(self.clock),
            ];
            let rows = self.rows.as_mut().ok_or_else(|| table_missing(&self.table))?;
            rows.push(row);
            return Ok(ExecResult {
                rows_affected: 1,
                last_insert_id: Some(id),
            });
        }

        if sql.starts_with(&format!("DELETE FROM `{}`", self.table)) {
            let id = params[0].clone();
            let rows = self.rows.as_mut().ok_or_else(|| table_missing(&self.table))?;
            let before = rows.len();
            rows.retain(|row| row[0] != id);
            return Ok(ExecResult {
                rows_affected: (before - rows.len()) as u64,
                last_insert_id: None,
            });
        }

        Ok(ExecResult::default())
    }

    async fn query(&mut self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>, sqlx::Error> {
        self.record(sql)?;

        if !sql.contains(&format!("FROM `{}`", self.table)) {
            return Ok(Vec::new());
        }
        let rows = self.rows.as_ref().ok_or_else(|| table_missing(&self.table))?;
        if sql.starts_with("SELECT 1") {
            return Ok(rows.iter().take(1).map(|_| vec![SqlValue::Int(1)]).collect());
        }

        let mut rows = rows.clone();
        rows.sort_by_key(|row| match row.get(3) {
            Some(SqlValue::Timestamp(at)) => Some(*at),
            _ => None,
        });
        Ok(rows)
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.record("BEGIN")
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        self.record("COMMIT")
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        self.record("ROLLBACK")
    }
}

/// A migration creating `table` with an id column and dropping it on the way down.
pub fn create_table(name: &str, table: &'static str) -> Migration {
    Migration::new(
        name,
        move || {
            let mut t = Table::new(table);
            t.id("id");
            let mut schema = Schema::new();
            schema.create_table(t);
            schema
        },
        move || {
            let mut schema = Schema::new();
            schema.drop_table_if_exists(table);
            schema
        },
    )
}

/// A migration whose up and down are single raw statements.
pub fn raw(name: &str, up: &'static str, down: &'static str) -> Migration {
    Migration::new(
        name,
        move || {
            let mut schema = Schema::new();
            schema.custom_command(up);
            schema
        },
        move || {
            let mut schema = Schema::new();
            schema.custom_command(down);
            schema
        },
    )
}
