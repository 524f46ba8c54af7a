//! The migrator state machine.
//!
//! Every call walks the same states: validate the pool, make sure the
//! tracking table is there, load the executed entries, then migrate or roll
//! back. Nothing is kept between calls except the last loaded entries, which
//! are only exposed for inspection.
//!
//! The tracking table is not locked. Two runners migrating the same database
//! at the same time can compute the same batch number or apply a migration
//! twice; callers must serialize runs themselves.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::connection::{Connection, SqlValue};
use crate::error::{MigrateError, Result};
use crate::migration::Migration;

/// Tracking table name used when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "migrations";

/// Column definitions of the tracking table.
const TRACKING_COLUMNS: &[&str] = &[
    "id int(10) unsigned NOT NULL AUTO_INCREMENT PRIMARY KEY",
    "name varchar(255) COLLATE utf8mb4_unicode_ci NOT NULL",
    "batch int(11) NOT NULL",
    "applied_at timestamp(6) NULL DEFAULT CURRENT_TIMESTAMP(6)",
];

/// A row of the tracking table: one applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationEntry {
    pub id: u64,
    pub name: String,
    pub batch: u64,
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationEntry {
    /// Reads an entry from an `id, name, batch, applied_at` row.
    fn from_row(row: &[SqlValue]) -> Result<Self> {
        Ok(Self {
            id: scan_unsigned(row, 0)?,
            name: scan_text(row, 1)?,
            batch: scan_unsigned(row, 2)?,
            applied_at: scan_timestamp(row, 3)?,
        })
    }
}

fn scan_column(row: &[SqlValue], index: usize) -> Result<&SqlValue> {
    row.get(index).ok_or_else(|| MigrateError::RowScan {
        index,
        message: format!("row has only {} columns", row.len()),
    })
}

fn scan_unsigned(row: &[SqlValue], index: usize) -> Result<u64> {
    match scan_column(row, index)? {
        SqlValue::UInt(value) => Ok(*value),
        SqlValue::Int(value) => u64::try_from(*value).map_err(|_| MigrateError::RowScan {
            index,
            message: format!("expected an unsigned integer, got {value}"),
        }),
        other => Err(MigrateError::RowScan {
            index,
            message: format!("expected an unsigned integer, got {other:?}"),
        }),
    }
}

fn scan_text(row: &[SqlValue], index: usize) -> Result<String> {
    match scan_column(row, index)? {
        SqlValue::Text(value) => Ok(value.clone()),
        other => Err(MigrateError::RowScan {
            index,
            message: format!("expected text, got {other:?}"),
        }),
    }
}

fn scan_timestamp(row: &[SqlValue], index: usize) -> Result<Option<DateTime<Utc>>> {
    match scan_column(row, index)? {
        SqlValue::Timestamp(value) => Ok(Some(*value)),
        SqlValue::Null => Ok(None),
        other => Err(MigrateError::RowScan {
            index,
            message: format!("expected a timestamp, got {other:?}"),
        }),
    }
}

/// Whether a pool migration has been applied, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub name: String,
    pub executed: bool,
    pub batch: Option<u64>,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Applies and reverts a pool of migrations, recording them in a tracking table.
#[derive(Debug, Clone)]
pub struct Migrator {
    table_name: String,
    pool: Vec<Migration>,
    executed: Vec<MigrationEntry>,
}

impl Migrator {
    /// Creates a migrator over the given pool, tracked in `migrations`.
    #[must_use]
    pub fn new(pool: Vec<Migration>) -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            pool,
            executed: Vec::new(),
        }
    }

    /// Sets the tracking table name. An empty name keeps the default.
    #[must_use]
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.table_name = name;
        }
        self
    }

    /// Returns the tracking table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the migration pool in declared order.
    #[must_use]
    pub fn migrations(&self) -> &[Migration] {
        &self.pool
    }

    /// Returns the entries loaded by the last call, ordered by `applied_at`.
    ///
    /// After a row could not be read this holds the entries read before it.
    #[must_use]
    pub fn executed(&self) -> &[MigrationEntry] {
        &self.executed
    }

    /// Applies every migration that is not recorded yet, in pool order, as one
    /// new batch. Returns the names of the applied migrations.
    ///
    /// A failure stops the run. Migrations applied before it stay applied and
    /// recorded.
    pub async fn migrate<C: Connection>(&mut self, conn: &mut C) -> Result<Vec<String>> {
        self.validate()?;
        self.executed.clear();
        self.create_tracking_table(conn).await?;
        self.fetch_executed(conn).await?;

        let batch = self.last_batch() + 1;
        let insert = format!(
            "INSERT INTO `{}` (`name`, `batch`) VALUES (?, ?)",
            self.table_name
        );
        let mut migrated = Vec::new();

        for migration in &self.pool {
            if self.is_executed(migration.name()) {
                continue;
            }

            let schema = migration.up();
            if schema.is_empty() {
                return Err(MigrateError::NoSqlCommandsToRun);
            }
            migration.exec(conn, schema.commands()).await?;

            conn.execute(
                &insert,
                &[
                    SqlValue::Text(migration.name().to_string()),
                    SqlValue::UInt(batch),
                ],
            )
            .await?;

            info!(name = %migration.name(), batch, "Migration applied");
            migrated.push(migration.name().to_string());
        }

        if migrated.is_empty() {
            debug!("Nothing to migrate");
        }
        Ok(migrated)
    }

    /// Reverts the most recent batch, newest migration first. Returns the
    /// names of the reverted migrations.
    pub async fn rollback<C: Connection>(&mut self, conn: &mut C) -> Result<Vec<String>> {
        self.prepare_revert(conn).await?;

        let batch = self.last_batch();
        let revertable: Vec<MigrationEntry> = self
            .executed
            .iter()
            .filter(|entry| entry.batch == batch)
            .cloned()
            .collect();

        self.revert_entries(conn, &revertable).await
    }

    /// Reverts every executed migration, newest first. Returns the names of
    /// the reverted migrations.
    pub async fn revert<C: Connection>(&mut self, conn: &mut C) -> Result<Vec<String>> {
        self.prepare_revert(conn).await?;

        let revertable = self.executed.clone();
        self.revert_entries(conn, &revertable).await
    }

    /// Reports, for each pool migration in declared order, whether it has run.
    pub async fn status<C: Connection>(&mut self, conn: &mut C) -> Result<Vec<MigrationStatus>> {
        self.validate()?;
        self.executed.clear();
        if !self.has_table(conn).await {
            return Err(MigrateError::TableNotExists);
        }
        self.fetch_executed(conn).await?;

        Ok(self
            .pool
            .iter()
            .map(|migration| {
                let entry = self
                    .executed
                    .iter()
                    .find(|entry| entry.name == migration.name());
                MigrationStatus {
                    name: migration.name().to_string(),
                    executed: entry.is_some(),
                    batch: entry.map(|e| e.batch),
                    applied_at: entry.and_then(|e| e.applied_at),
                }
            })
            .collect())
    }

    /// Checks that every migration has a name and no name repeats. Reports the
    /// first offending migration in pool order.
    pub fn check_pool(&self) -> Result<()> {
        let mut names = HashSet::new();
        for migration in &self.pool {
            if migration.name().is_empty() {
                return Err(MigrateError::MissingMigrationName);
            }
            if !names.insert(migration.name()) {
                return Err(MigrateError::DuplicateMigration(
                    migration.name().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.pool.is_empty() {
            return Err(MigrateError::NoMigrationDefined);
        }
        self.check_pool()
    }

    async fn prepare_revert<C: Connection>(&mut self, conn: &mut C) -> Result<()> {
        self.validate()?;
        self.executed.clear();
        if !self.has_table(conn).await {
            return Err(MigrateError::TableNotExists);
        }
        self.fetch_executed(conn).await?;
        if self.executed.is_empty() {
            return Err(MigrateError::EmptyRollbackStack);
        }
        Ok(())
    }

    /// Reverts the given entries last to first. Entries without a matching
    /// pool migration are skipped.
    async fn revert_entries<C: Connection>(
        &self,
        conn: &mut C,
        entries: &[MigrationEntry],
    ) -> Result<Vec<String>> {
        let delete = format!("DELETE FROM `{}` WHERE `id` = ?", self.table_name);
        let mut reverted = Vec::new();

        for entry in entries.iter().rev() {
            let Some(migration) = self.pool.iter().rev().find(|m| m.name() == entry.name) else {
                warn!(name = %entry.name, "Executed migration is not in the pool, skipping");
                continue;
            };

            let schema = migration.down();
            if schema.is_empty() {
                return Err(MigrateError::NoSqlCommandsToRun);
            }
            migration.exec(conn, schema.commands()).await?;
            conn.execute(&delete, &[SqlValue::UInt(entry.id)]).await?;

            info!(name = %entry.name, batch = entry.batch, "Migration reverted");
            reverted.push(entry.name.clone());
        }

        Ok(reverted)
    }

    async fn create_tracking_table<C: Connection>(&self, conn: &mut C) -> Result<()> {
        if self.has_table(conn).await {
            return Ok(());
        }

        let sql = format!(
            "CREATE TABLE `{}` ({}) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci",
            self.table_name,
            TRACKING_COLUMNS.join(", ")
        );
        conn.execute(&sql, &[])
            .await
            .map_err(MigrateError::TrackingTable)?;

        info!(table = %self.table_name, "Created migration table");
        Ok(())
    }

    async fn has_table<C: Connection>(&self, conn: &mut C) -> bool {
        let probe = format!("SELECT 1 FROM `{}` LIMIT 1", self.table_name);
        conn.query(&probe, &[]).await.is_ok()
    }

    /// Loads the tracking table into the executed cache. Stops at the first
    /// unreadable row, keeping what was read before it.
    async fn fetch_executed<C: Connection>(&mut self, conn: &mut C) -> Result<()> {
        let sql = format!(
            "SELECT id, name, batch, applied_at FROM `{}` ORDER BY applied_at ASC",
            self.table_name
        );
        let rows = conn.query(&sql, &[]).await?;

        for row in &rows {
            self.executed.push(MigrationEntry::from_row(row)?);
        }
        Ok(())
    }

    fn last_batch(&self) -> u64 {
        self.executed
            .iter()
            .map(|entry| entry.batch)
            .max()
            .unwrap_or(0)
    }

    fn is_executed(&self, name: &str) -> bool {
        self.executed.iter().any(|entry| entry.name == name)
    }
}
