//! Error types for the migration system.

/// Errors that can occur during migration operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The migration pool is empty.
    #[error("No migrations defined")]
    NoMigrationDefined,

    /// A migration in the pool has an empty name.
    #[error("Missing migration name")]
    MissingMigrationName,

    /// Two migrations in the pool share a name.
    #[error("Migration \"{0}\" is duplicated in the pool")]
    DuplicateMigration(String),

    /// The tracking table could not be created.
    #[error("Migration table failed to be created: {0}")]
    TrackingTable(#[source] sqlx::Error),

    /// The tracking table is required but absent.
    #[error("Migration table does not exist")]
    TableNotExists,

    /// Rollback or revert was requested with nothing executed.
    #[error("Nothing to rollback, there are no migration executed")]
    EmptyRollbackStack,

    /// A migration produced no commands, or a command that renders no SQL.
    #[error("There are no commands to be executed")]
    NoSqlCommandsToRun,

    /// Database error during migration execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A tracking table row could not be read into an entry.
    #[error("Failed to read migration entry column {index}: {message}")]
    RowScan {
        /// Zero-based column index.
        index: usize,
        /// What was wrong with the value.
        message: String,
    },
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
