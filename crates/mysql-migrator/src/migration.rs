//! Migration definitions and execution.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::command::Command;
use crate::connection::Connection;
use crate::error::{MigrateError, Result};
use crate::schema::Schema;

type SchemaProducer = Arc<dyn Fn() -> Schema + Send + Sync>;

/// A named, reversible schema change.
///
/// `up` builds the commands that apply the change, `down` the ones that undo
/// it. Both are called at most once per migrator pass.
///
/// ```rust
/// use mysql_migrator::prelude::*;
///
/// let migration = Migration::new(
///     "19700101_0001_create_posts_table",
///     || {
///         let mut posts = Table::new("posts");
///         posts.unique_id("id");
///         posts.column("title", Char::varchar(64));
///         posts.column("content", Text::new());
///         posts.timestamps();
///
///         let mut schema = Schema::new();
///         schema.create_table(posts);
///         schema
///     },
///     || {
///         let mut schema = Schema::new();
///         schema.drop_table_if_exists("posts");
///         schema
///     },
/// )
/// .transactional(true);
///
/// assert_eq!(migration.up_sql().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct Migration {
    name: String,
    up: SchemaProducer,
    down: SchemaProducer,
    transaction: bool,
}

impl Migration {
    /// Creates a non-transactional migration.
    pub fn new<U, D>(name: impl Into<String>, up: U, down: D) -> Self
    where
        U: Fn() -> Schema + Send + Sync + 'static,
        D: Fn() -> Schema + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            up: Arc::new(up),
            down: Arc::new(down),
            transaction: false,
        }
    }

    /// Runs the migration's commands inside a transaction.
    #[must_use]
    pub fn transactional(mut self, enabled: bool) -> Self {
        self.transaction = enabled;
        self
    }

    /// Returns the migration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the commands run inside a transaction.
    #[must_use]
    pub fn is_transactional(&self) -> bool {
        self.transaction
    }

    /// Builds the schema that applies this migration.
    #[must_use]
    pub fn up(&self) -> Schema {
        (self.up)()
    }

    /// Builds the schema that reverts this migration.
    #[must_use]
    pub fn down(&self) -> Schema {
        (self.down)()
    }

    /// Renders the forward SQL without executing it.
    pub fn up_sql(&self) -> Result<Vec<String>> {
        self.up().to_sql()
    }

    /// Renders the rollback SQL without executing it.
    pub fn down_sql(&self) -> Result<Vec<String>> {
        self.down().to_sql()
    }

    /// Executes the commands, within a transaction if the migration asks for one.
    ///
    /// Without a transaction, commands that ran before a failure stay applied.
    pub(crate) async fn exec<C: Connection>(
        &self,
        conn: &mut C,
        commands: &[Command],
    ) -> Result<()> {
        if self.transaction {
            run_in_transaction(conn, commands).await
        } else {
            run(conn, commands).await
        }
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("name", &self.name)
            .field("transaction", &self.transaction)
            .finish_non_exhaustive()
    }
}

async fn run_in_transaction<C: Connection>(conn: &mut C, commands: &[Command]) -> Result<()> {
    conn.begin().await?;

    if let Err(err) = run(conn, commands).await {
        if let Err(rollback_err) = conn.rollback().await {
            warn!(error = %rollback_err, "Transaction rollback failed");
        }
        return Err(err);
    }

    conn.commit().await?;
    Ok(())
}

/// Renders and executes each command in order, stopping at the first one that
/// renders nothing or fails.
async fn run<C: Connection>(conn: &mut C, commands: &[Command]) -> Result<()> {
    for command in commands {
        let sql = command.to_sql().ok_or(MigrateError::NoSqlCommandsToRun)?;
        conn.execute(&sql, &[]).await?;
    }
    Ok(())
}
