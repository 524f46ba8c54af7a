//! Batch-tracked, reversible schema migrations for MySQL.
//!
//! `mysql-migrator` builds DDL from typed column, key and table definitions,
//! groups it into named migrations, and applies them against a database while
//! recording each one in a tracking table:
//! - Every `migrate` call applies all pending migrations as one new batch
//! - `rollback` undoes the most recent batch, `revert` undoes everything
//! - A migration may run its commands inside a transaction
//!
//! # Architecture
//!
//! - **Columns** - Renderers for each MySQL column type (`Integer`, `Char`, `Enum`, ...)
//! - **Tables** - `Table` builder with keys, foreign keys and helpers like `timestamps`
//! - **Commands** - `CREATE`/`DROP`/`RENAME`/`ALTER TABLE` statements and raw SQL
//! - **Schema** - Ordered pool of commands produced by a migration
//! - **Migrator** - Validates the pool, tracks batches and drives execution
//! - **Connection** - The small database surface the migrator needs, implemented
//!   for `sqlx::MySqlConnection`
//!
//! # Example
//!
//! ```rust,no_run
//! use mysql_migrator::prelude::*;
//! use sqlx::Connection as _;
//!
//! # async fn run() -> Result<()> {
//! let create_posts = Migration::new(
//!     "19700101_0001_create_posts_table",
//!     || {
//!         let mut posts = Table::new("posts");
//!         posts.id("id");
//!         posts.column("title", Char::varchar(64));
//!         posts.column("content", Text::new());
//!         posts.timestamps();
//!
//!         let mut schema = Schema::new();
//!         schema.create_table(posts);
//!         schema
//!     },
//!     || {
//!         let mut schema = Schema::new();
//!         schema.drop_table_if_exists("posts");
//!         schema
//!     },
//! );
//!
//! let mut conn = sqlx::MySqlConnection::connect("mysql://root@localhost/blog").await?;
//! let mut migrator = Migrator::new(vec![create_posts]);
//!
//! let applied = migrator.migrate(&mut conn).await?;
//! let reverted = migrator.rollback(&mut conn).await?;
//! assert_eq!(applied, reverted);
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod command;
pub mod connection;
pub mod error;
pub mod foreign;
pub mod key;
pub mod migration;
pub mod migrator;
pub mod schema;
pub mod table;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::column::{
        Binary, Bit, Char, ColumnType, Enum, Floatable, Integer, Json, RenderColumn, Text,
        Timable,
    };
    pub use crate::command::{Command, TableCommand, ToSql};
    pub use crate::connection::{Connection, ExecResult, Row, SqlValue};
    pub use crate::error::{MigrateError, Result};
    pub use crate::foreign::{Foreign, ReferenceAction};
    pub use crate::key::{Key, KeyKind};
    pub use crate::migration::Migration;
    pub use crate::migrator::{MigrationEntry, MigrationStatus, Migrator};
    pub use crate::schema::Schema;
    pub use crate::table::{Column, Table};
}
