//! Schema command pool.
//!
//! A migration's up and down producers build a [`Schema`]: an ordered list of
//! commands executed in the order they were added.

use std::sync::Arc;

use crate::command::{Command, TableCommand, ToSql};
use crate::error::{MigrateError, Result};
use crate::table::Table;

/// Ordered pool of schema commands.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pool: Vec<Command>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table.
    ///
    /// ```rust
    /// use mysql_migrator::prelude::*;
    ///
    /// let mut posts = Table::new("posts");
    /// posts.unique_id("id");
    /// posts.column("title", Char::varchar(64));
    /// posts.timestamps();
    ///
    /// let mut schema = Schema::new();
    /// schema.create_table(posts);
    /// assert_eq!(schema.len(), 1);
    /// ```
    pub fn create_table(&mut self, table: Table) -> &mut Self {
        self.pool.push(Command::CreateTable(table));
        self
    }

    /// Drops the table. `soft` adds `IF EXISTS`; `option` may be `RESTRICT`
    /// or `CASCADE`, anything else is ignored.
    pub fn drop_table(&mut self, name: impl Into<String>, soft: bool, option: &str) -> &mut Self {
        self.pool.push(Command::DropTable {
            table: name.into(),
            if_exists: soft,
            option: Some(option.to_string()).filter(|o| !o.is_empty()),
        });
        self
    }

    /// Drops the table if it exists.
    pub fn drop_table_if_exists(&mut self, name: impl Into<String>) -> &mut Self {
        self.drop_table(name, true, "")
    }

    /// Renames a table.
    pub fn rename_table(&mut self, old: impl Into<String>, new: impl Into<String>) -> &mut Self {
        self.pool.push(Command::RenameTable {
            from: old.into(),
            to: new.into(),
        });
        self
    }

    /// Alters a table with the given clauses.
    pub fn alter_table(
        &mut self,
        name: impl Into<String>,
        commands: Vec<TableCommand>,
    ) -> &mut Self {
        self.pool.push(Command::AlterTable {
            table: name.into(),
            commands,
        });
        self
    }

    /// Adds a caller-rendered statement.
    pub fn custom_command(&mut self, command: impl ToSql + 'static) -> &mut Self {
        self.pool.push(Command::Custom(Arc::new(command)));
        self
    }

    /// Returns the command pool.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.pool
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns true if no command was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Renders every command without executing anything.
    pub fn to_sql(&self) -> Result<Vec<String>> {
        if self.pool.is_empty() {
            return Err(MigrateError::NoSqlCommandsToRun);
        }
        self.pool
            .iter()
            .map(|command| command.to_sql().ok_or(MigrateError::NoSqlCommandsToRun))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Integer;

    #[test]
    fn test_commands_keep_call_order() {
        let mut schema = Schema::new();
        schema
            .create_table(Table::new("test"))
            .drop_table("test", false, "")
            .drop_table_if_exists("test")
            .rename_table("from", "to")
            .alter_table("test", vec![TableCommand::add_column("n", Integer::new())])
            .custom_command("DROP PROCEDURE abc");

        let sql = schema.to_sql().unwrap();
        assert_eq!(sql.len(), 6);
        assert!(sql[0].starts_with("CREATE TABLE `test`"));
        assert_eq!(sql[1], "DROP TABLE `test`");
        assert_eq!(sql[2], "DROP TABLE IF EXISTS `test`");
        assert_eq!(sql[3], "RENAME TABLE `from` TO `to`");
        assert_eq!(sql[4], "ALTER TABLE `test` ADD COLUMN `n` int NOT NULL");
        assert_eq!(sql[5], "DROP PROCEDURE abc");
    }

    #[test]
    fn test_no_deduplication() {
        let mut schema = Schema::new();
        schema.drop_table_if_exists("test").drop_table_if_exists("test");
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_drop_table_option() {
        let mut schema = Schema::new();
        schema.drop_table("test", true, "cascade");
        assert_eq!(
            schema.to_sql().unwrap(),
            vec!["DROP TABLE IF EXISTS `test` CASCADE".to_string()]
        );
    }

    #[test]
    fn test_to_sql_rejects_empty_and_unrenderable() {
        assert!(matches!(
            Schema::new().to_sql(),
            Err(MigrateError::NoSqlCommandsToRun)
        ));

        let mut schema = Schema::new();
        schema.drop_table_if_exists("ok").alter_table("test", vec![]);
        assert!(matches!(
            schema.to_sql(),
            Err(MigrateError::NoSqlCommandsToRun)
        ));
    }
}
