//! Schema commands.
//!
//! A [`Command`] renders one complete SQL statement; a [`TableCommand`] renders
//! one clause of an `ALTER TABLE` statement. Rendering returns `None` when a
//! required identifier is missing, which the executor turns into
//! [`MigrateError::NoSqlCommandsToRun`](crate::error::MigrateError::NoSqlCommandsToRun).

use std::fmt;
use std::sync::Arc;

use crate::column::ColumnType;
use crate::foreign::{Foreign, render_foreigns};
use crate::key::render_keys;
use crate::table::Table;

/// Column used by `CREATE TABLE` when the table declares none.
pub const FALLBACK_ID_COLUMN: &str = "`id` bigint(20) unsigned NOT NULL AUTO_INCREMENT";

/// Options accepted after `DROP TABLE`.
const DROP_OPTIONS: &[&str] = &["RESTRICT", "CASCADE"];

/// Caller-supplied SQL for statements not covered by the built-in commands.
pub trait ToSql: fmt::Debug + Send + Sync {
    /// Renders the SQL text, or `None` when there is nothing to run.
    fn to_sql(&self) -> Option<String>;
}

impl ToSql for String {
    fn to_sql(&self) -> Option<String> {
        Some(self.clone()).filter(|s| !s.is_empty())
    }
}

impl ToSql for &'static str {
    fn to_sql(&self) -> Option<String> {
        Some((*self).to_string()).filter(|s| !s.is_empty())
    }
}

/// A schema-level statement.
#[derive(Debug, Clone)]
pub enum Command {
    /// `CREATE TABLE`.
    CreateTable(Table),
    /// `DROP TABLE [IF EXISTS] name [RESTRICT|CASCADE]`.
    DropTable {
        table: String,
        if_exists: bool,
        option: Option<String>,
    },
    /// `RENAME TABLE from TO to`.
    RenameTable { from: String, to: String },
    /// `ALTER TABLE name clause, clause, ...`.
    AlterTable {
        table: String,
        commands: Vec<TableCommand>,
    },
    /// Raw statement supplied by the caller.
    Custom(Arc<dyn ToSql>),
}

impl Command {
    /// Renders the statement.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        match self {
            Self::CreateTable(table) => create_table_sql(table),
            Self::DropTable {
                table,
                if_exists,
                option,
            } => drop_table_sql(table, *if_exists, option.as_deref()),
            Self::RenameTable { from, to } => {
                if from.is_empty() || to.is_empty() {
                    return None;
                }
                Some(format!("RENAME TABLE `{from}` TO `{to}`"))
            }
            Self::AlterTable { table, commands } => {
                if table.is_empty() || commands.is_empty() {
                    return None;
                }
                let clauses = render_table_commands(commands)?;
                Some(format!("ALTER TABLE `{table}` {clauses}"))
            }
            Self::Custom(command) => command.to_sql(),
        }
    }
}

fn create_table_sql(table: &Table) -> Option<String> {
    if table.name.is_empty() {
        return None;
    }

    let mut definitions = table.render_columns();
    if definitions.is_empty() {
        definitions = FALLBACK_ID_COLUMN.to_string();
    }

    let keys = render_keys(table.keys());
    if !keys.is_empty() {
        definitions.push_str(", ");
        definitions.push_str(&keys);
    }

    let foreigns = render_foreigns(table.foreigns());
    if !foreigns.is_empty() {
        definitions.push_str(", ");
        definitions.push_str(&foreigns);
    }

    let (charset, collation) = table.encoding();
    let mut sql = format!(
        "CREATE TABLE `{}` ({definitions}) ENGINE={} DEFAULT CHARSET={charset} COLLATE={collation}",
        table.name,
        table.resolved_engine(),
    );
    if let Some(comment) = table.comment.as_deref().filter(|c| !c.is_empty()) {
        sql.push_str(&format!(" COMMENT='{comment}'"));
    }
    Some(sql)
}

fn drop_table_sql(table: &str, if_exists: bool, option: Option<&str>) -> Option<String> {
    if table.is_empty() {
        return None;
    }

    let mut sql = String::from("DROP TABLE");
    if if_exists {
        sql.push_str(" IF EXISTS");
    }
    sql.push_str(&format!(" `{table}`"));

    if let Some(option) = option.map(str::to_uppercase) {
        if DROP_OPTIONS.contains(&option.as_str()) {
            sql.push(' ');
            sql.push_str(&option);
        }
    }
    Some(sql)
}

/// One clause of an `ALTER TABLE` statement.
#[derive(Debug, Clone)]
pub enum TableCommand {
    /// `ADD COLUMN name definition [AFTER x | FIRST]`.
    AddColumn {
        name: String,
        column: ColumnType,
        after: Option<String>,
        first: bool,
    },
    /// `RENAME COLUMN old TO new`.
    RenameColumn { old: String, new: String },
    /// `MODIFY name definition`.
    ModifyColumn { name: String, column: ColumnType },
    /// `CHANGE from to definition`.
    ChangeColumn {
        from: String,
        to: String,
        column: ColumnType,
    },
    /// `DROP COLUMN name`.
    DropColumn(String),
    /// `ADD KEY name (columns)`.
    AddIndex { name: String, columns: Vec<String> },
    /// `DROP KEY name`.
    DropIndex(String),
    /// `ADD CONSTRAINT ... FOREIGN KEY ...`.
    AddForeign(Foreign),
    /// `DROP FOREIGN KEY name`.
    DropForeign(String),
    /// `ADD UNIQUE KEY key (columns)`.
    AddUniqueIndex { key: String, columns: Vec<String> },
    /// `ADD PRIMARY KEY (columns)`.
    AddPrimaryIndex(Vec<String>),
    /// `DROP PRIMARY KEY`.
    DropPrimaryIndex,
    /// Raw clause supplied by the caller.
    Custom(Arc<dyn ToSql>),
}

impl TableCommand {
    /// `ADD COLUMN` at the end of the table.
    pub fn add_column(name: impl Into<String>, column: impl Into<ColumnType>) -> Self {
        Self::AddColumn {
            name: name.into(),
            column: column.into(),
            after: None,
            first: false,
        }
    }

    /// `ADD COLUMN ... AFTER after`.
    pub fn add_column_after(
        name: impl Into<String>,
        column: impl Into<ColumnType>,
        after: impl Into<String>,
    ) -> Self {
        Self::AddColumn {
            name: name.into(),
            column: column.into(),
            after: Some(after.into()),
            first: false,
        }
    }

    /// `ADD COLUMN ... FIRST`.
    pub fn add_column_first(name: impl Into<String>, column: impl Into<ColumnType>) -> Self {
        Self::AddColumn {
            name: name.into(),
            column: column.into(),
            after: None,
            first: true,
        }
    }

    /// `MODIFY` a column definition.
    pub fn modify_column(name: impl Into<String>, column: impl Into<ColumnType>) -> Self {
        Self::ModifyColumn {
            name: name.into(),
            column: column.into(),
        }
    }

    /// `CHANGE` a column name and definition.
    pub fn change_column(
        from: impl Into<String>,
        to: impl Into<String>,
        column: impl Into<ColumnType>,
    ) -> Self {
        Self::ChangeColumn {
            from: from.into(),
            to: to.into(),
            column: column.into(),
        }
    }

    /// Renders the clause.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        match self {
            Self::AddColumn {
                name,
                column,
                after,
                first,
            } => {
                let definition = column.render();
                if name.is_empty() || definition.is_empty() {
                    return None;
                }
                let mut sql = format!("ADD COLUMN `{name}` {definition}");
                match after.as_deref().filter(|a| !a.is_empty()) {
                    Some(after) => sql.push_str(&format!(" AFTER {after}")),
                    None if *first => sql.push_str(" FIRST"),
                    None => {}
                }
                Some(sql)
            }
            Self::RenameColumn { old, new } => {
                if old.is_empty() || new.is_empty() {
                    return None;
                }
                Some(format!("RENAME COLUMN `{old}` TO `{new}`"))
            }
            Self::ModifyColumn { name, column } => {
                let definition = column.render();
                if name.is_empty() || definition.is_empty() {
                    return None;
                }
                Some(format!("MODIFY `{name}` {definition}"))
            }
            Self::ChangeColumn { from, to, column } => {
                let definition = column.render();
                if from.is_empty() || to.is_empty() || definition.is_empty() {
                    return None;
                }
                Some(format!("CHANGE `{from}` `{to}` {definition}"))
            }
            Self::DropColumn(name) => named("DROP COLUMN", name),
            Self::AddIndex { name, columns } => keyed("ADD KEY", name, columns),
            Self::DropIndex(name) => named("DROP KEY", name),
            Self::AddForeign(foreign) => foreign.render().map(|sql| format!("ADD {sql}")),
            Self::DropForeign(name) => named("DROP FOREIGN KEY", name),
            Self::AddUniqueIndex { key, columns } => keyed("ADD UNIQUE KEY", key, columns),
            Self::AddPrimaryIndex(columns) => {
                if columns.is_empty() || columns.iter().any(String::is_empty) {
                    return None;
                }
                Some(format!("ADD PRIMARY KEY (`{}`)", columns.join("`, `")))
            }
            Self::DropPrimaryIndex => Some(String::from("DROP PRIMARY KEY")),
            Self::Custom(command) => command.to_sql(),
        }
    }
}

fn named(prefix: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    Some(format!("{prefix} `{name}`"))
}

fn keyed(prefix: &str, name: &str, columns: &[String]) -> Option<String> {
    if name.is_empty() || columns.is_empty() {
        return None;
    }
    Some(format!("{prefix} `{name}` (`{}`)", columns.join("`, `")))
}

/// Joins the clauses with `, `. Any unrenderable clause makes the whole list
/// unrenderable.
pub fn render_table_commands(commands: &[TableCommand]) -> Option<String> {
    let clauses = commands
        .iter()
        .map(TableCommand::to_sql)
        .collect::<Option<Vec<_>>>()?;
    Some(clauses.join(", "))
}
