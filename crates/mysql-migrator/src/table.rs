//! Table definitions.
//!
//! A [`Table`] accumulates columns, keys and foreign keys for one
//! `CREATE TABLE` statement. The convenience helpers (`id`, `unique_id`,
//! `timestamps`, ...) are compositions of [`Table::column`] and the key
//! methods.

use crate::column::{Char, ColumnType, Integer, Timable};
use crate::foreign::Foreign;
use crate::key::{Key, KeyKind};

/// Storage engine used when a table does not name one.
pub const DEFAULT_ENGINE: &str = "InnoDB";

/// Charset used when a table sets neither charset nor collation.
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// Collation used when a table sets neither charset nor collation.
pub const DEFAULT_TABLE_COLLATION: &str = "utf8mb4_unicode_ci";

/// A named column definition.
#[derive(Debug, Clone)]
pub struct Column {
    pub field: String,
    pub definition: ColumnType,
}

impl Column {
    /// Renders `` `field` definition ``.
    #[must_use]
    pub fn render(&self) -> String {
        format!("`{}` {}", self.field, self.definition.render())
    }
}

/// A table to be created.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    /// Storage engine, `InnoDB` when empty.
    pub engine: Option<String>,
    /// Default charset, derived from the collation when empty.
    pub charset: Option<String>,
    /// Default collation, derived from the charset when empty.
    pub collation: Option<String>,
    pub comment: Option<String>,
    columns: Vec<Column>,
    keys: Vec<Key>,
    foreigns: Vec<Foreign>,
}

impl Table {
    /// Creates an empty table definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the declared columns.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the declared keys, including the ones backing foreign keys.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns the declared foreign keys.
    #[must_use]
    pub fn foreigns(&self) -> &[Foreign] {
        &self.foreigns
    }

    /// Sets the storage engine.
    pub fn engine(&mut self, engine: impl Into<String>) -> &mut Self {
        self.engine = Some(engine.into());
        self
    }

    /// Sets the default charset.
    pub fn charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = Some(charset.into());
        self
    }

    /// Sets the default collation.
    pub fn collation(&mut self, collation: impl Into<String>) -> &mut Self {
        self.collation = Some(collation.into());
        self
    }

    /// Sets the table comment.
    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    /// Adds a column.
    pub fn column(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<ColumnType>,
    ) -> &mut Self {
        self.columns.push(Column {
            field: name.into(),
            definition: definition.into(),
        });
        self
    }

    /// Adds an unsigned auto-increment `bigint` primary key.
    pub fn id(&mut self, name: &str) -> &mut Self {
        self.column(name, Integer::new().prefix("big").unsigned().autoincrement());
        self.primary([name])
    }

    /// Adds a `char(36)` primary key filled with `UUID()`.
    pub fn unique_id(&mut self, name: &str) -> &mut Self {
        self.uuid(name, "(UUID())", false);
        self.primary([name])
    }

    /// Adds a `tinyint(1)` flag column.
    pub fn boolean(&mut self, name: &str, default: &str) -> &mut Self {
        let mut definition = Integer::new().prefix("tiny").unsigned().precision(1);
        if !default.is_empty() {
            definition = definition.default_value(default);
        }
        self.column(name, definition)
    }

    /// Adds a `char(36)` column.
    pub fn uuid(&mut self, name: &str, default: &str, nullable: bool) -> &mut Self {
        let mut definition = Char::fixed(36);
        if !default.is_empty() {
            definition = definition.default_value(default);
        }
        definition.nullable = nullable;
        self.column(name, definition)
    }

    /// Adds `created_at` and `updated_at`; the latter refreshes on update.
    pub fn timestamps(&mut self) -> &mut Self {
        self.column(
            "created_at",
            Timable::new("timestamp").default_value("CURRENT_TIMESTAMP"),
        );
        self.column(
            "updated_at",
            Timable::new("timestamp")
                .default_value("CURRENT_TIMESTAMP")
                .on_update("CURRENT_TIMESTAMP"),
        )
    }

    /// Adds the primary key. No-op without columns.
    pub fn primary<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = Key::new(KeyKind::Primary, columns);
        if !key.columns.is_empty() {
            self.keys.push(key);
        }
        self
    }

    /// Adds a unique key named `{table}_{columns}_unique`. No-op without columns.
    pub fn unique<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = Key::new(KeyKind::Unique, columns);
        if !key.columns.is_empty() {
            let name = self.unique_key_name(&key.columns);
            self.keys.push(key.named(name));
        }
        self
    }

    /// Adds a plain index. No-op without columns.
    pub fn index<I, S>(&mut self, name: &str, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut key = Key::new(KeyKind::Index, columns);
        if !key.columns.is_empty() {
            if !name.is_empty() {
                key = key.named(name);
            }
            self.keys.push(key);
        }
        self
    }

    /// Adds a foreign key from `column` to `on`.`reference`, together with the
    /// index backing it. Both are named `{table}_{column}_foreign`.
    ///
    /// Empty action strings mean "no action clause". No-op without a column.
    pub fn foreign(
        &mut self,
        column: &str,
        reference: &str,
        on: &str,
        on_update: &str,
        on_delete: &str,
    ) -> &mut Self {
        if column.is_empty() {
            return self;
        }

        let name = self.foreign_key_name(column);
        self.keys.push(Key::new(KeyKind::Index, [column]).named(name.clone()));

        let mut foreign = Foreign::new(name, column, on, reference);
        if !on_update.is_empty() {
            foreign = foreign.on_update(on_update);
        }
        if !on_delete.is_empty() {
            foreign = foreign.on_delete(on_delete);
        }
        self.foreigns.push(foreign);
        self
    }

    /// Resolves the table charset and collation.
    ///
    /// Neither set: defaults. Collation only: charset is the collation prefix
    /// before the first underscore. Charset only: `{charset}_unicode_ci`.
    #[must_use]
    pub fn encoding(&self) -> (String, String) {
        let charset = self.charset.as_deref().filter(|c| !c.is_empty());
        let collation = self.collation.as_deref().filter(|c| !c.is_empty());

        match (charset, collation) {
            (None, None) => (
                DEFAULT_CHARSET.to_string(),
                DEFAULT_TABLE_COLLATION.to_string(),
            ),
            (None, Some(collation)) => {
                let charset = collation.split('_').next().unwrap_or(collation);
                (charset.to_string(), collation.to_string())
            }
            (Some(charset), None) => (charset.to_string(), format!("{charset}_unicode_ci")),
            (Some(charset), Some(collation)) => (charset.to_string(), collation.to_string()),
        }
    }

    /// Resolves the storage engine.
    #[must_use]
    pub fn resolved_engine(&self) -> &str {
        self.engine
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENGINE)
    }

    pub(crate) fn render_columns(&self) -> String {
        self.columns
            .iter()
            .map(Column::render)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn unique_key_name(&self, columns: &[String]) -> String {
        format!("{}_{}_unique", self.name, columns.join("_"))
    }

    fn foreign_key_name(&self, column: &str) -> String {
        format!("{}_{column}_foreign", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Text;

    #[test]
    fn test_column_render() {
        let mut table = Table::new("posts");
        table.column("title", Char::varchar(64)).column("body", Text::new());
        assert_eq!(
            table.render_columns(),
            "`title` varchar(64) COLLATE utf8mb4_unicode_ci NOT NULL, `body` text COLLATE utf8mb4_unicode_ci NOT NULL"
        );
    }

    #[test]
    fn test_id() {
        let mut table = Table::new("posts");
        table.id("id");
        assert_eq!(
            table.render_columns(),
            "`id` bigint unsigned NOT NULL AUTO_INCREMENT"
        );
        assert_eq!(table.keys()[0].render().as_deref(), Some("PRIMARY KEY (`id`)"));
    }

    #[test]
    fn test_unique_id() {
        let mut table = Table::new("posts");
        table.unique_id("id");
        assert_eq!(
            table.render_columns(),
            "`id` char(36) COLLATE utf8mb4_unicode_ci NOT NULL DEFAULT (UUID())"
        );
        assert_eq!(table.keys()[0].kind, KeyKind::Primary);
    }

    #[test]
    fn test_boolean_and_uuid() {
        let mut table = Table::new("flags");
        table.boolean("active", "1").uuid("token", "", true);
        assert_eq!(
            table.render_columns(),
            "`active` tinyint(1) unsigned NOT NULL DEFAULT 1, `token` char(36) COLLATE utf8mb4_unicode_ci NULL"
        );
    }

    #[test]
    fn test_timestamps() {
        let mut table = Table::new("posts");
        table.timestamps();
        assert_eq!(
            table.render_columns(),
            "`created_at` timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP, `updated_at` timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_keys_without_columns_are_ignored() {
        let mut table = Table::new("posts");
        table
            .primary(Vec::<String>::new())
            .unique(Vec::<String>::new())
            .index("idx", Vec::<String>::new());
        assert!(table.keys().is_empty());
    }

    #[test]
    fn test_foreign_without_column_is_ignored() {
        let mut table = Table::new("posts");
        table.id("id").foreign("", "id", "users", "", "cascade");

        assert_eq!(table.keys().len(), 1);
        assert!(table.foreigns().is_empty());

        let sql = crate::command::Command::CreateTable(table).to_sql().unwrap();
        assert!(!sql.contains("_foreign"));
    }

    #[test]
    fn test_unique_key_name() {
        let mut table = Table::new("users");
        table.unique(["email", "tenant_id"]);
        assert_eq!(
            table.keys()[0].name.as_deref(),
            Some("users_email_tenant_id_unique")
        );
    }

    #[test]
    fn test_foreign_adds_backing_index() {
        let mut table = Table::new("posts");
        table.foreign("user_id", "id", "users", "cascade", "");

        assert_eq!(table.keys().len(), 1);
        assert_eq!(
            table.keys()[0].render().as_deref(),
            Some("KEY `posts_user_id_foreign` (`user_id`)")
        );
        assert_eq!(
            table.foreigns()[0].render().as_deref(),
            Some("CONSTRAINT `posts_user_id_foreign` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON UPDATE CASCADE")
        );
    }

    #[test]
    fn test_encoding_defaults() {
        let table = Table::new("t");
        assert_eq!(
            table.encoding(),
            ("utf8mb4".to_string(), "utf8mb4_unicode_ci".to_string())
        );

        let mut table = Table::new("t");
        table.collation("utf8_general_ci");
        assert_eq!(
            table.encoding(),
            ("utf8".to_string(), "utf8_general_ci".to_string())
        );

        let mut table = Table::new("t");
        table.charset("utf8");
        assert_eq!(
            table.encoding(),
            ("utf8".to_string(), "utf8_unicode_ci".to_string())
        );

        let mut table = Table::new("t");
        table.charset("rand").collation("random_io");
        assert_eq!(
            table.encoding(),
            ("rand".to_string(), "random_io".to_string())
        );
    }

    #[test]
    fn test_engine_default() {
        let mut table = Table::new("t");
        assert_eq!(table.resolved_engine(), "InnoDB");
        table.engine("MyISAM");
        assert_eq!(table.resolved_engine(), "MyISAM");
    }
}
