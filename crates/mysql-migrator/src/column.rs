//! Column type renderers.
//!
//! Every column type is a plain value describing one column definition
//! fragment. Rendering is a pure function of the value: the same value always
//! produces the same SQL text, and no configuration is ever rejected.
//!
//! The rendered fragment follows a fixed clause order:
//!
//! ```text
//! {type}[(precision[,scale])] [unsigned] [CHARACTER SET x] [COLLATE y]
//!     {NULL|NOT NULL} [DEFAULT d] [AUTO_INCREMENT] [ON UPDATE u] [COMMENT 'c']
//! ```

use std::fmt;
use std::sync::Arc;

/// Collation appended to string-like columns that set neither charset nor collation.
pub const DEFAULT_COLLATION: &str = "utf8mb4_unicode_ci";

/// Default placeholder normalized to an explicit empty string literal.
pub const EMPTY_DEFAULT: &str = "<empty>";

/// Null-like default placeholder, also normalized to an empty string literal.
pub const NIL_DEFAULT: &str = "<nil>";

/// Temporal types that accept a fractional seconds precision.
const PRECISION_TIME_TYPES: &[&str] = &["time", "datetime", "timestamp"];

/// Caller-supplied column renderer for types not covered by [`ColumnType`].
pub trait RenderColumn: fmt::Debug + Send + Sync {
    /// Renders the column definition (everything after the column name).
    fn render(&self) -> String;
}

/// A column definition in one of the supported MySQL type families.
#[derive(Debug, Clone)]
pub enum ColumnType {
    /// `{tiny,small,medium,big}int`.
    Integer(Integer),
    /// `float`, `real`, `double`, `decimal`, `numeric`.
    Floatable(Floatable),
    /// `date`, `time`, `datetime`, `timestamp`, `year`.
    Timable(Timable),
    /// `char` or `varchar`.
    String(Char),
    /// `{tiny,medium,long}text` or `{tiny,medium,long}blob`.
    Text(Text),
    /// `json`.
    Json(Json),
    /// `enum` or `set`.
    Enum(Enum),
    /// `bit`.
    Bit(Bit),
    /// `binary` or `varbinary`.
    Binary(Binary),
    /// Anything else, rendered by the caller.
    Custom(Arc<dyn RenderColumn>),
}

impl ColumnType {
    /// Wraps a caller-supplied renderer.
    pub fn custom(renderer: impl RenderColumn + 'static) -> Self {
        Self::Custom(Arc::new(renderer))
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Integer(c) => c.render(),
            Self::Floatable(c) => c.render(),
            Self::Timable(c) => c.render(),
            Self::String(c) => c.render(),
            Self::Text(c) => c.render(),
            Self::Json(c) => c.render(),
            Self::Enum(c) => c.render(),
            Self::Bit(c) => c.render(),
            Self::Binary(c) => c.render(),
            Self::Custom(c) => c.render(),
        }
    }
}

macro_rules! column_type_from {
    ($($ty:ident => $variant:ident),+ $(,)?) => {$(
        impl From<$ty> for ColumnType {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    )+};
}

column_type_from! {
    Integer => Integer,
    Floatable => Floatable,
    Timable => Timable,
    Char => String,
    Text => Text,
    Json => Json,
    Enum => Enum,
    Bit => Bit,
    Binary => Binary,
}

/// Builder setters shared by every column type.
macro_rules! column_attributes {
    ($($ty:ident),+ $(,)?) => {$(
        impl $ty {
            /// Allows NULL values.
            #[must_use]
            pub fn nullable(mut self) -> Self {
                self.nullable = true;
                self
            }

            /// Sets the default value.
            #[must_use]
            pub fn default_value(mut self, value: impl Into<String>) -> Self {
                self.default = Some(value.into());
                self
            }

            /// Sets the `ON UPDATE` clause.
            #[must_use]
            pub fn on_update(mut self, value: impl Into<String>) -> Self {
                self.on_update = Some(value.into());
                self
            }

            /// Sets the column comment.
            #[must_use]
            pub fn comment(mut self, value: impl Into<String>) -> Self {
                self.comment = Some(value.into());
                self
            }
        }
    )+};
}

column_attributes!(Integer, Floatable, Timable, Char, Text, Json, Enum, Bit, Binary);

/// Integer column: `int`, `tinyint`, `bigint`, ...
///
/// `Integer { prefix: "big".into(), unsigned: true, precision: 20, autoincrement: true, ..Default::default() }`
/// renders `bigint(20) unsigned NOT NULL AUTO_INCREMENT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Integer {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    /// `tiny`, `small`, `medium`, `big` or empty.
    pub prefix: String,
    pub unsigned: bool,
    /// Display width, omitted when zero.
    pub precision: u16,
    pub autoincrement: bool,
}

impl Integer {
    /// Creates a plain `int NOT NULL` column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the size prefix (`tiny`, `small`, `medium`, `big`).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Marks the column unsigned.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Sets the display width.
    #[must_use]
    pub fn precision(mut self, precision: u16) -> Self {
        self.precision = precision;
        self
    }

    /// Marks the column `AUTO_INCREMENT`.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = format!("{}int", self.prefix);
        push_precision(&mut sql, self.precision);
        if self.unsigned {
            sql.push_str(" unsigned");
        }
        push_nullability(&mut sql, self.nullable);
        push_raw_default(&mut sql, self.default.as_deref());
        if self.autoincrement {
            sql.push_str(" AUTO_INCREMENT");
        }
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// Floating point or fixed point number column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Floatable {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    /// `float` (when empty), `real`, `double`, `decimal`, `numeric`.
    pub kind: String,
    pub unsigned: bool,
    pub precision: u16,
    pub scale: u16,
}

impl Floatable {
    /// Creates a column of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Marks the column unsigned.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Sets the precision.
    #[must_use]
    pub fn precision(mut self, precision: u16) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the scale. A non-zero scale always renders the precision too.
    #[must_use]
    pub fn scale(mut self, scale: u16) -> Self {
        self.scale = scale;
        self
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = if self.kind.is_empty() {
            String::from("float")
        } else {
            self.kind.clone()
        };

        if self.scale > 0 {
            sql.push_str(&format!("({},{})", self.precision, self.scale));
        } else {
            push_precision(&mut sql, self.precision);
        }

        if self.unsigned {
            sql.push_str(" unsigned");
        }
        push_nullability(&mut sql, self.nullable);
        push_raw_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// Date and time column.
///
/// Precision is honoured only for `time`, `datetime` and `timestamp`, and only
/// within `1..=6`; anything else is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timable {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    /// `timestamp` (when empty), `date`, `time`, `datetime`, `year`.
    pub kind: String,
    pub precision: u16,
}

impl Timable {
    /// Creates a column of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Sets the fractional seconds precision.
    #[must_use]
    pub fn precision(mut self, precision: u16) -> Self {
        self.precision = precision;
        self
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = if self.kind.is_empty() {
            String::from("timestamp")
        } else {
            self.kind.clone()
        };

        let accepts_precision = PRECISION_TIME_TYPES.contains(&sql.to_lowercase().as_str());
        if accepts_precision && (1..=6).contains(&self.precision) {
            sql.push_str(&format!("({})", self.precision));
        }

        push_nullability(&mut sql, self.nullable);
        push_raw_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// Character string column: `char` when fixed, otherwise `varchar`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Char {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    /// `CHARACTER SET`.
    pub charset: Option<String>,
    /// `COLLATE`; falls back to [`DEFAULT_COLLATION`] when neither is set.
    pub collate: Option<String>,

    /// `char` instead of `varchar`.
    pub fixed: bool,
    pub precision: u16,
}

impl Char {
    /// Creates a `varchar(precision)` column.
    #[must_use]
    pub fn varchar(precision: u16) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Creates a `char(precision)` column.
    #[must_use]
    pub fn fixed(precision: u16) -> Self {
        Self {
            fixed: true,
            precision,
            ..Self::default()
        }
    }

    /// Sets the character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = String::from(if self.fixed { "char" } else { "varchar" });
        push_precision(&mut sql, self.precision);
        push_encoding(&mut sql, self.charset.as_deref(), self.collate.as_deref(), true);
        push_nullability(&mut sql, self.nullable);
        push_string_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// Long text column, or its binary `blob` counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    pub charset: Option<String>,
    pub collate: Option<String>,

    /// `tiny`, `medium`, `long` or empty.
    pub prefix: String,
    pub blob: bool,
}

impl Text {
    /// Creates a `text` column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `blob` column.
    #[must_use]
    pub fn blob() -> Self {
        Self {
            blob: true,
            ..Self::default()
        }
    }

    /// Sets the size prefix (`tiny`, `medium`, `long`).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = self.prefix.clone();
        sql.push_str(if self.blob { "blob" } else { "text" });
        push_encoding(
            &mut sql,
            self.charset.as_deref(),
            self.collate.as_deref(),
            !self.blob,
        );
        push_nullability(&mut sql, self.nullable);
        push_string_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// `json` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,
}

impl Json {
    /// Creates a `json NOT NULL` column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = String::from("json");
        push_nullability(&mut sql, self.nullable);
        push_string_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// Enumerated column: `enum` by default, `set` when `multiple`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    pub charset: Option<String>,
    pub collate: Option<String>,

    /// Allowed values, in declaration order.
    pub values: Vec<String>,
    /// Renders `set` instead of `enum`.
    pub multiple: bool,
}

impl Enum {
    /// Creates an `enum` over the given values.
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Renders as `set` instead of `enum`.
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Sets the character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = String::from(if self.multiple { "set" } else { "enum" });
        sql.push_str(&format!("('{}')", self.values.join("', '")));
        push_encoding(&mut sql, self.charset.as_deref(), self.collate.as_deref(), true);
        push_nullability(&mut sql, self.nullable);
        push_string_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// `bit` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bit {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    pub precision: u16,
}

impl Bit {
    /// Creates a `bit(precision)` column.
    #[must_use]
    pub fn new(precision: u16) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = String::from("bit");
        push_precision(&mut sql, self.precision);
        push_nullability(&mut sql, self.nullable);
        push_raw_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

/// Binary string column: `binary` when fixed, otherwise `varbinary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binary {
    /// `DEFAULT` value, see the type's quoting rules.
    pub default: Option<String>,
    /// Renders `NULL` instead of `NOT NULL`.
    pub nullable: bool,
    /// Column `COMMENT`.
    pub comment: Option<String>,
    /// `ON UPDATE` expression, emitted verbatim.
    pub on_update: Option<String>,

    pub fixed: bool,
    pub precision: u16,
}

impl Binary {
    /// Creates a `varbinary(precision)` column.
    #[must_use]
    pub fn varbinary(precision: u16) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Creates a `binary(precision)` column.
    #[must_use]
    pub fn fixed(precision: u16) -> Self {
        Self {
            fixed: true,
            precision,
            ..Self::default()
        }
    }

    /// Renders the column definition.
    #[must_use]
    pub fn render(&self) -> String {
        let mut sql = String::from(if self.fixed { "binary" } else { "varbinary" });
        push_precision(&mut sql, self.precision);
        push_nullability(&mut sql, self.nullable);
        push_raw_default(&mut sql, self.default.as_deref());
        push_trailer(&mut sql, self.on_update.as_deref(), self.comment.as_deref());
        sql
    }
}

fn push_precision(sql: &mut String, precision: u16) {
    if precision > 0 {
        sql.push_str(&format!("({precision})"));
    }
}

fn push_nullability(sql: &mut String, nullable: bool) {
    sql.push_str(if nullable { " NULL" } else { " NOT NULL" });
}

/// `CHARACTER SET` / `COLLATE` pair; the fallback collation applies only when
/// neither is set.
fn push_encoding(sql: &mut String, charset: Option<&str>, collate: Option<&str>, fallback: bool) {
    let charset = charset.filter(|c| !c.is_empty());
    let collate = collate.filter(|c| !c.is_empty());

    if let Some(charset) = charset {
        sql.push_str(" CHARACTER SET ");
        sql.push_str(charset);
    }

    match collate {
        Some(collate) => {
            sql.push_str(" COLLATE ");
            sql.push_str(collate);
        }
        None if fallback && charset.is_none() => {
            sql.push_str(" COLLATE ");
            sql.push_str(DEFAULT_COLLATION);
        }
        None => {}
    }
}

fn push_raw_default(sql: &mut String, default: Option<&str>) {
    if let Some(default) = default.filter(|d| !d.is_empty()) {
        sql.push_str(" DEFAULT ");
        sql.push_str(default);
    }
}

/// Quoted default for string-like columns. Parenthesized values are SQL
/// expressions and stay unquoted.
fn push_string_default(sql: &mut String, default: Option<&str>) {
    let Some(default) = default.filter(|d| !d.is_empty()) else {
        return;
    };

    if default.len() > 1 && default.starts_with('(') && default.ends_with(')') {
        sql.push_str(&format!(" DEFAULT {default}"));
        return;
    }

    let literal = if default == EMPTY_DEFAULT || default == NIL_DEFAULT {
        ""
    } else {
        default
    };
    sql.push_str(&format!(" DEFAULT '{literal}'"));
}

fn push_trailer(sql: &mut String, on_update: Option<&str>, comment: Option<&str>) {
    if let Some(on_update) = on_update.filter(|u| !u.is_empty()) {
        sql.push_str(" ON UPDATE ");
        sql.push_str(on_update);
    }
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        sql.push_str(&format!(" COMMENT '{comment}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Geometry;

    impl RenderColumn for Geometry {
        fn render(&self) -> String {
            String::from("geometry NOT NULL SRID 4326")
        }
    }

    #[test]
    fn test_integer_defaults() {
        assert_eq!(Integer::new().render(), "int NOT NULL");
        assert_eq!(Integer::new().prefix("super").render(), "superint NOT NULL");
        assert_eq!(Integer::new().precision(20).render(), "int(20) NOT NULL");
        assert_eq!(Integer::new().nullable().render(), "int NULL");
        assert_eq!(
            Integer::new().default_value("0").render(),
            "int NOT NULL DEFAULT 0"
        );
    }

    #[test]
    fn test_integer_big_autoincrement() {
        let column = Integer {
            prefix: "big".into(),
            unsigned: true,
            precision: 20,
            autoincrement: true,
            ..Default::default()
        };
        assert_eq!(column.render(), "bigint(20) unsigned NOT NULL AUTO_INCREMENT");
    }

    #[test]
    fn test_integer_full() {
        let column = Integer::new()
            .prefix("tiny")
            .unsigned()
            .precision(1)
            .nullable()
            .default_value("1")
            .on_update("set null")
            .comment("flag");
        assert_eq!(
            column.render(),
            "tinyint(1) unsigned NULL DEFAULT 1 ON UPDATE set null COMMENT 'flag'"
        );
    }

    #[test]
    fn test_floatable() {
        assert_eq!(Floatable::default().render(), "float NOT NULL");
        assert_eq!(Floatable::new("double").precision(20).render(), "double(20) NOT NULL");
        assert_eq!(
            Floatable::new("decimal").precision(10).scale(2).render(),
            "decimal(10,2) NOT NULL"
        );
        assert_eq!(
            Floatable::new("double").scale(2).unsigned().render(),
            "double(0,2) unsigned NOT NULL"
        );
        assert_eq!(
            Floatable::new("numeric").default_value("0.0").render(),
            "numeric NOT NULL DEFAULT 0.0"
        );
    }

    #[test]
    fn test_timable_precision_whitelist() {
        assert_eq!(Timable::default().render(), "timestamp NOT NULL");
        assert_eq!(Timable::new("date").precision(3).render(), "date NOT NULL");
        assert_eq!(Timable::new("timestamp").precision(7).render(), "timestamp NOT NULL");
        assert_eq!(Timable::new("TIMESTAMP").precision(6).render(), "TIMESTAMP(6) NOT NULL");
        assert_eq!(Timable::new("datetime").precision(3).render(), "datetime(3) NOT NULL");
    }

    #[test]
    fn test_timable_default_is_not_quoted() {
        let column = Timable::new("timestamp")
            .default_value("CURRENT_TIMESTAMP")
            .on_update("CURRENT_TIMESTAMP");
        assert_eq!(
            column.render(),
            "timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_char_collation_fallback() {
        assert_eq!(
            Char::default().render(),
            "varchar COLLATE utf8mb4_unicode_ci NOT NULL"
        );
        assert_eq!(
            Char::fixed(36).render(),
            "char(36) COLLATE utf8mb4_unicode_ci NOT NULL"
        );
        assert_eq!(
            Char::default().charset("utf8").render(),
            "varchar CHARACTER SET utf8 NOT NULL"
        );
        assert_eq!(
            Char::default().collate("utf8mb4_general_ci").render(),
            "varchar COLLATE utf8mb4_general_ci NOT NULL"
        );
    }

    #[test]
    fn test_char_full() {
        let column = Char::varchar(255)
            .charset("utf8mb4")
            .collate("utf8mb4_general_ci")
            .default_value("active");
        assert_eq!(
            column.render(),
            "varchar(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_general_ci NOT NULL DEFAULT 'active'"
        );
    }

    #[test]
    fn test_string_default_expression_and_sentinels() {
        assert_eq!(
            Char::fixed(36).default_value("(UUID())").render(),
            "char(36) COLLATE utf8mb4_unicode_ci NOT NULL DEFAULT (UUID())"
        );
        assert_eq!(
            Char::default().default_value(EMPTY_DEFAULT).render(),
            "varchar COLLATE utf8mb4_unicode_ci NOT NULL DEFAULT ''"
        );
        assert_eq!(
            Char::default().default_value(NIL_DEFAULT).render(),
            "varchar COLLATE utf8mb4_unicode_ci NOT NULL DEFAULT ''"
        );
    }

    #[test]
    fn test_text_and_blob() {
        assert_eq!(Text::new().render(), "text COLLATE utf8mb4_unicode_ci NOT NULL");
        assert_eq!(
            Text::new().prefix("medium").render(),
            "mediumtext COLLATE utf8mb4_unicode_ci NOT NULL"
        );
        assert_eq!(Text::blob().prefix("tiny").render(), "tinyblob NOT NULL");
        assert_eq!(
            Text::new()
                .prefix("long")
                .charset("utf8mb4")
                .collate("utf8mb4_general_ci")
                .default_value("write your text")
                .render(),
            "longtext CHARACTER SET utf8mb4 COLLATE utf8mb4_general_ci NOT NULL DEFAULT 'write your text'"
        );
    }

    #[test]
    fn test_json() {
        assert_eq!(Json::new().render(), "json NOT NULL");
        assert_eq!(
            Json::new().default_value("{}").on_update("{}").render(),
            "json NOT NULL DEFAULT '{}' ON UPDATE {}"
        );
        assert_eq!(
            Json::new().nullable().comment("user data").render(),
            "json NULL COMMENT 'user data'"
        );
    }

    #[test]
    fn test_enum_and_set() {
        assert_eq!(
            Enum::default().render(),
            "enum('') COLLATE utf8mb4_unicode_ci NOT NULL"
        );
        assert_eq!(
            Enum::new(["on", "off"])
                .nullable()
                .default_value("off")
                .render(),
            "enum('on', 'off') COLLATE utf8mb4_unicode_ci NULL DEFAULT 'off'"
        );
        assert_eq!(
            Enum::new(["1", "2", "3"])
                .multiple()
                .charset("utf8")
                .comment("options")
                .render(),
            "set('1', '2', '3') CHARACTER SET utf8 NOT NULL COMMENT 'options'"
        );
    }

    #[test]
    fn test_bit_and_binary() {
        assert_eq!(
            Bit::new(8).default_value("1").comment("code").render(),
            "bit(8) NOT NULL DEFAULT 1 COMMENT 'code'"
        );
        assert_eq!(Binary::default().render(), "varbinary NOT NULL");
        assert_eq!(
            Binary::fixed(36).default_value("1").render(),
            "binary(36) NOT NULL DEFAULT 1"
        );
        assert_eq!(
            Binary::varbinary(255).nullable().on_update("set null").render(),
            "varbinary(255) NULL ON UPDATE set null"
        );
    }

    #[test]
    fn test_column_type_dispatch() {
        let column: ColumnType = Integer::new().into();
        assert_eq!(column.render(), "int NOT NULL");

        let column = ColumnType::custom(Geometry);
        assert_eq!(column.render(), "geometry NOT NULL SRID 4326");
    }

    #[test]
    fn test_render_is_idempotent() {
        let column = Char::varchar(64).comment("title");
        assert_eq!(column.render(), column.render());
    }
}
