//! Table keys (indexes).

/// Kind of key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyKind {
    /// Plain, non-unique index.
    #[default]
    Index,
    /// `PRIMARY KEY`.
    Primary,
    /// `UNIQUE KEY`.
    Unique,
}

impl KeyKind {
    /// Parses a key type name case-insensitively. Unknown names are a plain index.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "PRIMARY" => Self::Primary,
            "UNIQUE" => Self::Unique,
            _ => Self::Index,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Index => "KEY",
            Self::Primary => "PRIMARY KEY",
            Self::Unique => "UNIQUE KEY",
        }
    }
}

/// A key over an ordered list of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key {
    pub name: Option<String>,
    pub kind: KeyKind,
    pub columns: Vec<String>,
}

impl Key {
    /// Creates an unnamed key of the given kind.
    #[must_use]
    pub fn new<I, S>(kind: KeyKind, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            kind,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the key name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Renders the key definition, or `None` when it covers no columns.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        if self.columns.is_empty() {
            return None;
        }

        let mut sql = String::from(self.kind.keyword());
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            sql.push_str(&format!(" `{name}`"));
        }
        sql.push_str(&format!(" (`{}`)", self.columns.join("`, `")));
        Some(sql)
    }
}

/// Renders every renderable key, comma separated.
pub(crate) fn render_keys(keys: &[Key]) -> String {
    keys.iter()
        .filter_map(Key::render)
        .collect::<Vec<_>>()
        .join(", ")
}
