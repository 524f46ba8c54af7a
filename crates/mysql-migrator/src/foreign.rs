//! Foreign key constraints.

/// Referential action for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceAction {
    /// `SET NULL`: clear the referencing column.
    SetNull,
    /// `CASCADE`: propagate the change to referencing rows.
    Cascade,
    /// `RESTRICT`: reject the change.
    Restrict,
    /// `NO ACTION`: reject the change, checked at statement end.
    NoAction,
    /// `SET DEFAULT`: reset the referencing column to its default.
    SetDefault,
}

impl ReferenceAction {
    /// Parses an action case-insensitively. Anything outside the whitelist is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "SET NULL" => Some(Self::SetNull),
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" => Some(Self::Restrict),
            "NO ACTION" => Some(Self::NoAction),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }

    /// Returns the SQL representation of the action.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::SetNull => "SET NULL",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A foreign key constraint from `column` to `on`.`reference`.
///
/// Actions are kept as given and validated at render time; invalid ones are
/// left out of the SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Foreign {
    /// Constraint name.
    pub key: String,
    /// Source column.
    pub column: String,
    /// Referenced column.
    pub reference: String,
    /// Referenced table.
    pub on: String,
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
}

impl Foreign {
    /// Creates a constraint without referential actions.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        column: impl Into<String>,
        on: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            column: column.into(),
            reference: reference.into(),
            on: on.into(),
            on_update: None,
            on_delete: None,
        }
    }

    /// Sets the `ON UPDATE` action.
    #[must_use]
    pub fn on_update(mut self, action: impl Into<String>) -> Self {
        self.on_update = Some(action.into());
        self
    }

    /// Sets the `ON DELETE` action.
    #[must_use]
    pub fn on_delete(mut self, action: impl Into<String>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    /// Renders the constraint, or `None` when an identifier is missing.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        if self.key.is_empty()
            || self.column.is_empty()
            || self.on.is_empty()
            || self.reference.is_empty()
        {
            return None;
        }

        let mut sql = format!(
            "CONSTRAINT `{}` FOREIGN KEY (`{}`) REFERENCES `{}` (`{}`)",
            self.key, self.column, self.on, self.reference
        );
        if let Some(action) = self.on_delete.as_deref().and_then(ReferenceAction::parse) {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = self.on_update.as_deref().and_then(ReferenceAction::parse) {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        Some(sql)
    }
}

pub(crate) fn render_foreigns(foreigns: &[Foreign]) -> String {
    foreigns
        .iter()
        .filter_map(Foreign::render)
        .collect::<Vec<_>>()
        .join(", ")
}
