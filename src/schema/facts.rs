//! In-memory schema facts, independent of any target language.

use std::collections::HashSet;
use std::fmt;

/// Identity of one table: schema plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId {
    pub schema: String,
    pub name: String,
}

impl TableId {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}].[{}]", self.schema, self.name)
    }
}

/// Structural facts for one column.
#[derive(Debug, Clone)]
pub struct ColumnFact {
    /// Column name as declared.
    pub name: String,
    /// Uppercase type name without parameters (e.g. "NVARCHAR").
    pub type_name: String,
    /// Type name exactly as declared in the source (e.g. "datetime2").
    pub declared_type: String,
    /// Raw type parameters (e.g. "50", "18,2", "max").
    pub type_params: Option<String>,
    /// Nullable unless NOT NULL was declared.
    pub nullable: bool,
    /// Default captured at column-definition time.
    pub inline_default: Option<String>,
    /// Default merged in from a separately declared constraint. Takes
    /// precedence over `inline_default` regardless of arrival order.
    pub constraint_default: Option<String>,
}

impl ColumnFact {
    /// The default that wins after precedence resolution, if any.
    pub fn resolved_default(&self) -> Option<&str> {
        self.constraint_default
            .as_deref()
            .or(self.inline_default.as_deref())
    }

    /// Declared type text including parameters, e.g. "datetime2(7)", in the
    /// source's own casing.
    pub fn full_type(&self) -> String {
        match &self.type_params {
            Some(params) => format!("{}({})", self.declared_type, params),
            None => self.declared_type.clone(),
        }
    }
}

/// Aggregate facts for one table.
#[derive(Debug, Clone)]
pub struct TableFact {
    pub id: TableId,
    /// Columns in declaration order; names are unique.
    pub columns: Vec<ColumnFact>,
    /// Names of primary-key columns.
    pub primary_keys: HashSet<String>,
}

impl TableFact {
    /// Record a constraint-declared default for a column.
    ///
    /// Overwrites any earlier default for the column, so exactly one
    /// default survives no matter how many sources named it. Unknown
    /// columns are ignored.
    pub fn apply_default(&mut self, column: &str, expression: &str) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.name == column) {
            col.constraint_default = Some(expression.to_string());
        }
    }
}

/// A default constraint whose target table may not exist yet.
#[derive(Debug, Clone)]
pub struct DefaultConstraintFact {
    pub table: TableId,
    pub column: String,
    pub expression: String,
}
