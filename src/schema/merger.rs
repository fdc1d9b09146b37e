//! Cross-statement merging.
//!
//! Walks the statement sequence once, left to right, keeping a map of
//! finalized tables (in first-CREATE order) and a pending pool of default
//! constraints whose target table has not been created yet. A default
//! declared via ALTER TABLE applies identically whether it appears before
//! or after its CREATE TABLE; pending facts are applied and consumed the
//! moment the table appears, and orphans are dropped at end of run.

use std::collections::HashMap;

use crate::parser::{
    extract_alter_table, extract_create_table, ExtractedColumn, ExtractedTable, Statement,
    StatementKind,
};
use crate::schema::facts::{ColumnFact, DefaultConstraintFact, TableFact, TableId};

/// Accumulates table facts across one document's statements.
pub struct Merger {
    tables: Vec<TableFact>,
    index: HashMap<TableId, usize>,
    pending: HashMap<TableId, Vec<DefaultConstraintFact>>,
}

impl Merger {
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            index: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    /// Process one statement in source order.
    pub fn observe(&mut self, statement: &Statement) {
        match statement.kind {
            StatementKind::CreateTable => self.observe_create(statement),
            StatementKind::AlterTable => self.observe_alter(statement),
            StatementKind::Other => {}
        }
    }

    fn observe_create(&mut self, statement: &Statement) {
        let extracted = extract_create_table(statement);
        let id = TableId::new(extracted.schema.clone(), extracted.name.clone());

        // First CREATE wins; a duplicate CREATE for the same identity is
        // ignored.
        if self.index.contains_key(&id) {
            return;
        }

        let mut table = build_table_fact(id.clone(), &extracted);

        // Defaults declared as constraint segments of this CREATE.
        for default in &extracted.defaults {
            table.apply_default(&default.column, &default.expression);
        }

        // Defaults that arrived before the CREATE, consumed exactly once.
        if let Some(pending) = self.pending.remove(&id) {
            for fact in pending {
                table.apply_default(&fact.column, &fact.expression);
            }
        }

        self.index.insert(id, self.tables.len());
        self.tables.push(table);
    }

    fn observe_alter(&mut self, statement: &Statement) {
        let extracted = extract_alter_table(statement);
        let id = TableId::new(extracted.schema, extracted.name);

        for default in extracted.defaults {
            let fact = DefaultConstraintFact {
                table: id.clone(),
                column: default.column,
                expression: default.expression,
            };
            match self.index.get(&id) {
                Some(&slot) => {
                    self.tables[slot].apply_default(&fact.column, &fact.expression);
                }
                None => {
                    self.pending.entry(id.clone()).or_default().push(fact);
                }
            }
        }
    }

    /// Finish the pass, returning finalized tables in first-seen order.
    ///
    /// Pending facts whose table never appeared are dropped here.
    pub fn finish(self) -> Vec<TableFact> {
        self.tables
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge a whole statement sequence into finalized table facts.
pub fn merge_statements(statements: &[Statement]) -> Vec<TableFact> {
    let mut merger = Merger::new();
    for statement in statements {
        merger.observe(statement);
    }
    merger.finish()
}

fn build_table_fact(id: TableId, extracted: &ExtractedTable) -> TableFact {
    let mut columns: Vec<ColumnFact> = Vec::with_capacity(extracted.columns.len());

    for col in &extracted.columns {
        // Column names are unique within a table; a duplicate definition
        // keeps the first occurrence.
        if columns.iter().any(|c| c.name == col.name) {
            continue;
        }
        columns.push(column_fact(col));
    }

    TableFact {
        id,
        columns,
        primary_keys: extracted.primary_keys.clone(),
    }
}

fn column_fact(col: &ExtractedColumn) -> ColumnFact {
    ColumnFact {
        name: col.name.clone(),
        type_name: col.type_name.clone(),
        declared_type: col.declared_type.clone(),
        type_params: col.type_params.clone(),
        nullable: col.nullability.unwrap_or(true),
        inline_default: col.default_value.clone(),
        constraint_default: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::split_statements;

    fn merge(sql: &str) -> Vec<TableFact> {
        merge_statements(&split_statements(sql))
    }

    #[test]
    fn create_then_alter_applies_default() {
        let tables = merge(
            "CREATE TABLE [dbo].[Users] ([IsActive] [bit] NOT NULL);\n\
             ALTER TABLE [dbo].[Users] ADD CONSTRAINT [DF] DEFAULT ((1)) FOR [IsActive];",
        );
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].columns[0].resolved_default(), Some("1"));
    }

    #[test]
    fn alter_before_create_is_equivalent() {
        let forward = merge(
            "CREATE TABLE [T] ([A] [int]);\n\
             ALTER TABLE [T] ADD CONSTRAINT [DF] DEFAULT ((7)) FOR [A];",
        );
        let reversed = merge(
            "ALTER TABLE [T] ADD CONSTRAINT [DF] DEFAULT ((7)) FOR [A];\n\
             CREATE TABLE [T] ([A] [int]);",
        );
        assert_eq!(forward.len(), 1);
        assert_eq!(reversed.len(), 1);
        assert_eq!(
            forward[0].columns[0].resolved_default(),
            reversed[0].columns[0].resolved_default()
        );
    }

    #[test]
    fn constraint_default_overrides_inline_either_order() {
        let after = merge(
            "CREATE TABLE [T] ([A] [int] DEFAULT ((0)));\n\
             ALTER TABLE [T] ADD CONSTRAINT [DF] DEFAULT ((9)) FOR [A];",
        );
        assert_eq!(after[0].columns[0].resolved_default(), Some("9"));

        let before = merge(
            "ALTER TABLE [T] ADD CONSTRAINT [DF] DEFAULT ((9)) FOR [A];\n\
             CREATE TABLE [T] ([A] [int] DEFAULT ((0)));",
        );
        assert_eq!(before[0].columns[0].resolved_default(), Some("9"));
    }

    #[test]
    fn dangling_alter_produces_no_table() {
        let tables = merge("ALTER TABLE [Ghost] ADD CONSTRAINT [DF] DEFAULT ((1)) FOR [A];");
        assert!(tables.is_empty());
    }

    #[test]
    fn tables_in_first_seen_order() {
        let tables = merge(
            "CREATE TABLE [B] ([X] [int]);\n\
             CREATE TABLE [A] ([X] [int]);",
        );
        let names: Vec<&str> = tables.iter().map(|t| t.id.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn duplicate_create_keeps_first() {
        let tables = merge(
            "CREATE TABLE [T] ([A] [int]);\n\
             CREATE TABLE [T] ([B] [int]);",
        );
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].columns[0].name, "A");
    }

    #[test]
    fn duplicate_column_keeps_first() {
        let tables = merge("CREATE TABLE [T] ([A] [int] NOT NULL, [A] [bigint]);");
        assert_eq!(tables[0].columns.len(), 1);
        assert_eq!(tables[0].columns[0].type_name, "INT");
    }

    #[test]
    fn tables_with_same_name_in_different_schemas_are_distinct() {
        let tables = merge(
            "CREATE TABLE [a].[T] ([X] [int]);\n\
             CREATE TABLE [b].[T] ([X] [int]);",
        );
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn default_in_create_constraint_segment() {
        let tables = merge(
            "CREATE TABLE [T] ([S] [varchar](20) NOT NULL, CONSTRAINT [DF_S] DEFAULT ('New') FOR [S]);",
        );
        assert_eq!(tables[0].columns[0].resolved_default(), Some("New"));
    }

    #[test]
    fn other_statements_are_ignored() {
        let tables = merge(
            "SELECT 1;\nCREATE TABLE [T] ([A] [int]);\nDROP TABLE [T];",
        );
        assert_eq!(tables.len(), 1);
    }
}
