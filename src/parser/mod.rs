//! T-SQL statement splitting and fact extraction

mod column_parser;
mod constraint_parser;
mod splitter;
mod table_parser;
mod token_cursor;

pub use column_parser::{parse_column_definition, ExtractedColumn};
pub use constraint_parser::{
    extract_default_for_constraints, extract_primary_key_columns, ExtractedDefault,
};
pub use splitter::{split_statements, Statement, StatementKind};
pub use table_parser::{
    extract_alter_table, extract_create_table, ExtractedAlter, ExtractedTable, DEFAULT_SCHEMA,
    UNKNOWN_TABLE,
};
