//! Per-statement fact extraction.
//!
//! Given one statement, pulls out the table identity, the ordered column
//! definitions, the primary-key column set, and any `DEFAULT ... FOR`
//! constraints declared inside that statement. One malformed statement must
//! never abort the run: an unrecoverable table name degrades to the
//! "UnknownTable" sentinel and unrecognized segments are skipped.

use std::collections::HashSet;

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::column_parser::{parse_column_definition, ExtractedColumn};
use super::constraint_parser::{
    extract_default_for_constraints, extract_primary_key_columns, ExtractedDefault,
};
use super::splitter::Statement;
use super::token_cursor::TokenCursor;

/// Schema used for unqualified table names.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Table name used when no identity is syntactically recoverable.
pub const UNKNOWN_TABLE: &str = "UnknownTable";

/// Everything extractable from a single CREATE TABLE statement.
#[derive(Debug, Clone)]
pub struct ExtractedTable {
    pub schema: String,
    pub name: String,
    /// Column definitions in declaration order.
    pub columns: Vec<ExtractedColumn>,
    /// Union of inline and table-level primary-key column names.
    pub primary_keys: HashSet<String>,
    /// Default constraints declared as separate segments of this statement.
    pub defaults: Vec<ExtractedDefault>,
}

/// Table identity plus default constraints from an ALTER TABLE statement.
#[derive(Debug, Clone)]
pub struct ExtractedAlter {
    pub schema: String,
    pub name: String,
    pub defaults: Vec<ExtractedDefault>,
}

/// Extract facts from a CREATE TABLE statement.
pub fn extract_create_table(statement: &Statement) -> ExtractedTable {
    let (schema, name) = extract_table_identity(&statement.text, Keyword::CREATE);

    let mut columns = Vec::new();
    let mut primary_keys = HashSet::new();
    let mut defaults = Vec::new();

    for segment in body_segments(&statement.text) {
        match classify_segment(&segment) {
            SegmentKind::PrimaryKey => {
                primary_keys.extend(extract_primary_key_columns(&segment));
            }
            SegmentKind::Constraint => {
                // A named constraint segment may still hold a primary key
                // or a DEFAULT ... FOR declaration.
                primary_keys.extend(extract_primary_key_columns(&segment));
                defaults.extend(extract_default_for_constraints(&segment));
            }
            SegmentKind::ForeignKey => {}
            SegmentKind::Column => {
                if let Some(column) = parse_column_definition(&segment) {
                    if column.is_primary_key {
                        primary_keys.insert(column.name.clone());
                    }
                    columns.push(column);
                }
            }
        }
    }

    ExtractedTable {
        schema,
        name,
        columns,
        primary_keys,
        defaults,
    }
}

/// Extract the target identity and default constraints from an ALTER TABLE
/// statement.
pub fn extract_alter_table(statement: &Statement) -> ExtractedAlter {
    let (schema, name) = extract_table_identity(&statement.text, Keyword::ALTER);
    let defaults = extract_default_for_constraints(&statement.text);

    ExtractedAlter {
        schema,
        name,
        defaults,
    }
}

/// Extract `schema.table` after `CREATE TABLE` / `ALTER TABLE`.
///
/// Unqualified names resolve to [`DEFAULT_SCHEMA`]; failure resolves to the
/// [`UNKNOWN_TABLE`] sentinel instead of an error.
fn extract_table_identity(text: &str, leading: Keyword) -> (String, String) {
    let sentinel = || (DEFAULT_SCHEMA.to_string(), UNKNOWN_TABLE.to_string());

    let mut cursor = match TokenCursor::new(text) {
        Some(cursor) => cursor,
        None => return sentinel(),
    };

    cursor.skip_whitespace();
    if cursor.expect_keyword(leading).is_none() {
        return sentinel();
    }
    cursor.skip_whitespace();
    if cursor.expect_keyword(Keyword::TABLE).is_none() {
        return sentinel();
    }
    cursor.skip_whitespace();

    match cursor.parse_qualified_name() {
        Some((schema, name)) => (schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()), name),
        None => sentinel(),
    }
}

/// Split the column-definition block of a CREATE TABLE statement on
/// top-level commas.
///
/// The block is the region between the statement's outer parentheses.
/// Commas nested in a column's own parameter parentheses (`DECIMAL(18,2)`)
/// or in default expressions do not split; a parenthesis-depth counter over
/// the token stream decides.
fn body_segments(text: &str) -> Vec<String> {
    let body = match outer_paren_block(text) {
        Some(body) => body,
        None => return Vec::new(),
    };

    let mut cursor = match TokenCursor::new(&body) {
        Some(cursor) => cursor,
        None => return Vec::new(),
    };

    // Re-walk the body tokens, cutting at depth-zero commas.
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    while !cursor.is_at_end() {
        match cursor.current() {
            Some(Token::LParen) => {
                depth += 1;
                current.push('(');
            }
            Some(Token::RParen) => {
                depth = depth.saturating_sub(1);
                current.push(')');
            }
            Some(Token::Comma) if depth == 0 => {
                push_segment(&mut segments, &mut current);
            }
            Some(token) => current.push_str(&super::token_cursor::render_token(token)),
            None => break,
        }
        cursor.advance();
    }
    push_segment(&mut segments, &mut current);

    segments
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    let segment = current.trim().to_string();
    current.clear();
    if !segment.is_empty() {
        segments.push(segment);
    }
}

/// Return the text between the first top-level `(` and its matching `)`.
fn outer_paren_block(text: &str) -> Option<String> {
    let mut cursor = TokenCursor::new(text)?;
    while !cursor.is_at_end() {
        if cursor.check_token(&Token::LParen) {
            return cursor.consume_parenthesized();
        }
        cursor.advance();
    }
    None
}

enum SegmentKind {
    Column,
    PrimaryKey,
    Constraint,
    ForeignKey,
}

/// Classify one body segment by its leading keywords.
fn classify_segment(segment: &str) -> SegmentKind {
    let mut words = segment.split_whitespace();
    let first = words.next().unwrap_or("");
    let second = words.next().unwrap_or("");

    if first.eq_ignore_ascii_case("CONSTRAINT") {
        SegmentKind::Constraint
    } else if first.eq_ignore_ascii_case("PRIMARY") && second.eq_ignore_ascii_case("KEY") {
        SegmentKind::PrimaryKey
    } else if first.eq_ignore_ascii_case("FOREIGN") && second.eq_ignore_ascii_case("KEY") {
        SegmentKind::ForeignKey
    } else {
        SegmentKind::Column
    }
}
