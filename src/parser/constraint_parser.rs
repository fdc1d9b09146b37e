//! Constraint clause parsing.
//!
//! Two constructs feed the model:
//!
//! Table-level primary keys, named or unnamed:
//! ```sql
//! CONSTRAINT [PK_Users] PRIMARY KEY CLUSTERED ([Id] ASC, [TenantId])
//! PRIMARY KEY ([Id])
//! ```
//!
//! Default constraints declared apart from the column definition, either
//! inside an ALTER TABLE ... ADD or as a constraint segment of the CREATE
//! body:
//! ```sql
//! CONSTRAINT [DF_Users_IsActive] DEFAULT ((1)) FOR [IsActive]
//! DEFAULT (GETDATE()) FOR [CreatedAt]
//! ```
//!
//! Extraction scans the whole fragment, so multiple constraints in one
//! ALTER statement are all found.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::column_parser::normalize_default_expr;
use super::token_cursor::TokenCursor;

/// A `DEFAULT <expr> FOR [column]` pair found in a statement fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDefault {
    /// Column the default applies to.
    pub column: String,
    /// Normalized default expression.
    pub expression: String,
}

/// Extract the column names of a table-level `PRIMARY KEY (...)` clause.
///
/// Returns an empty vector when the fragment holds no such clause. The
/// optional CLUSTERED/NONCLUSTERED hint and per-column ASC/DESC are skipped.
pub fn extract_primary_key_columns(fragment: &str) -> Vec<String> {
    let mut cursor = match TokenCursor::new(fragment) {
        Some(cursor) => cursor,
        None => return Vec::new(),
    };

    let mut columns = Vec::new();
    while !cursor.is_at_end() {
        if !cursor.check_keyword(Keyword::PRIMARY) {
            cursor.advance();
            continue;
        }
        cursor.advance();
        cursor.skip_whitespace();
        if cursor.expect_keyword(Keyword::KEY).is_none() {
            continue;
        }
        cursor.skip_whitespace();
        if cursor.check_keyword(Keyword::CLUSTERED) || cursor.check_word_ci("NONCLUSTERED") {
            cursor.advance();
            cursor.skip_whitespace();
        }
        columns.extend(parse_column_name_list(&mut cursor));
    }
    columns
}

/// Parse `([Col1] [ASC|DESC], [Col2], ...)`, returning the column names.
fn parse_column_name_list(cursor: &mut TokenCursor) -> Vec<String> {
    let mut columns = Vec::new();
    if !cursor.check_token(&Token::LParen) {
        return columns;
    }
    cursor.advance();

    loop {
        cursor.skip_whitespace();
        match cursor.parse_identifier() {
            Some(name) => columns.push(name),
            None => break,
        }
        cursor.skip_whitespace();

        // Skip ASC/DESC sort hints.
        if cursor.check_keyword(Keyword::ASC) || cursor.check_keyword(Keyword::DESC) {
            cursor.advance();
            cursor.skip_whitespace();
        }

        if cursor.check_token(&Token::Comma) {
            cursor.advance();
            continue;
        }
        break;
    }
    columns
}

/// Extract every `[CONSTRAINT [name]] DEFAULT <expr> FOR [column]` in a
/// statement fragment.
///
/// The `FOR` keyword is what distinguishes this form from an inline column
/// default, so plain `DEFAULT` clauses are never matched here.
pub fn extract_default_for_constraints(fragment: &str) -> Vec<ExtractedDefault> {
    let mut cursor = match TokenCursor::new(fragment) {
        Some(cursor) => cursor,
        None => return Vec::new(),
    };

    let mut defaults = Vec::new();
    while !cursor.is_at_end() {
        if !cursor.check_keyword(Keyword::DEFAULT) {
            cursor.advance();
            continue;
        }
        let default_pos = cursor.pos();
        cursor.advance();
        cursor.skip_whitespace();

        let expression = match parse_default_for_expression(&mut cursor) {
            Some(expression) => expression,
            None => {
                cursor.set_pos(default_pos + 1);
                continue;
            }
        };
        cursor.skip_whitespace();

        if cursor.expect_keyword(Keyword::FOR).is_none() {
            // Inline default without FOR; not this construct.
            cursor.set_pos(default_pos + 1);
            continue;
        }
        cursor.skip_whitespace();

        match cursor.parse_identifier() {
            Some(column) => defaults.push(ExtractedDefault { column, expression }),
            None => cursor.set_pos(default_pos + 1),
        }
    }
    defaults
}

/// Parse the default expression between DEFAULT and FOR.
fn parse_default_for_expression(cursor: &mut TokenCursor) -> Option<String> {
    if cursor.check_token(&Token::LParen) {
        let inner = cursor.consume_parenthesized()?;
        return Some(normalize_default_expr(&inner));
    }

    match cursor.current()? {
        Token::SingleQuotedString(s) | Token::NationalStringLiteral(s) => {
            let value = s.clone();
            cursor.advance();
            Some(value)
        }
        Token::Number(n, _) => {
            let value = n.clone();
            cursor.advance();
            Some(value)
        }
        Token::Minus => {
            cursor.advance();
            match cursor.current() {
                Some(Token::Number(n, _)) => {
                    let value = format!("-{}", n);
                    cursor.advance();
                    Some(value)
                }
                _ => None,
            }
        }
        Token::Word(w) if w.keyword != Keyword::FOR => {
            let word = w.value.clone();
            cursor.advance();
            cursor.skip_whitespace();
            if cursor.check_token(&Token::LParen) {
                let args = cursor.consume_parenthesized().unwrap_or_default();
                Some(format!("{}({})", word, args))
            } else {
                Some(word)
            }
        }
        _ => None,
    }
}
