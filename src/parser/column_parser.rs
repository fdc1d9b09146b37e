//! Column definition parsing.
//!
//! Parses one comma-separated segment of a CREATE TABLE body against the
//! grammar:
//!
//! ```sql
//! [Name] [type] [(params)] [NULL | NOT NULL] [DEFAULT expr]
//! ```
//!
//! Both the column name and the type name may be bracket-quoted or bare.
//! Trailing T-SQL noise (IDENTITY, inline PRIMARY KEY, CLUSTERED, UNIQUE)
//! is tolerated: IDENTITY and index hints are skipped, an inline PRIMARY
//! KEY sets a flag for the caller's primary-key set.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::token_cursor::TokenCursor;

/// Facts extracted from a single column definition segment.
#[derive(Debug, Clone, Default)]
pub struct ExtractedColumn {
    /// Column name, unquoted.
    pub name: String,
    /// Uppercase type name without parameters (e.g. "NVARCHAR").
    pub type_name: String,
    /// Type name exactly as written in the source, unquoted (e.g. "datetime2").
    pub declared_type: String,
    /// Raw type parameters, if any (e.g. "50", "18,2", "max").
    pub type_params: Option<String>,
    /// Explicit nullability; `None` means no keyword was present.
    pub nullability: Option<bool>,
    /// Inline DEFAULT expression, normalized.
    pub default_value: Option<String>,
    /// Whether the column carried an inline PRIMARY KEY marker.
    pub is_primary_key: bool,
}

/// Parse one column definition segment.
///
/// Returns `None` for segments that do not start with a `name type` pair;
/// the caller treats those as non-column noise.
pub fn parse_column_definition(segment: &str) -> Option<ExtractedColumn> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    let mut cursor = TokenCursor::new(segment)?;
    cursor.skip_whitespace();

    let name = cursor.parse_identifier()?;
    cursor.skip_whitespace();

    let declared_type = cursor.parse_identifier()?;
    let type_name = declared_type.to_uppercase();
    cursor.skip_whitespace();

    let type_params = cursor.consume_parenthesized();

    let mut column = ExtractedColumn {
        name,
        type_name,
        declared_type,
        type_params,
        ..Default::default()
    };

    parse_column_tail(&mut cursor, &mut column);
    Some(column)
}

/// Consume the modifiers after `name type [(params)]` in any order.
fn parse_column_tail(cursor: &mut TokenCursor, column: &mut ExtractedColumn) {
    loop {
        cursor.skip_whitespace();
        if cursor.is_at_end() {
            break;
        }

        if cursor.check_keyword(Keyword::NOT) {
            cursor.advance();
            cursor.skip_whitespace();
            if cursor.expect_keyword(Keyword::NULL).is_some() {
                column.nullability = Some(false);
            }
            continue;
        }

        if cursor.check_keyword(Keyword::NULL) {
            cursor.advance();
            if column.nullability.is_none() {
                column.nullability = Some(true);
            }
            continue;
        }

        if cursor.check_keyword(Keyword::DEFAULT) {
            cursor.advance();
            cursor.skip_whitespace();
            column.default_value = parse_default_expression(cursor);
            continue;
        }

        // CONSTRAINT [name] naming the inline default; the name itself is
        // irrelevant to the model.
        if cursor.check_keyword(Keyword::CONSTRAINT) {
            cursor.advance();
            cursor.skip_whitespace();
            let _ = cursor.parse_identifier();
            continue;
        }

        if cursor.check_keyword(Keyword::PRIMARY) {
            cursor.advance();
            cursor.skip_whitespace();
            if cursor.expect_keyword(Keyword::KEY).is_some() {
                column.is_primary_key = true;
            }
            continue;
        }

        if cursor.check_keyword(Keyword::IDENTITY) {
            cursor.advance();
            cursor.skip_whitespace();
            let _ = cursor.consume_parenthesized();
            continue;
        }

        if cursor.check_keyword(Keyword::CLUSTERED)
            || cursor.check_word_ci("NONCLUSTERED")
            || cursor.check_keyword(Keyword::UNIQUE)
            || cursor.check_word_ci("ROWGUIDCOL")
        {
            cursor.advance();
            continue;
        }

        // Unknown token; stop rather than loop forever.
        break;
    }
}

/// Parse the expression after DEFAULT and normalize it.
fn parse_default_expression(cursor: &mut TokenCursor) -> Option<String> {
    // Parenthesized form: DEFAULT ((0)), DEFAULT (GETDATE())
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
        Token::Word(w) => {
            // Bare word: NULL, or a function call like GETDATE().
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

/// Strip surrounding parentheses and quotes from a default expression.
///
/// `((0))` becomes `0`, `'Pending'` becomes `Pending`, `(GETDATE())`
/// becomes `GETDATE()`. Only parens that wrap the whole expression are
/// removed, so `GETDATE()` is untouched.
pub fn normalize_default_expr(expr: &str) -> String {
    let mut value = expr.trim();

    while value.len() >= 2 && value.starts_with('(') && value.ends_with(')') {
        if !parens_wrap_whole(value) {
            break;
        }
        value = value[1..value.len() - 1].trim();
    }

    if value.len() >= 2
        && ((value.starts_with('\'') && value.ends_with('\''))
            || (value.starts_with('"') && value.ends_with('"')))
    {
        value = &value[1..value.len() - 1];
    }

    value.to_string()
}

/// Check that the leading `(` closes at the final character.
fn parens_wrap_whole(expr: &str) -> bool {
    let mut depth = 0i32;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i == expr.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_column() {
        let col = parse_column_definition("[Id] [int]").unwrap();
        assert_eq!(col.name, "Id");
        assert_eq!(col.type_name, "INT");
        assert!(col.type_params.is_none());
        assert!(col.nullability.is_none());
    }

    #[test]
    fn unbracketed_column() {
        let col = parse_column_definition("UserName VARCHAR(50) NOT NULL").unwrap();
        assert_eq!(col.name, "UserName");
        assert_eq!(col.type_name, "VARCHAR");
        assert_eq!(col.type_params.as_deref(), Some("50"));
        assert_eq!(col.nullability, Some(false));
    }

    #[test]
    fn declared_type_casing_is_kept() {
        let col = parse_column_definition("[When] [datetime2](7) NOT NULL").unwrap();
        assert_eq!(col.type_name, "DATETIME2");
        assert_eq!(col.declared_type, "datetime2");
    }

    #[test]
    fn nullable_keyword() {
        let col = parse_column_definition("[Name] [nvarchar](50) NULL").unwrap();
        assert_eq!(col.type_name, "NVARCHAR");
        assert_eq!(col.nullability, Some(true));
    }

    #[test]
    fn decimal_params_keep_scale() {
        let col = parse_column_definition("[Price] [decimal](18,2) NOT NULL").unwrap();
        assert_eq!(col.type_name, "DECIMAL");
        assert_eq!(col.type_params.as_deref(), Some("18,2"));
    }

    #[test]
    fn max_parameter() {
        let col = parse_column_definition("[Body] [nvarchar](max)").unwrap();
        assert_eq!(col.type_params.as_deref(), Some("max"));
    }

    #[test]
    fn inline_default_number() {
        let col = parse_column_definition("[Qty] [int] NOT NULL DEFAULT ((0))").unwrap();
        assert_eq!(col.default_value.as_deref(), Some("0"));
    }

    #[test]
    fn inline_default_string_is_unquoted() {
        let col = parse_column_definition("[Status] [varchar](20) DEFAULT 'Pending'").unwrap();
        assert_eq!(col.default_value.as_deref(), Some("Pending"));
    }

    #[test]
    fn inline_default_function_call() {
        let col = parse_column_definition("[CreatedAt] [datetime] DEFAULT GETDATE()").unwrap();
        assert_eq!(col.default_value.as_deref(), Some("GETDATE()"));
    }

    #[test]
    fn inline_default_parenthesized_function() {
        let col = parse_column_definition("[CreatedAt] [datetime] DEFAULT (GETDATE())").unwrap();
        assert_eq!(col.default_value.as_deref(), Some("GETDATE()"));
    }

    #[test]
    fn named_inline_default() {
        let col = parse_column_definition(
            "[IsActive] [bit] NOT NULL CONSTRAINT [DF_IsActive] DEFAULT ((1))",
        )
        .unwrap();
        assert_eq!(col.default_value.as_deref(), Some("1"));
        assert_eq!(col.nullability, Some(false));
    }

    #[test]
    fn inline_primary_key() {
        let col = parse_column_definition("[Id] [int] NOT NULL PRIMARY KEY CLUSTERED").unwrap();
        assert!(col.is_primary_key);
    }

    #[test]
    fn identity_is_skipped() {
        let col = parse_column_definition("[Id] [int] IDENTITY(1,1) NOT NULL").unwrap();
        assert_eq!(col.name, "Id");
        assert_eq!(col.nullability, Some(false));
    }

    #[test]
    fn negative_default() {
        let col = parse_column_definition("[Offset] [int] DEFAULT -1").unwrap();
        assert_eq!(col.default_value.as_deref(), Some("-1"));
    }

    #[test]
    fn not_a_column() {
        assert!(parse_column_definition("").is_none());
        assert!(parse_column_definition("   ").is_none());
    }

    #[test]
    fn normalize_strips_nested_parens_only_when_wrapping() {
        assert_eq!(normalize_default_expr("((0))"), "0");
        assert_eq!(normalize_default_expr("(GETDATE())"), "GETDATE()");
        assert_eq!(normalize_default_expr("GETDATE()"), "GETDATE()");
        assert_eq!(normalize_default_expr("'x'"), "x");
        assert_eq!(normalize_default_expr("(1)+(2)"), "(1)+(2)");
    }
}
