//! Statement splitting and normalization.
//!
//! Raw DDL text is tokenized once, comments are dropped at the token level
//! (so literals containing `--` or `/*` are never corrupted), and the stream
//! is cut into top-level statements. Statements are tagged with a coarse
//! kind derived from their leading keywords and returned in source order.
//!
//! Splitting happens at parenthesis depth zero on:
//! - `;` statement terminators,
//! - `GO` batch separators,
//! - a `CREATE` or `ALTER` keyword starting a new statement when text has
//!   already accumulated (scripts frequently omit separators entirely).
//!
//! Nothing here ever fails: text that cannot be tokenized is returned as a
//! single statement classified by its leading words and ignored downstream.

use sqlparser::dialect::MsSqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

use super::token_cursor::render_token;

/// Coarse classification of a top-level SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    AlterTable,
    Other,
}

/// One top-level statement of the input document.
///
/// Immutable once produced; `text` is the comment-stripped source text.
#[derive(Debug, Clone)]
pub struct Statement {
    pub text: String,
    pub kind: StatementKind,
}

/// Split raw DDL text into statements, preserving source order.
pub fn split_statements(sql: &str) -> Vec<Statement> {
    let dialect = MsSqlDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize_with_location() {
        Ok(tokens) => tokens,
        // Untokenizable input degrades to a single statement; downstream
        // extraction is equally lenient.
        Err(_) => return vec![make_statement(sql.to_string())],
    };

    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for token_span in &tokens {
        let token = &token_span.token;
        match token {
            Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment(_)) => {
                current.push(' ');
            }
            Token::LParen => {
                depth += 1;
                current.push('(');
            }
            Token::RParen => {
                depth = depth.saturating_sub(1);
                current.push(')');
            }
            Token::SemiColon if depth == 0 => {
                flush(&mut statements, &mut current);
            }
            Token::Word(w) if depth == 0 && w.value.eq_ignore_ascii_case("GO") => {
                flush(&mut statements, &mut current);
            }
            Token::Word(w)
                if depth == 0
                    && w.quote_style.is_none()
                    && (w.keyword == Keyword::CREATE || w.keyword == Keyword::ALTER)
                    && !current.trim().is_empty() =>
            {
                flush(&mut statements, &mut current);
                current.push_str(&render_token(token));
            }
            _ => current.push_str(&render_token(token)),
        }
    }
    flush(&mut statements, &mut current);

    statements
}

fn flush(statements: &mut Vec<Statement>, current: &mut String) {
    let text = current.trim().to_string();
    current.clear();
    if !text.is_empty() {
        statements.push(make_statement(text));
    }
}

fn make_statement(text: String) -> Statement {
    let kind = classify(&text);
    Statement { text, kind }
}

/// Derive the statement kind from its two leading keywords.
fn classify(text: &str) -> StatementKind {
    let mut words = text.split_whitespace();
    let first = words.next().unwrap_or("");
    let second = words.next().unwrap_or("");

    if second.eq_ignore_ascii_case("TABLE") {
        if first.eq_ignore_ascii_case("CREATE") {
            return StatementKind::CreateTable;
        }
        if first.eq_ignore_ascii_case("ALTER") {
            return StatementKind::AlterTable;
        }
    }
    StatementKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_semicolons() {
        let statements = split_statements(
            "CREATE TABLE [A] ([Id] [int]); CREATE TABLE [B] ([Id] [int]);",
        );
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].kind, StatementKind::CreateTable);
        assert_eq!(statements[1].kind, StatementKind::CreateTable);
    }

    #[test]
    fn splits_on_go_separator() {
        let statements = split_statements(
            "CREATE TABLE [A] ([Id] [int])\nGO\nALTER TABLE [A] ADD CONSTRAINT [DF] DEFAULT (0) FOR [Id]\nGO",
        );
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].kind, StatementKind::CreateTable);
        assert_eq!(statements[1].kind, StatementKind::AlterTable);
    }

    #[test]
    fn splits_on_leading_keyword_without_separator() {
        let statements = split_statements(
            "CREATE TABLE [A] ([Id] [int])\nALTER TABLE [A] ADD CONSTRAINT [DF] DEFAULT (0) FOR [Id]",
        );
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].kind, StatementKind::AlterTable);
    }

    #[test]
    fn semicolon_inside_parens_does_not_split() {
        let statements = split_statements("CREATE TABLE [A] ([Note] [nvarchar](50) DEFAULT 'a;b')");
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn strips_comments_outside_literals() {
        let statements = split_statements(
            "-- leading comment\nCREATE TABLE [A] (/* cols */ [Id] [int])",
        );
        assert_eq!(statements.len(), 1);
        assert!(!statements[0].text.contains("comment"));
        assert!(!statements[0].text.contains("cols"));
        assert!(statements[0].text.contains("[Id]"));
    }

    #[test]
    fn comment_like_text_in_literal_survives() {
        let statements =
            split_statements("CREATE TABLE [A] ([Note] [nvarchar](50) DEFAULT '-- not a comment')");
        assert_eq!(statements.len(), 1);
        assert!(statements[0].text.contains("-- not a comment"));
    }

    #[test]
    fn non_ddl_is_classified_other() {
        let statements = split_statements("SELECT 1; DROP TABLE [A];");
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.kind == StatementKind::Other));
    }

    #[test]
    fn alter_without_table_is_other() {
        let statements = split_statements("ALTER VIEW [V] AS SELECT 1");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind, StatementKind::Other);
    }

    #[test]
    fn source_order_is_preserved() {
        let statements = split_statements(
            "ALTER TABLE [B] ADD CONSTRAINT [DF] DEFAULT (1) FOR [X];\nCREATE TABLE [B] ([X] [bit]);",
        );
        assert_eq!(statements[0].kind, StatementKind::AlterTable);
        assert_eq!(statements[1].kind, StatementKind::CreateTable);
    }

    #[test]
    fn empty_input_yields_no_statements() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("  \n-- only a comment\n").is_empty());
    }
}
