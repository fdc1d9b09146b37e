//! Shared token navigation for T-SQL fragments.
//!
//! Every extraction rule in this crate works on the token stream produced by
//! sqlparser's `MsSqlDialect` tokenizer rather than on raw text, so bracketed
//! identifiers, string literals, and comments are always handled correctly.
//! The cursor owns the token vector and exposes the small set of navigation
//! and reconstruction helpers the grammar rules share.

use sqlparser::dialect::MsSqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer, Whitespace};

/// Cursor over a tokenized T-SQL fragment.
pub struct TokenCursor {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
}

impl TokenCursor {
    /// Tokenize a SQL fragment with `MsSqlDialect`.
    ///
    /// Returns `None` if tokenization fails; callers degrade to sentinel
    /// behavior rather than aborting the run.
    pub fn new(sql: &str) -> Option<Self> {
        let dialect = MsSqlDialect {};
        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize_with_location()
            .ok()?;

        Some(Self { tokens, pos: 0 })
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    #[inline]
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Skip whitespace tokens, including comments.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(Token::Whitespace(_))) {
            self.advance();
        }
    }

    /// Check if the current token is a specific keyword.
    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current(), Some(Token::Word(w)) if w.keyword == keyword)
    }

    /// Check if the current token is a word matching case-insensitively.
    ///
    /// Needed for T-SQL words sqlparser has no `Keyword` for (e.g. "GO",
    /// "NONCLUSTERED").
    #[inline]
    pub fn check_word_ci(&self, word: &str) -> bool {
        matches!(self.current(), Some(Token::Word(w)) if w.value.eq_ignore_ascii_case(word))
    }

    /// Check the current token type by discriminant, ignoring inner values.
    #[inline]
    pub fn check_token(&self, expected: &Token) -> bool {
        match self.current() {
            Some(token) => std::mem::discriminant(token) == std::mem::discriminant(expected),
            None => false,
        }
    }

    /// Consume a specific keyword. Position is unchanged on mismatch.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Option<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    /// Parse an identifier, bracketed or bare, returning the unquoted value.
    pub fn parse_identifier(&mut self) -> Option<String> {
        match self.current() {
            Some(Token::Word(w)) => {
                let name = w.value.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Parse `[schema].[name]`, `schema.name`, `[name]`, or `name`.
    ///
    /// Returns `(schema, name)` with `schema` as `None` for unqualified
    /// names; the caller decides the default schema.
    pub fn parse_qualified_name(&mut self) -> Option<(Option<String>, String)> {
        let first = self.parse_identifier()?;
        self.skip_whitespace();

        if self.check_token(&Token::Period) {
            self.advance();
            self.skip_whitespace();
            let second = self.parse_identifier()?;
            Some((Some(first), second))
        } else {
            Some((None, first))
        }
    }

    /// Consume a parenthesized section, returning the inner content as text.
    ///
    /// Handles nested parentheses. Position must be at the opening paren;
    /// returns `None` otherwise. The outer parens are not included.
    pub fn consume_parenthesized(&mut self) -> Option<String> {
        if !self.check_token(&Token::LParen) {
            return None;
        }
        self.advance();

        let mut depth = 1usize;
        let mut content = String::new();

        while !self.is_at_end() && depth > 0 {
            match self.current() {
                Some(Token::LParen) => {
                    depth += 1;
                    content.push('(');
                }
                Some(Token::RParen) => {
                    depth -= 1;
                    if depth > 0 {
                        content.push(')');
                    }
                }
                Some(token) => content.push_str(&render_token(token)),
                None => break,
            }
            self.advance();
        }

        Some(content.trim().to_string())
    }
}

/// Render a single token back to T-SQL text, preserving quote style.
///
/// Comments render as a single space so that stripping them never glues two
/// neighboring tokens together.
pub fn render_token(token: &Token) -> String {
    match token {
        Token::Word(w) => match w.quote_style {
            Some('[') => format!("[{}]", w.value),
            Some('"') => format!("\"{}\"", w.value),
            _ => w.value.clone(),
        },
        Token::Number(n, _) => n.clone(),
        Token::SingleQuotedString(s) => format!("'{}'", s.replace('\'', "''")),
        Token::NationalStringLiteral(s) => format!("N'{}'", s.replace('\'', "''")),
        Token::DoubleQuotedString(s) => format!("\"{}\"", s),
        Token::HexStringLiteral(s) => format!("0x{}", s),
        Token::Whitespace(Whitespace::SingleLineComment { .. })
        | Token::Whitespace(Whitespace::MultiLineComment(_)) => " ".to_string(),
        Token::Whitespace(ws) => ws.to_string(),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::Comma => ",".to_string(),
        Token::Period => ".".to_string(),
        Token::SemiColon => ";".to_string(),
        Token::Colon => ":".to_string(),
        Token::Plus => "+".to_string(),
        Token::Minus => "-".to_string(),
        Token::Mul => "*".to_string(),
        Token::Div => "/".to_string(),
        Token::Mod => "%".to_string(),
        Token::Eq => "=".to_string(),
        Token::Neq => "<>".to_string(),
        Token::Lt => "<".to_string(),
        Token::Gt => ">".to_string(),
        Token::LtEq => "<=".to_string(),
        Token::GtEq => ">=".to_string(),
        Token::AtSign => "@".to_string(),
        other => format!("{}", other),
    }
}
