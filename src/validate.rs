//! Coarse pre-validation of DDL input.
//!
//! These checks run in the driver before the pipeline and reject obviously
//! unusable input early. They are deliberately superficial; once input
//! passes, the core degrades gracefully instead of erroring.

use once_cell::sync::Lazy;
use regex::Regex;

static CREATE_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CREATE\s+TABLE").expect("valid regex"));

static BRACKETED_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\w+\]\s+\[\w+\]").expect("valid regex"));

/// Validate the superficial shape of a DDL document.
///
/// Checks: a `CREATE TABLE` clause is present, parentheses balance by
/// count, and at least one bracketed `[name] [type]` column pattern exists.
/// Returns the first failing check's message.
pub fn validate_sql(sql: &str) -> Result<(), String> {
    if !CREATE_TABLE_RE.is_match(sql) {
        return Err("Missing 'CREATE TABLE' statement.".to_string());
    }

    let open = sql.matches('(').count();
    let close = sql.matches(')').count();
    if open != close {
        return Err(format!(
            "Unbalanced parentheses: found {} '(' vs {} ')'.",
            open, close
        ));
    }

    if !BRACKETED_COLUMN_RE.is_match(sql) {
        return Err("No valid bracketed column definitions (e.g. [ColName] [int]).".to_string());
    }

    Ok(())
}
