//! Pipeline driver: tokenize → parse → print, with the all-or-nothing
//! fallback policy.
//!
//! `format` never fails. When any stage rejects the input (unrecognized
//! character, unsupported construct, invalid SQL, nesting bound), the
//! original text is returned unchanged, byte-for-byte. Formatting is a
//! convenience, not a correctness gate, so a half-formatted result is
//! never produced.
//!
//! Callers that need to distinguish "already canonical" from "could not
//! be formatted" use `needs_format`, which surfaces the stage error
//! without weakening `format`'s contract.

use itertools::Itertools as _;

use crate::error::Result;
use crate::parse::parse_statement;
use crate::render::print;
use crate::sql::{Token, tokenize};
use crate::{debug, trace};

#[cfg(test)]
mod scenario_tests;

/// Format a statement or `;`-joined statement sequence. Returns the
/// input unchanged when it cannot be safely reformatted.
pub fn format(sql: &str) -> String {
    match try_format(sql) {
        Ok(Some(formatted)) => formatted,
        Ok(None) => sql.to_string(),
        Err(error) => {
            debug!(%error, "unable to format, returning input unchanged");
            sql.to_string()
        }
    }
}

/// Diagnostic entry point: `Ok(true)` when formatting would change the
/// text, `Err` with the lex/parse reason when it cannot be formatted.
pub fn needs_format(sql: &str) -> Result<bool> {
    Ok(try_format(sql)?.is_some_and(|formatted| formatted != sql))
}

fn try_format(sql: &str) -> Result<Option<String>> {
    let tokens = tokenize(sql)?;
    trace!(tokens = tokens.len(), "tokenized input");

    let statements = split_statements(&tokens);
    if statements.is_empty() {
        // Nothing but whitespace, semicolons, or comments.
        return Ok(None);
    }

    let mut pieces = Vec::with_capacity(statements.len());
    for run in &statements {
        let statement = parse_statement(sql, run)?;
        pieces.push(print(&statement));
    }
    trace!(statements = pieces.len(), "formatted statements");

    let mut formatted = pieces.iter().join(";\n");
    if has_trailing_semicolon(&tokens) {
        formatted.push(';');
    }
    Ok(Some(formatted))
}

/// Split on top-level `;`. Runs with no effective (non-comment) tokens
/// are dropped, which collapses consecutive separators and stray leading
/// ones.
fn split_statements(tokens: &[Token]) -> Vec<&[Token]> {
    tokens
        .split(|t| t.kind.is_symbol(";"))
        .filter(|run| run.iter().any(|t| !t.kind.is_comment()))
        .collect()
}

fn has_trailing_semicolon(tokens: &[Token]) -> bool {
    tokens
        .iter()
        .rev()
        .find(|t| !t.kind.is_comment())
        .is_some_and(|t| t.kind.is_symbol(";"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_statements_format_independently() {
        assert_eq!(format("select 1;select 2"), "SELECT 1;\nSELECT 2");
    }

    #[test]
    fn trailing_semicolon_is_preserved() {
        assert_eq!(format("select 1;"), "SELECT 1;");
    }

    #[test]
    fn leading_and_doubled_semicolons_collapse() {
        assert_eq!(format(";;select 1;;select 2"), "SELECT 1;\nSELECT 2");
    }

    #[test]
    fn whitespace_only_input_is_returned_unchanged() {
        assert_eq!(format("   \n\t"), "   \n\t");
        assert_eq!(format(""), "");
    }

    #[test]
    fn comment_only_input_is_returned_unchanged() {
        assert_eq!(format("-- just a note\n"), "-- just a note\n");
    }

    #[test]
    fn one_bad_statement_falls_back_for_the_whole_input() {
        let sql = "select 1; select from from";
        assert_eq!(format(sql), sql);
    }

    #[test]
    fn needs_format_reports_change() {
        assert!(needs_format("select 1").unwrap());
        assert!(!needs_format("SELECT 1").unwrap());
    }

    #[test]
    fn needs_format_surfaces_the_failure_reason() {
        assert!(needs_format("select 'unterminated").is_err());
        assert!(needs_format("not sql at all ###").is_err());
    }
}
