//! Token kind definitions for the Spark SQL tokenizer.
//!
//! Each `TokenKind` variant represents a lexical atom discovered during
//! the single scanning pass. The set is closed on purpose: downstream
//! code matches on it exhaustively, so a newly added variant surfaces as
//! a compile error in every consumer instead of a silently dropped token.
//!
//! Design goals:
//! - Preserve original spelling where it matters: identifiers keep their
//!   casing, quoted identifiers and string literals keep their delimiters.
//! - Comments are tokens, not discarded trivia, so the driver can decide
//!   what to keep (leading comments, query hints) per its documented
//!   policy.
//! - Provide ergonomic helpers (`is_keyword`, `ident`, `is_symbol`) to
//!   avoid verbose pattern matches at call sites.
//!
//! See `keyword.rs` for the `Keyword` enum and `tokenizer.rs` for
//! tokenization.

use crate::sql::keyword::Keyword;

/// Classification for a token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Recognized SQL keyword spelling (may still act as an identifier,
    /// depending on syntactic position).
    Keyword(Keyword),
    /// Table / alias / column / generic identifier, original casing.
    Ident(String),
    /// Back-tick or double-quote delimited identifier, delimiters kept.
    QuotedIdent(String),
    /// Single-quoted string literal (quotes kept), or an `X'1F2A'`
    /// hex-binary literal.
    StringLit(String),
    /// Numeric literal in any supported form, including type suffixes
    /// (`100L`, `99.99BD`) and scientific notation (`1.5e10`).
    Number(String),
    /// Operator or punctuation, longest-match form (`<=>` not `<`,`=`,`>`).
    Symbol(&'static str),
    /// `-- ...` comment, marker included, newline excluded.
    LineComment(String),
    /// `/* ... */` comment, delimiters included; `/*+ ... */` is a hint.
    BlockComment(String),
}

impl TokenKind {
    /// True if this token is the given keyword.
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }

    /// Returns the identifier text if this token is an `Ident`.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True if this token is the given operator / punctuation symbol.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self, TokenKind::Symbol(s) if *s == symbol)
    }

    /// True for line and block comments.
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment(_) | TokenKind::BlockComment(_))
    }

    /// Comment text (delimiters included) for either comment kind.
    pub fn comment(&self) -> Option<&str> {
        match self {
            TokenKind::LineComment(s) | TokenKind::BlockComment(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
