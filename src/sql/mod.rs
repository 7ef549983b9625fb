//! Spark SQL tokenization module.
//!
//! This module groups the lexical building blocks of the formatting
//! pipeline: the keyword table, the token model, and the single-pass
//! tokenizer. It is the only stage that ever looks at raw input text;
//! the parser and printer work purely over `Token`s and the spans they
//! carry.
//!
//! Modules:
//! - `keyword`    : Closed enum of the dialect's keyword spellings.
//! - `token_kind` : Classification of lexical atoms (identifiers,
//!   literals, symbols, comments).
//! - `token`      : Token struct pairing a `TokenKind` with source span
//!   offsets.
//! - `tokenizer`  : Single pass O(n) tokenizer producing `Vec<Token>`.
//!
//! Design principles:
//! 1. Token spans partition the input: concatenating the spans plus the
//!    whitespace between them reproduces the input byte-for-byte,
//!    comments included.
//! 2. Preserve original spelling; canonical casing is the printer's job.
//! 3. Closed `TokenKind`/`Keyword` enums so every consumer match is
//!    checked for exhaustiveness by the compiler.

pub mod keyword;
pub mod token;
pub mod token_kind;
pub mod tokenizer;

pub use keyword::Keyword;
pub use token::Token;
pub use token_kind::TokenKind;
pub use tokenizer::tokenize;

/// Convenience prelude re‑exporting the most commonly used items.
pub mod prelude {
    pub use super::{Keyword, Token, TokenKind, tokenize};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_and_access() {
        let sql = "SELECT col FROM tbl";
        let tokens = tokenize(sql).unwrap();
        assert!(tokens.iter().any(|t| t.is_keyword(Keyword::Select)));
        assert!(tokens.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(tokens.iter().any(|t| t.ident() == Some("col")));
        assert!(tokens.iter().any(|t| t.ident() == Some("tbl")));
    }

    #[test]
    fn prelude_import_works() {
        use super::prelude::*;
        let toks = tokenize("FROM X").unwrap();
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(toks.iter().any(|t| t.ident() == Some("X")));
    }
}
