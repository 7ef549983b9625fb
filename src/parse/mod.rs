//! Grammar classification for the formatting pipeline.
//!
//! A hand-written recursive-descent parser turns the token stream into a
//! closed-variant statement tree (`ast`). The tree is what gives every
//! token its semantic role: identifier position, function-name position,
//! and clause boundaries all fall out of which node a token landed in,
//! and exhaustive matching over the closed enums keeps any newly added
//! construct from being silently dropped downstream.
//!
//! Modules:
//! - `ast`    : Statement / clause / expression tree.
//! - `parser` : The descent parser, `parse_statement`.
//!
//! Failure to parse is an expected outcome for unsupported or invalid
//! SQL; the driver maps it to the return-input-unchanged fallback.

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::parse_statement;
