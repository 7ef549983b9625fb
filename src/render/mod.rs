//! Canonical layout rendering.
//!
//! The printer is a pure function over the parsed statement tree: no
//! access to raw input, no configuration, no failure path. Everything it
//! needs (original identifier casing, quoted delimiters, literal text)
//! was captured verbatim by the parser.

pub mod printer;

pub use printer::print;
