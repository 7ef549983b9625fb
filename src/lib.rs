//! qfmt — deterministic source-to-source formatter for Spark SQL.
//!
//! Given an arbitrary query string, `format` produces a canonically
//! laid-out, re-parseable, semantically identical query string, or
//! returns the input unchanged when it cannot be safely reformatted.
//! One fixed style, no configuration surface.
//!
//! Pipeline (each stage consuming the previous one's output):
//! 1. `sql`    — tokenizer: raw text to a span-carrying token stream.
//! 2. `parse`  — recursive-descent parser: tokens to a closed-variant
//!    statement tree that fixes every token's semantic role.
//! 3. `render` — printer: statement tree to canonical text.
//! 4. `format` — driver: orchestration and the fail-safe fallback.
//!
//! Example:
//! ```rust
//! use qfmt::format;
//!
//! assert_eq!(
//!     format("select * from t where exists (select 1)"),
//!     "SELECT * FROM t WHERE EXISTS (SELECT 1)",
//! );
//! ```
//!
//! Every `format` call is independent and side-effect-free; the only
//! process-wide state is the immutable keyword table and the read-only
//! configuration, so concurrent callers need no coordination.

pub mod config;
pub mod error;
pub mod format;
pub mod parse;
pub mod render;
pub mod sql;

pub use config::{Config, config};
pub use error::{Error, Result};
pub use format::{format, needs_format};

#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn};

/// Convenience prelude re‑exporting the most commonly used items.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{format, needs_format};
}
