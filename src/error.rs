#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized character {character:?} at byte {offset}")]
    Lex { character: char, offset: usize },

    #[error("Unterminated {construct} starting at byte {offset}")]
    Unterminated {
        construct: &'static str,
        offset: usize,
    },

    #[error("Unexpected {found:?} at byte {offset}, expected {expected}")]
    Parse {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("Unexpected end of statement, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Statement nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    /// Byte offset of the offending input position, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Lex { offset, .. }
            | Error::Unterminated { offset, .. }
            | Error::Parse { offset, .. } => Some(*offset),
            Error::UnexpectedEnd { .. } | Error::DepthExceeded { .. } => None,
        }
    }
}
