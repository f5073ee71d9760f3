//! Parser error types.

/// An error produced while parsing a query.
///
/// The rendered message is part of the observable contract: callers (and
/// tests) match on the exact text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A required character or keyword was not found at the cursor.
    #[error("{pos}: Expected {expected}, found {found}")]
    Expected {
        /// Byte position of the cursor when the mismatch was detected.
        pos: usize,
        /// What the parser was looking for, e.g. `'('` or `EOF`.
        expected: String,
        /// What was actually there, e.g. `'x'` or `EOF`.
        found: String,
    },

    /// Any other malformed input, tagged with the cursor position.
    #[error("{pos}: {message}")]
    Syntax {
        /// Byte position of the cursor.
        pos: usize,
        /// Human-readable description.
        message: String,
    },

    /// A `CREATE TABLE` statement without a `PRIMARY KEY` column.
    #[error("Primary key is not set")]
    PrimaryKeyNotSet,
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
