//! Error types for the table engine.

use tabula_sql::ParseError;

/// Errors that can occur while executing a query or moving state to and
/// from disk.
///
/// The rendered messages are the observable contract of the engine;
/// tests match on them verbatim.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The statement text did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A statement referenced a table that does not exist.
    #[error("No table with name '{0}'")]
    NoSuchTable(String),

    /// A statement referenced a column that does not exist.
    #[error("No column with given name")]
    NoSuchColumn,

    /// An unqualified column name matched more than one table, or a join
    /// would produce two output columns with the same name.
    #[error("Ambiguous column selection")]
    AmbiguousColumn,

    /// A literal failed to cast, exceeded the column width, or violated
    /// a nullability constraint.
    #[error("Invalid value")]
    InvalidValue,

    /// A primary-key value collided with an existing row.
    #[error(" Primary key '{0}' already exists")]
    DuplicateKey(String),

    /// A filter expression applied an operator to unsupported operands.
    #[error("Invalid operation")]
    InvalidOperation,

    /// A statement was well-formed but semantically inconsistent.
    #[error("Invalid query")]
    InvalidQuery,

    /// Reading or writing a database file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A database file did not match the persistence format.
    #[error("Corrupted database file: {0}")]
    CorruptFile(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
