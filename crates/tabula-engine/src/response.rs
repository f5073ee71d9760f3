//! Query outcomes returned to the caller.

use core::fmt;

use crate::table::Table;

/// The outcome of one executed statement: either a status message or a
/// result table.
///
/// A `Table` response is a value copy, independent of later catalog
/// mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A status message, printed verbatim.
    Message(String),
    /// A result table, rendered with padded columns.
    Table(Table),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Table(table) => table.fmt(f),
        }
    }
}
