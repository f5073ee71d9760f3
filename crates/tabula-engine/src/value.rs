//! The runtime value model.

use core::cmp::Ordering;
use core::fmt;

use tabula_sql::DataType;

use crate::error::{EngineError, Result};

/// A single stored cell.
///
/// All non-null values in a column share the column's declared
/// [`DataType`]; `Null` can appear in any nullable column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// `INT`
    Int(i32),
    /// `DOUBLE`
    Double(f64),
    /// `FLOAT`
    Float(f32),
    /// `BOOL`
    Bool(bool),
    /// `VARCHAR`
    Varchar(String),
}

impl Value {
    /// Returns the declared type this value belongs to, `None` for null.
    #[must_use]
    pub const fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int(_) => Some(DataType::Int),
            Self::Double(_) => Some(DataType::Double),
            Self::Float(_) => Some(DataType::Float),
            Self::Bool(_) => Some(DataType::Bool),
            Self::Varchar(_) => Some(DataType::Varchar),
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Token written to a database file: `NULL` for null, `0`/`1` for
    /// booleans, the plain rendering otherwise.
    #[must_use]
    pub fn storage_text(&self) -> String {
        match self {
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            other => other.to_string(),
        }
    }

    /// Rank used to order values of different variants; null sorts first.
    const fn tag_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Int(_) => 1,
            Self::Double(_) => 2,
            Self::Float(_) => 3,
            Self::Bool(_) => 4,
            Self::Varchar(_) => 5,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Varchar(a), Self::Varchar(b)) => a.partial_cmp(b),
            _ => self.tag_rank().partial_cmp(&other.tag_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => f.write_str(if *v { "TRUE" } else { "FALSE" }),
            Self::Varchar(v) => f.write_str(v),
        }
    }
}

/// Parses a raw textual literal into a value of the given type.
///
/// Booleans accept `0`, `1` and the (case-insensitive) words `TRUE` and
/// `FALSE`, matching what the filter tokenizer produces.
///
/// # Errors
///
/// Returns [`EngineError::InvalidValue`] on any parse failure.
pub fn cast(text: &str, data_type: DataType) -> Result<Value> {
    match data_type {
        DataType::Int => text
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| EngineError::InvalidValue),
        DataType::Double => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| EngineError::InvalidValue),
        DataType::Float => text
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| EngineError::InvalidValue),
        DataType::Bool => match text {
            "0" => Ok(Value::Bool(false)),
            "1" => Ok(Value::Bool(true)),
            _ if text.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            _ if text.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(EngineError::InvalidValue),
        },
        DataType::Varchar => Ok(Value::Varchar(String::from(text))),
    }
}
