//! A typed, append-only vector of values with schema metadata.

use tabula_sql::DataType;

use crate::error::{EngineError, Result};
use crate::value::{self, Value};

/// One column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    data_type: DataType,
    max_len_of_value: usize,
    is_primary: bool,
    not_null: bool,
    values: Vec<Value>,
}

impl Column {
    /// Creates an empty column.
    ///
    /// A `max_len` of `0` falls back to the type default (10 for numeric
    /// types, 5 for `BOOL`); the parser guarantees `VARCHAR` always
    /// arrives with an explicit size.
    #[must_use]
    pub fn new(data_type: DataType, max_len: usize, not_null: bool) -> Self {
        let max_len_of_value = if max_len != 0 {
            max_len
        } else {
            data_type.default_width()
        };
        Self {
            data_type,
            max_len_of_value,
            is_primary: false,
            not_null,
            values: Vec::new(),
        }
    }

    /// Rebuilds a column from persisted metadata.
    pub(crate) const fn restore(
        data_type: DataType,
        max_len_of_value: usize,
        is_primary: bool,
        not_null: bool,
    ) -> Self {
        Self {
            data_type,
            max_len_of_value,
            is_primary,
            not_null,
            values: Vec::new(),
        }
    }

    /// Marks this column as the primary key.
    ///
    /// Primary keys are implicitly `NOT NULL`: uniqueness is meaningless
    /// for an absent value.
    pub fn mark_primary(&mut self) {
        self.is_primary = true;
        self.not_null = true;
    }

    /// Parses a raw literal against this column's constraints without
    /// storing it.
    ///
    /// # Errors
    ///
    /// "Invalid value" when the literal exceeds the width budget, is
    /// `NULL` for a non-nullable column, or fails to cast.
    pub fn parse_value(&self, raw: &str) -> Result<Value> {
        if raw.chars().count() > self.max_len_of_value {
            return Err(EngineError::InvalidValue);
        }
        if raw == "NULL" {
            if self.not_null {
                return Err(EngineError::InvalidValue);
            }
            return Ok(Value::Null);
        }
        value::cast(raw, self.data_type)
    }

    /// Fails if a primary column already holds `candidate`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateKey`] carrying the raw literal.
    pub fn check_unique(&self, candidate: &Value, raw: &str) -> Result<()> {
        if self.is_primary && self.values.contains(candidate) {
            return Err(EngineError::DuplicateKey(String::from(raw)));
        }
        Ok(())
    }

    /// Validates and appends a raw literal.
    ///
    /// # Errors
    ///
    /// See [`Column::parse_value`] and [`Column::check_unique`].
    pub fn emplace_value(&mut self, raw: &str) -> Result<()> {
        let value = self.parse_value(raw)?;
        if !value.is_null() {
            self.check_unique(&value, raw)?;
        }
        self.values.push(value);
        Ok(())
    }

    /// Appends an already-validated value.
    pub fn push_value(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Copies the values at `indices` into a new column with the same
    /// metadata.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut result = self.clone_empty();
        result.values = indices.iter().map(|&i| self.values[i].clone()).collect();
        result
    }

    /// A metadata-only copy with no values.
    #[must_use]
    pub fn clone_empty(&self) -> Self {
        Self {
            data_type: self.data_type,
            max_len_of_value: self.max_len_of_value,
            is_primary: self.is_primary,
            not_null: self.not_null,
            values: Vec::new(),
        }
    }

    /// Overwrites the rows at `indices` with the parsed literal.
    ///
    /// # Errors
    ///
    /// See [`Column::parse_value`].
    pub fn update(&mut self, indices: &[usize], raw: &str) -> Result<()> {
        let value = self.parse_value(raw)?;
        for &i in indices {
            self.values[i] = value.clone();
        }
        Ok(())
    }

    /// Removes the rows at `indices`, which must be in ascending order.
    pub fn delete(&mut self, indices: &[usize]) {
        for &i in indices.iter().rev() {
            self.values.remove(i);
        }
    }

    /// Removes every row.
    pub fn delete_all(&mut self) {
        self.values.clear();
    }

    /// Number of stored values.
    #[must_use]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The value stored at `row`.
    #[must_use]
    pub fn value(&self, row: usize) -> &Value {
        &self.values[row]
    }

    /// Iterates over the stored values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// The declared type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The character-width budget, also used as the display width.
    #[must_use]
    pub const fn max_len_of_value(&self) -> usize {
        self.max_len_of_value
    }

    /// Whether this column is the primary key.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Whether `NULL` is rejected.
    #[must_use]
    pub const fn not_null(&self) -> bool {
        self.not_null
    }
}
