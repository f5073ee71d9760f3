//! A named collection of columns with row-level operators.

use core::fmt;
use std::collections::HashMap;

use indexmap::IndexMap;
use tabula_sql::filter::{CmpOp, Token};
use tabula_sql::DataType;

use crate::column::Column;
use crate::error::{EngineError, Result};
use crate::value::{self, Value};

/// A table: columns in declaration order, plus the row count.
///
/// Every column always holds exactly `n_rows` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    n_rows: usize,
}

impl Table {
    /// Creates an empty table with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fresh empty column.
    ///
    /// # Errors
    ///
    /// "Invalid query" if the name is already taken.
    pub fn create_column(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
        max_len: usize,
        not_null: bool,
    ) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(EngineError::InvalidQuery);
        }
        self.columns
            .insert(name, Column::new(data_type, max_len, not_null));
        Ok(())
    }

    /// Marks the named column as the primary key.
    ///
    /// # Errors
    ///
    /// "No column with given name" if the column does not exist.
    pub fn set_primary_key(&mut self, name: &str) -> Result<()> {
        self.columns
            .get_mut(name)
            .ok_or(EngineError::NoSuchColumn)?
            .mark_primary();
        Ok(())
    }

    /// Whether a column with this name exists.
    #[must_use]
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Looks up a column.
    ///
    /// # Errors
    ///
    /// "No column with given name" if the column does not exist.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name).ok_or(EngineError::NoSuchColumn)
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Iterates over `(name, column)` pairs in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&String, &Column)> {
        self.columns.iter()
    }

    pub(crate) fn add_column(&mut self, name: String, column: Column) {
        self.columns.insert(name, column);
    }

    pub(crate) fn set_n_rows(&mut self, n_rows: usize) {
        self.n_rows = n_rows;
    }

    /// Appends one row from a column-name to raw-literal map.
    ///
    /// The whole row is validated before any column is touched, so a
    /// failure leaves the table unchanged. Columns absent from the map
    /// receive `NULL` and must therefore be nullable.
    ///
    /// # Errors
    ///
    /// "No column with given name" for an unknown column; "Invalid value"
    /// for a bad literal or an omitted non-nullable column; a duplicate
    /// primary key reports the offending literal.
    pub fn insert_row(&mut self, values: &HashMap<String, String>) -> Result<()> {
        for name in values.keys() {
            if !self.columns.contains_key(name) {
                return Err(EngineError::NoSuchColumn);
            }
        }
        let mut parsed = Vec::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            match values.get(name) {
                Some(raw) => {
                    let value = column.parse_value(raw)?;
                    if !value.is_null() {
                        column.check_unique(&value, raw)?;
                    }
                    parsed.push(value);
                }
                None => {
                    if column.not_null() {
                        return Err(EngineError::InvalidValue);
                    }
                    parsed.push(Value::Null);
                }
            }
        }
        for (column, value) in self.columns.values_mut().zip(parsed) {
            column.push_value(value);
        }
        self.n_rows += 1;
        Ok(())
    }

    /// Indices of the rows satisfying the postfix filter, in order.
    ///
    /// An empty filter matches every row.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors from [`Table::check_row`].
    pub fn matching_rows(&self, filters: &[Token]) -> Result<Vec<usize>> {
        if filters.is_empty() {
            return Ok((0..self.n_rows).collect());
        }
        let mut rows = Vec::new();
        for row in 0..self.n_rows {
            if self.check_row(filters, row)? {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    /// Evaluates the postfix filter against one row.
    ///
    /// Operands resolve as follows: a `Var` reads the column's value at
    /// `row`; a `Const` opposite a `Var` is cast to that column's type;
    /// any other `Const` is cast to `BOOL`. The final top of stack is
    /// coerced to a boolean.
    ///
    /// # Errors
    ///
    /// "Invalid operation" for a malformed stack or `AND`/`OR` over
    /// non-booleans; "Invalid value" for an uncastable constant;
    /// "No column with given name" for an unknown variable.
    pub fn check_row(&self, filters: &[Token], row: usize) -> Result<bool> {
        let mut stack: Vec<Token> = Vec::new();
        for token in filters {
            match token {
                Token::Var(_) | Token::Const(_) => stack.push(token.clone()),
                Token::Op(op) => {
                    let t2 = stack.pop().ok_or(EngineError::InvalidOperation)?;
                    let t1 = stack.pop().ok_or(EngineError::InvalidOperation)?;
                    let a = self.resolve_operand(&t1, &t2, row)?;
                    let b = self.resolve_operand(&t2, &t1, row)?;
                    stack.push(Token::Res(compare(*op, &a, &b)?));
                }
                _ => return Err(EngineError::InvalidOperation),
            }
        }
        match stack.pop().ok_or(EngineError::InvalidOperation)? {
            Token::Res(result) => Ok(result),
            Token::Const(text) | Token::Var(text) => match value::cast(&text, DataType::Bool)? {
                Value::Bool(result) => Ok(result),
                _ => Err(EngineError::InvalidOperation),
            },
            _ => Err(EngineError::InvalidOperation),
        }
    }

    fn resolve_operand(&self, token: &Token, other: &Token, row: usize) -> Result<Value> {
        match token {
            Token::Var(name) => Ok(self.column(name)?.value(row).clone()),
            Token::Const(text) => match other {
                Token::Var(other_name) => {
                    value::cast(text, self.column(other_name)?.data_type())
                }
                _ => value::cast(text, DataType::Bool),
            },
            Token::Res(result) => Ok(Value::Bool(*result)),
            _ => Err(EngineError::InvalidOperation),
        }
    }

    /// Projects `columns` over the rows satisfying `filters`.
    ///
    /// # Errors
    ///
    /// "No column with given name" for an unknown projection column, plus
    /// filter evaluation errors.
    pub fn select(&self, columns: &[String], filters: &[Token]) -> Result<Self> {
        let rows = self.matching_rows(filters)?;
        self.project(columns, &rows)
    }

    /// Projects `columns` at exactly the given row indices.
    ///
    /// # Errors
    ///
    /// "No column with given name" for an unknown projection column.
    pub fn project(&self, columns: &[String], rows: &[usize]) -> Result<Self> {
        let mut result = Self::new();
        for name in columns {
            let column = self.column(name)?;
            result.columns.insert(name.clone(), column.select(rows));
        }
        result.n_rows = rows.len();
        Ok(result)
    }

    /// Applies `SET` assignments to the rows satisfying `filters`.
    ///
    /// All assignments are validated before any is applied, including the
    /// primary-key invariant: a key column may only be rewritten for a
    /// single row, and only to a value no other row holds.
    ///
    /// # Errors
    ///
    /// "No column with given name", "Invalid value", or a duplicate-key
    /// report.
    pub fn update(&mut self, values: &HashMap<String, String>, filters: &[Token]) -> Result<()> {
        let rows = self.matching_rows(filters)?;
        for (name, raw) in values {
            let column = self.column(name)?;
            let value = column.parse_value(raw)?;
            if column.is_primary() && !rows.is_empty() {
                if rows.len() > 1 {
                    return Err(EngineError::DuplicateKey(raw.clone()));
                }
                let taken = column
                    .values()
                    .enumerate()
                    .any(|(i, held)| !rows.contains(&i) && *held == value);
                if taken {
                    return Err(EngineError::DuplicateKey(raw.clone()));
                }
            }
        }
        for (name, raw) in values {
            if let Some(column) = self.columns.get_mut(name) {
                column.update(&rows, raw)?;
            }
        }
        Ok(())
    }

    /// Deletes the rows satisfying `filters`.
    ///
    /// # Errors
    ///
    /// Propagates filter evaluation errors.
    pub fn delete(&mut self, filters: &[Token]) -> Result<()> {
        let rows = self.matching_rows(filters)?;
        for column in self.columns.values_mut() {
            column.delete(&rows);
        }
        self.n_rows -= rows.len();
        Ok(())
    }

    /// Deletes every row, keeping the schema.
    pub fn delete_all(&mut self) {
        for column in self.columns.values_mut() {
            column.delete_all();
        }
        self.n_rows = 0;
    }

    /// Equi-joins this table with `other`.
    ///
    /// `key_a` and `key_b` must be row-aligned with `self` and `other`
    /// respectively. For each left row the first matching right row is
    /// taken; with `is_inner` false, unmatched left rows are emitted with
    /// `NULL` for every right column.
    ///
    /// # Errors
    ///
    /// "Ambiguous column selection" when the two schemas share a column
    /// name.
    pub fn join(&self, other: &Self, key_a: &Column, key_b: &Column, is_inner: bool) -> Result<Self> {
        for name in other.columns.keys() {
            if self.columns.contains_key(name) {
                return Err(EngineError::AmbiguousColumn);
            }
        }
        let mut result = Self::new();
        for (name, column) in &self.columns {
            result.columns.insert(name.clone(), column.clone_empty());
        }
        for (name, column) in &other.columns {
            result.columns.insert(name.clone(), column.clone_empty());
        }

        for i in 0..key_a.size() {
            let matched = (0..key_b.size()).find(|&j| key_a.value(i) == key_b.value(j));
            if matched.is_none() && is_inner {
                continue;
            }
            for (name, column) in &self.columns {
                result.columns[name].push_value(column.value(i).clone());
            }
            for (name, column) in &other.columns {
                let value = matched.map_or(Value::Null, |j| column.value(j).clone());
                result.columns[name].push_value(value);
            }
            result.n_rows += 1;
        }
        Ok(result)
    }
}

impl fmt::Display for Table {
    /// Renders headers and rows left-padded to each column's width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, column) in &self.columns {
            let width = column.max_len_of_value().max(name.chars().count() + 3);
            write!(f, "{name:<width$}")?;
        }
        writeln!(f)?;
        for row in 0..self.n_rows {
            for (name, column) in &self.columns {
                let width = column.max_len_of_value().max(name.chars().count() + 3);
                let text = column.value(row).to_string();
                write!(f, "{text:<width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn compare(op: CmpOp, a: &Value, b: &Value) -> Result<bool> {
    use core::cmp::Ordering;
    match op {
        CmpOp::Eq => Ok(a == b),
        CmpOp::NotEq => Ok(a != b),
        CmpOp::Less => Ok(a.partial_cmp(b) == Some(Ordering::Less)),
        CmpOp::Greater => Ok(a.partial_cmp(b) == Some(Ordering::Greater)),
        CmpOp::LessEq => Ok(matches!(
            a.partial_cmp(b),
            Some(Ordering::Less | Ordering::Equal)
        )),
        CmpOp::GreaterEq => Ok(matches!(
            a.partial_cmp(b),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        CmpOp::And | CmpOp::Or => match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => Ok(if op == CmpOp::And {
                *x && *y
            } else {
                *x || *y
            }),
            _ => Err(EngineError::InvalidOperation),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_sql::lexer::Scanner;

    fn employee_table() -> Table {
        let mut table = Table::new();
        table
            .create_column("emp_id", DataType::Int, 0, false)
            .unwrap();
        table
            .create_column("first_name", DataType::Varchar, 20, false)
            .unwrap();
        table
            .create_column("sex", DataType::Varchar, 1, false)
            .unwrap();
        table
            .create_column("salary", DataType::Int, 0, false)
            .unwrap();
        table.set_primary_key("emp_id").unwrap();
        for (id, name, sex, salary) in [
            ("184", "John", "M", "100000"),
            ("348", "Boba", "M", "80000"),
            ("235", "Ray", "F", "60000"),
        ] {
            let values = HashMap::from([
                (String::from("emp_id"), String::from(id)),
                (String::from("first_name"), String::from(name)),
                (String::from("sex"), String::from(sex)),
                (String::from("salary"), String::from(salary)),
            ]);
            table.insert_row(&values).unwrap();
        }
        table
    }

    fn filters(input: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(input);
        tabula_sql::filter::parse_filters(&mut scanner).unwrap().tokens
    }

    #[test]
    fn test_insert_keeps_columns_aligned() {
        let table = employee_table();
        assert_eq!(table.n_rows(), 3);
        for (_, column) in table.columns() {
            assert_eq!(column.size(), 3);
        }
    }

    #[test]
    fn test_failed_insert_leaves_table_unchanged() {
        let mut table = employee_table();
        let values = HashMap::from([
            (String::from("emp_id"), String::from("500")),
            (String::from("salary"), String::from("not-a-number")),
        ]);
        assert!(table.insert_row(&values).is_err());
        assert_eq!(table.n_rows(), 3);
        for (_, column) in table.columns() {
            assert_eq!(column.size(), 3);
        }
    }

    #[test]
    fn test_insert_unknown_column_is_rejected() {
        let mut table = employee_table();
        let values = HashMap::from([(String::from("nope"), String::from("1"))]);
        let err = table.insert_row(&values).unwrap_err();
        assert_eq!(err.to_string(), "No column with given name");
    }

    #[test]
    fn test_omitted_primary_key_is_rejected() {
        let mut table = employee_table();
        let values = HashMap::from([(String::from("salary"), String::from("1"))]);
        let err = table.insert_row(&values).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value");
    }

    #[test]
    fn test_filter_precedence_and_before_or() {
        let table = employee_table();
        let rows = table
            .matching_rows(&filters("salary <> 80000 AND sex = 'M' OR sex = 'F'"))
            .unwrap();
        assert_eq!(rows, vec![0, 2]);
    }

    #[test]
    fn test_filter_numeric_comparison() {
        let table = employee_table();
        let rows = table.matching_rows(&filters("salary >= 80000")).unwrap();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_filter_unknown_column() {
        let table = employee_table();
        let err = table.matching_rows(&filters("age > 3")).unwrap_err();
        assert_eq!(err.to_string(), "No column with given name");
    }

    #[test]
    fn test_and_requires_booleans() {
        let table = employee_table();
        let err = table
            .matching_rows(&filters("salary AND salary"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation");
    }

    #[test]
    fn test_select_projects_and_filters() {
        let table = employee_table();
        let result = table
            .select(&[String::from("first_name")], &filters("sex = 'M'"))
            .unwrap();
        assert_eq!(result.n_rows(), 2);
        assert_eq!(
            *result.column("first_name").unwrap().value(1),
            Value::Varchar(String::from("Boba"))
        );
    }

    #[test]
    fn test_select_unknown_column() {
        let table = employee_table();
        let err = table.select(&[String::from("nope")], &[]).unwrap_err();
        assert_eq!(err.to_string(), "No column with given name");
    }

    #[test]
    fn test_update_with_filter() {
        let mut table = employee_table();
        let values = HashMap::from([(String::from("salary"), String::from("100500"))]);
        table.update(&values, &filters("sex = 'F'")).unwrap();
        assert_eq!(*table.column("salary").unwrap().value(2), Value::Int(100500));
        assert_eq!(*table.column("salary").unwrap().value(0), Value::Int(100000));
    }

    #[test]
    fn test_update_primary_key_to_taken_value() {
        let mut table = employee_table();
        let values = HashMap::from([(String::from("emp_id"), String::from("184"))]);
        let err = table.update(&values, &filters("sex = 'F'")).unwrap_err();
        assert_eq!(err.to_string(), " Primary key '184' already exists");
    }

    #[test]
    fn test_update_primary_key_over_multiple_rows() {
        let mut table = employee_table();
        let values = HashMap::from([(String::from("emp_id"), String::from("999"))]);
        let err = table.update(&values, &filters("sex = 'M'")).unwrap_err();
        assert_eq!(err.to_string(), " Primary key '999' already exists");
    }

    #[test]
    fn test_update_primary_key_single_row_ok() {
        let mut table = employee_table();
        let values = HashMap::from([(String::from("emp_id"), String::from("999"))]);
        table.update(&values, &filters("sex = 'F'")).unwrap();
        assert_eq!(*table.column("emp_id").unwrap().value(2), Value::Int(999));
    }

    #[test]
    fn test_delete_with_filter() {
        let mut table = employee_table();
        table.delete(&filters("sex = 'M'")).unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(
            *table.column("first_name").unwrap().value(0),
            Value::Varchar(String::from("Ray"))
        );
    }

    #[test]
    fn test_delete_all() {
        let mut table = employee_table();
        table.delete_all();
        assert_eq!(table.n_rows(), 0);
        for (_, column) in table.columns() {
            assert_eq!(column.size(), 0);
        }
    }

    #[test]
    fn test_display_pads_columns() {
        let table = employee_table();
        let rendered = table.to_string();
        let mut lines = rendered.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("emp_id"));
        // emp_id: width max(10, 6 + 3) = 10.
        assert_eq!(&header[..10], "emp_id    ");
    }
}
