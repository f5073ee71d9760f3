//! Typed query descriptors produced by the parser.

use std::collections::HashMap;

use crate::filter::Token;
use crate::types::DataType;

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `CREATE TABLE …`
    Create(CreateTable),
    /// `DROP TABLE …`
    Drop(DropTable),
    /// `INSERT INTO …`
    Insert(Insert),
    /// `SELECT …`
    Select(Select),
    /// `UPDATE …`
    Update(Update),
    /// `DELETE FROM …`
    Delete(Delete),
}

/// A column definition inside `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Character-width budget; `0` means "use the type default".
    pub size: usize,
    /// Whether `NOT NULL` was declared.
    pub not_null: bool,
}

/// Descriptor for `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// Table name.
    pub table: String,
    /// Column definitions in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Index of the `PRIMARY KEY` column within `columns`.
    pub primary_key: usize,
}

/// Descriptor for `DROP TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    /// Table name.
    pub table: String,
}

/// Descriptor for `INSERT INTO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    /// Table name.
    pub table: String,
    /// Column name to raw textual literal, aligned positionally from the
    /// column and value lists. Columns missing here receive `NULL`.
    pub values: HashMap<String, String>,
}

/// Join mode of a `SELECT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Plain `JOIN`: only matching rows are emitted.
    Inner,
    /// `LEFT JOIN`: unmatched left rows are padded with `NULL`.
    Left,
    /// `RIGHT JOIN`: unmatched right rows are padded with `NULL`.
    Right,
}

/// The `JOIN … ON …` tail of a `SELECT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// The joined (second) table.
    pub table: String,
    /// Key column on the `FROM` side.
    pub left_column: String,
    /// Key column on the joined side.
    pub right_column: String,
    /// Join mode.
    pub kind: JoinType,
}

/// Descriptor for `SELECT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// The `FROM` table.
    pub table1: String,
    /// The second table, when bound by a column qualifier or a join.
    pub table2: Option<String>,
    /// Columns qualified to `table1`.
    pub columns1: Vec<String>,
    /// Columns qualified to `table2`.
    pub columns2: Vec<String>,
    /// Bare column names, resolved against the named tables at dispatch.
    pub unqualified: Vec<String>,
    /// Postfix filter tokens; empty means "all rows".
    pub filters: Vec<Token>,
    /// True for `SELECT *`.
    pub all_table: bool,
    /// Join tail, if any.
    pub join: Option<Join>,
}

/// Descriptor for `UPDATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Table name.
    pub table: String,
    /// `SET` assignments: column name to raw textual literal.
    pub values: HashMap<String, String>,
    /// Postfix filter tokens; empty means "all rows".
    pub filters: Vec<Token>,
}

/// Descriptor for `DELETE FROM`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Table name.
    pub table: String,
    /// Postfix filter tokens.
    pub filters: Vec<Token>,
    /// True when no `WHERE` clause was given: delete every row.
    pub all_table: bool,
}
