//! # tabula-sql
//!
//! The query-language front end of the tabula in-memory database.
//!
//! This crate lowers statement text into typed [`query::Query`]
//! descriptors:
//! - a character [`lexer::Cursor`] and [`lexer::Scanner`] with
//!   case-insensitive keyword matching,
//! - a [`filter`] tokenizer that turns `WHERE` clauses into postfix
//!   token lists via the shunting-yard algorithm,
//! - a hand-written recursive descent [`parser::SqlParser`] for the six
//!   statement kinds (`CREATE`, `DROP`, `INSERT`, `SELECT`, `UPDATE`,
//!   `DELETE`).
//!
//! ```rust
//! use tabula_sql::{Query, SqlParser};
//!
//! let query = SqlParser::new("DROP TABLE users").parse().unwrap();
//! assert!(matches!(query, Query::Drop(d) if d.table == "users"));
//! ```

pub mod error;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod types;

pub use error::ParseError;
pub use parser::SqlParser;
pub use query::Query;
pub use types::DataType;
