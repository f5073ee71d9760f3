//! # tabula-engine
//!
//! A row-oriented, single-threaded in-memory table engine.
//!
//! [`Database`] owns a catalog of [`Table`]s, each a declaration-ordered
//! map of typed [`Column`]s. Statements parsed by `tabula-sql` are
//! dispatched to the table operators: create/drop, transactional row
//! insert, filtered select with projection, update, delete, and
//! first-match equi-joins (inner, left, right). `WHERE` clauses arrive
//! as postfix token lists and are evaluated per row with an operand
//! stack over the [`Value`] variant.
//!
//! The whole catalog can be saved to and restored from a flat
//! tab-delimited text file.
//!
//! ```rust
//! use tabula_engine::Database;
//!
//! let mut db = Database::new();
//! db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(20))")
//!     .unwrap();
//! db.execute("INSERT INTO users(id, name) VALUES(1, 'Ada')").unwrap();
//! let response = db.execute("SELECT * FROM users").unwrap();
//! println!("{response}");
//! ```

pub mod column;
pub mod database;
pub mod error;
pub mod response;
mod storage;
pub mod table;
pub mod value;

pub use column::Column;
pub use database::Database;
pub use error::EngineError;
pub use response::Response;
pub use table::Table;
pub use value::Value;
