//! The table catalog and query dispatcher.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use tabula_sql::query::{CreateTable, Delete, DropTable, Insert, JoinType, Query, Select, Update};
use tabula_sql::SqlParser;

use crate::error::{EngineError, Result};
use crate::response::Response;
use crate::storage;
use crate::table::Table;

/// An in-memory database: a catalog of named tables.
#[derive(Debug, Default)]
pub struct Database {
    tables: IndexMap<String, Table>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and executes one statement.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](tabula_sql::ParseError) wrapped in
    /// [`EngineError`] for malformed input, or an engine error for a
    /// statement that does not fit the catalog. Failed statements leave
    /// the database unchanged.
    pub fn execute(&mut self, query: &str) -> Result<Response> {
        debug!(query, "executing statement");
        match SqlParser::new(query).parse()? {
            Query::Create(create) => self.create_table(create),
            Query::Drop(drop) => Ok(self.drop_table(&drop)),
            Query::Insert(insert) => self.insert(&insert),
            Query::Select(select) => self.select(&select),
            Query::Update(update) => self.update(&update),
            Query::Delete(delete) => self.delete(&delete),
        }
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Names of the stored tables, in creation order.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub(crate) fn tables(&self) -> impl Iterator<Item = (&String, &Table)> {
        self.tables.iter()
    }

    pub(crate) fn add_table(&mut self, name: String, table: Table) {
        self.tables.insert(name, table);
    }

    /// Writes the whole catalog to `path` in the flat tab-delimited
    /// format.
    ///
    /// # Errors
    ///
    /// Propagates IO failures; the file handle is closed on all paths.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        storage::save(self, path.as_ref())
    }

    /// Replaces the catalog with the contents of `path`.
    ///
    /// The existing catalog is cleared first, even if loading then fails.
    ///
    /// # Errors
    ///
    /// Propagates IO failures and reports malformed files as
    /// [`EngineError::CorruptFile`].
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.tables.clear();
        storage::load(self, path.as_ref())
    }

    fn create_table(&mut self, query: CreateTable) -> Result<Response> {
        if self.tables.contains_key(&query.table) {
            return Err(EngineError::InvalidQuery);
        }
        let mut table = Table::new();
        for def in &query.columns {
            table.create_column(&def.name, def.data_type, def.size, def.not_null)?;
        }
        table.set_primary_key(&query.columns[query.primary_key].name)?;
        self.tables.insert(query.table, table);
        Ok(Response::Message(String::from(
            "Table is successfully created",
        )))
    }

    /// Dropping an absent table is a no-op, which keeps `DROP` idempotent.
    fn drop_table(&mut self, query: &DropTable) -> Response {
        self.tables.shift_remove(&query.table);
        Response::Message(format!("Table '{}' was successfully dropped", query.table))
    }

    fn insert(&mut self, query: &Insert) -> Result<Response> {
        let table = self
            .tables
            .get_mut(&query.table)
            .ok_or_else(|| EngineError::NoSuchTable(query.table.clone()))?;
        table.insert_row(&query.values)?;
        Ok(Response::Message(String::from(
            "Information is successfully inserted",
        )))
    }

    fn select(&self, query: &Select) -> Result<Response> {
        let t1 = self
            .tables
            .get(&query.table1)
            .ok_or_else(|| EngineError::NoSuchTable(query.table1.clone()))?;

        let Some(join) = &query.join else {
            // A second table bound by qualifiers but never joined has no
            // meaning.
            if query.table2.is_some() {
                return Err(EngineError::InvalidQuery);
            }
            let mut columns = query.columns1.clone();
            for name in &query.unqualified {
                if !t1.contains_column(name) {
                    return Err(EngineError::NoSuchColumn);
                }
                columns.push(name.clone());
            }
            let columns = if query.all_table {
                t1.column_names()
            } else {
                columns
            };
            return Ok(Response::Table(t1.select(&columns, &query.filters)?));
        };

        let t2 = self
            .tables
            .get(&join.table)
            .ok_or_else(|| EngineError::NoSuchTable(join.table.clone()))?;

        let mut columns1 = query.columns1.clone();
        let mut columns2 = query.columns2.clone();
        for name in &query.unqualified {
            match (t1.contains_column(name), t2.contains_column(name)) {
                (true, true) => return Err(EngineError::AmbiguousColumn),
                (true, false) => columns1.push(name.clone()),
                (false, true) => columns2.push(name.clone()),
                (false, false) => return Err(EngineError::NoSuchColumn),
            }
        }
        if query.all_table {
            columns1 = t1.column_names();
            columns2 = t2.column_names();
        }

        // The ON sides may arrive in either order; keep whichever
        // assignment names a real column on each side.
        let (key1, key2) = if t1.contains_column(&join.left_column)
            && t2.contains_column(&join.right_column)
        {
            (&join.left_column, &join.right_column)
        } else if t1.contains_column(&join.right_column) && t2.contains_column(&join.left_column) {
            (&join.right_column, &join.left_column)
        } else {
            return Err(EngineError::NoSuchColumn);
        };

        let rows1 = t1.matching_rows(&query.filters)?;
        let rows2: Vec<usize> = (0..t2.n_rows()).collect();
        let left = t1.project(&columns1, &rows1)?;
        let right = t2.project(&columns2, &rows2)?;
        let left_key = t1.column(key1)?.select(&rows1);
        let right_key = t2.column(key2)?.select(&rows2);

        let joined = match join.kind {
            JoinType::Inner => left.join(&right, &left_key, &right_key, true)?,
            JoinType::Left => left.join(&right, &left_key, &right_key, false)?,
            JoinType::Right => right.join(&left, &right_key, &left_key, false)?,
        };
        Ok(Response::Table(joined))
    }

    fn update(&mut self, query: &Update) -> Result<Response> {
        let table = self
            .tables
            .get_mut(&query.table)
            .ok_or_else(|| EngineError::NoSuchTable(query.table.clone()))?;
        table.update(&query.values, &query.filters)?;
        Ok(Response::Message(String::from(
            "Information was successfully updated",
        )))
    }

    fn delete(&mut self, query: &Delete) -> Result<Response> {
        let table = self
            .tables
            .get_mut(&query.table)
            .ok_or_else(|| EngineError::NoSuchTable(query.table.clone()))?;
        if query.all_table {
            table.delete_all();
        } else {
            table.delete(&query.filters)?;
        }
        Ok(Response::Message(String::from(
            "Information was successfully deleted",
        )))
    }
}
