//! Flat-file persistence.
//!
//! The format is tab-and-newline-delimited text:
//!
//! ```text
//! <n_tables>
//! <table_name>
//! <n_columns>\t<n_rows>
//! <col_name>\t<type_id>\t<max_len>\t<is_primary>\t<not_null>\t<n_values>\t<v1>\t<v2>…
//! ```
//!
//! Nulls are written as the sentinel token `NULL` and booleans as `0`/`1`.
//! Records are split on tabs, so string values keep embedded spaces;
//! values containing tabs or newlines are not representable.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use tracing::{debug, info};

use tabula_sql::DataType;

use crate::column::Column;
use crate::database::Database;
use crate::error::{EngineError, Result};
use crate::table::Table;

pub(crate) fn save(db: &Database, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let n_tables = db.tables().count();
    writeln!(file, "{n_tables}")?;
    for (name, table) in db.tables() {
        writeln!(file, "{name}")?;
        write_table(&mut file, table)?;
    }
    file.flush()?;
    info!(path = %path.display(), tables = n_tables, "database saved");
    Ok(())
}

fn write_table(file: &mut impl Write, table: &Table) -> Result<()> {
    writeln!(
        file,
        "{}\t{}",
        table.columns().count(),
        table.n_rows()
    )?;
    for (name, column) in table.columns() {
        write!(
            file,
            "{name}\t{}\t{}\t{}\t{}\t{}",
            column.data_type().type_id(),
            column.max_len_of_value(),
            u8::from(column.is_primary()),
            u8::from(column.not_null()),
            column.size()
        )?;
        for value in column.values() {
            write!(file, "\t{}", value.storage_text())?;
        }
        writeln!(file)?;
    }
    Ok(())
}

pub(crate) fn load(db: &mut Database, path: &Path) -> Result<()> {
    let mut lines = BufReader::new(File::open(path)?).lines();
    let n_tables: usize = parse_field(&next_line(&mut lines)?)?;
    for _ in 0..n_tables {
        let name = next_line(&mut lines)?;
        let table = read_table(&mut lines)?;
        debug!(table = %name, rows = table.n_rows(), "table loaded");
        db.add_table(name, table);
    }
    info!(path = %path.display(), tables = n_tables, "database opened");
    Ok(())
}

fn read_table(lines: &mut Lines<BufReader<File>>) -> Result<Table> {
    let header = next_line(lines)?;
    let mut fields = header.split('\t');
    let n_columns: usize = parse_field(fields.next().unwrap_or_default())?;
    let n_rows: usize = parse_field(fields.next().unwrap_or_default())?;

    let mut table = Table::new();
    for _ in 0..n_columns {
        let record = next_line(lines)?;
        let (name, column) = read_column(&record, n_rows)?;
        table.add_column(name, column);
    }
    table.set_n_rows(n_rows);
    Ok(table)
}

fn read_column(record: &str, n_rows: usize) -> Result<(String, Column)> {
    let mut fields = record.split('\t');
    let name = fields
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| EngineError::CorruptFile(String::from("missing column name")))?;
    let type_id: u8 = parse_field(fields.next().unwrap_or_default())?;
    let data_type = DataType::from_type_id(type_id)
        .ok_or_else(|| EngineError::CorruptFile(format!("unknown type id {type_id}")))?;
    let max_len: usize = parse_field(fields.next().unwrap_or_default())?;
    let is_primary: u8 = parse_field(fields.next().unwrap_or_default())?;
    let not_null: u8 = parse_field(fields.next().unwrap_or_default())?;
    let n_values: usize = parse_field(fields.next().unwrap_or_default())?;
    if n_values != n_rows {
        return Err(EngineError::CorruptFile(format!(
            "column '{name}' holds {n_values} values, expected {n_rows}"
        )));
    }

    let mut column = Column::restore(data_type, max_len, is_primary != 0, not_null != 0);
    let mut read = 0;
    for value in fields {
        column.emplace_value(value)?;
        read += 1;
    }
    if read != n_values {
        return Err(EngineError::CorruptFile(format!(
            "column '{name}' record has {read} values, expected {n_values}"
        )));
    }
    Ok((String::from(name), column))
}

fn next_line(lines: &mut Lines<BufReader<File>>) -> Result<String> {
    lines
        .next()
        .transpose()?
        .ok_or_else(|| EngineError::CorruptFile(String::from("unexpected end of file")))
}

fn parse_field<T: std::str::FromStr>(field: &str) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| EngineError::CorruptFile(format!("malformed field '{field}'")))
}
