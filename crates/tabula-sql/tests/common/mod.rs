#![allow(dead_code)]

use tabula_sql::query::{CreateTable, Delete, Insert, Query, Select, Update};
use tabula_sql::{ParseError, SqlParser};

pub fn parse(sql: &str) -> Query {
    SqlParser::new(sql)
        .parse()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    SqlParser::new(sql)
        .parse()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_create(sql: &str) -> CreateTable {
    match parse(sql) {
        Query::Create(c) => c,
        other => panic!("Expected CREATE, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> Insert {
    match parse(sql) {
        Query::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_select(sql: &str) -> Select {
    match parse(sql) {
        Query::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> Update {
    match parse(sql) {
        Query::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> Delete {
    match parse(sql) {
        Query::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}
