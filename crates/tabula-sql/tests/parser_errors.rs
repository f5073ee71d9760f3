//! Tests for parser error cases and message shape.

mod common;
use common::*;

#[test]
fn error_empty_input() {
    let err = parse_err("");
    assert_eq!(err.to_string(), "0: Unsupported query");
}

#[test]
fn error_unknown_statement() {
    let err = parse_err("EXPLAIN SELECT * FROM t");
    assert!(err.to_string().contains("Unsupported query"));
}

#[test]
fn error_messages_carry_position() {
    let err = parse_err("CREATE TUBLE t (a INT PRIMARY KEY)");
    assert_eq!(err.to_string(), "9: Expected 'A', found 'U'");
}

#[test]
fn error_incomplete_create() {
    let err = parse_err("CREATE TABLE t (a INT PRIMARY KEY");
    assert!(err.to_string().contains("Expected"));
}

#[test]
fn error_mismatched_parens_in_filter() {
    let err = parse_err("SELECT a FROM t WHERE (a = 1 AND b = 2");
    assert!(err.to_string().contains("Invalid logic expression"));
}

#[test]
fn error_extra_close_paren_in_filter() {
    let err = parse_err("SELECT a FROM t WHERE a = 1)");
    assert!(err.to_string().contains("Invalid logic expression"));
}

#[test]
fn error_join_in_delete_filter() {
    let err = parse_err("DELETE FROM t WHERE a = 1 JOIN u ON x = y");
    assert!(err.to_string().contains("Invalid query"));
}

#[test]
fn error_join_without_on() {
    let err = parse_err("SELECT a.x FROM a JOIN b");
    assert!(err.to_string().contains("Expected"));
}
