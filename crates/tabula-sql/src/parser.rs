//! Recursive-descent parser for the query language.
//!
//! Statements are dispatched on their first letters, matched
//! case-insensitively at the character level so string literals keep
//! their casing. One statement per input; the optional trailing `;` is
//! consumed and anything after it is an error.

use std::collections::HashMap;

use crate::error::{ParseError, Result};
use crate::filter;
use crate::lexer::Scanner;
use crate::query::{
    ColumnDef, CreateTable, Delete, DropTable, Insert, Join, JoinType, Query, Select, Update,
};
use crate::types::DataType;

/// Parser for a single statement.
pub struct SqlParser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> SqlParser<'a> {
    /// Creates a parser for the given statement text.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
        }
    }

    /// Parses the statement into a typed descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the input is not one well-formed
    /// statement.
    pub fn parse(mut self) -> Result<Query> {
        self.scanner.skip_whitespace();
        if self.scanner.take_if('C') {
            Ok(Query::Create(self.parse_create()?))
        } else if self.scanner.take_if('I') {
            Ok(Query::Insert(self.parse_insert()?))
        } else if self.scanner.take_if('S') {
            Ok(Query::Select(self.parse_select()?))
        } else if self.scanner.take_if('U') {
            Ok(Query::Update(self.parse_update()?))
        } else if self.scanner.take_if('D') {
            if self.scanner.take_if('E') {
                Ok(Query::Delete(self.parse_delete()?))
            } else if self.scanner.take_if('R') {
                Ok(Query::Drop(self.parse_drop()?))
            } else {
                Err(self.scanner.error("Unsupported query"))
            }
        } else {
            Err(self.scanner.error("Unsupported query"))
        }
    }

    /// `CREATE TABLE <name> (<col> <type> [PRIMARY KEY] [NOT NULL], …)`
    fn parse_create(&mut self) -> Result<CreateTable> {
        self.scanner.expect("REATE")?;
        self.scanner.skip_whitespace();
        self.scanner.expect("TABLE")?;
        self.scanner.skip_whitespace();

        let table = self.scanner.take_word();
        self.scanner.skip_whitespace();
        self.scanner.expect_char('(')?;

        let mut columns = Vec::new();
        let mut primary_key = None;
        while !self.scanner.eof() && !self.scanner.test(')') {
            self.scanner.skip_whitespace();
            let name = self.scanner.take_word();
            self.scanner.skip_whitespace();

            let mut size = 0;
            let data_type = if self.scanner.take_if('I') {
                self.scanner.expect("NT")?;
                DataType::Int
            } else if self.scanner.take_if('B') {
                self.scanner.expect("OOL")?;
                DataType::Bool
            } else if self.scanner.take_if('D') {
                self.scanner.expect("OUBLE")?;
                DataType::Double
            } else if self.scanner.take_if('F') {
                self.scanner.expect("LOAT")?;
                DataType::Float
            } else if self.scanner.take_if('V') {
                self.scanner.expect("ARCHAR")?;
                self.scanner.skip_whitespace();
                self.scanner.expect_char('(')?;
                self.scanner.skip_whitespace();
                size = self.parse_varchar_size()?;
                self.scanner.skip_whitespace();
                self.scanner.expect_char(')')?;
                DataType::Varchar
            } else {
                return Err(self.scanner.error("Invalid data type"));
            };
            self.scanner.skip_whitespace();

            if primary_key.is_none() && self.scanner.take_if('P') {
                self.scanner.expect("RIMARY")?;
                self.scanner.skip_whitespace();
                self.scanner.expect("KEY")?;
                self.scanner.skip_whitespace();
                primary_key = Some(columns.len());
            }
            let mut not_null = false;
            if self.scanner.take_if('N') {
                self.scanner.expect("OT")?;
                self.scanner.skip_whitespace();
                self.scanner.expect("NULL")?;
                not_null = true;
                self.scanner.skip_whitespace();
            }
            if !self.scanner.test(')') {
                self.scanner.expect_char(',')?;
            }
            columns.push(ColumnDef {
                name,
                data_type,
                size,
                not_null,
            });
        }
        self.scanner.expect_char(')')?;

        let primary_key = primary_key.ok_or(ParseError::PrimaryKeyNotSet)?;
        self.finish_statement()?;

        Ok(CreateTable {
            table,
            columns,
            primary_key,
        })
    }

    fn parse_varchar_size(&mut self) -> Result<usize> {
        let mut digits = String::new();
        while let Some(c) = self.scanner.peek() {
            if c.is_whitespace() || c == ')' {
                break;
            }
            digits.push(c);
            self.scanner.take();
        }
        match digits.parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(self.scanner.error("Varchar size is not set")),
        }
    }

    /// `DROP TABLE <name>`
    fn parse_drop(&mut self) -> Result<DropTable> {
        self.scanner.expect("OP")?;
        self.scanner.skip_whitespace();
        self.scanner.expect("TABLE")?;
        self.scanner.skip_whitespace();

        let table = self.scanner.take_word();
        self.finish_statement()?;
        Ok(DropTable { table })
    }

    /// `INSERT INTO <name> (<columns>) VALUES (<literals>)`
    fn parse_insert(&mut self) -> Result<Insert> {
        self.scanner.expect("NSERT")?;
        self.scanner.skip_whitespace();
        self.scanner.expect("INTO")?;
        self.scanner.skip_whitespace();

        let table = self.scanner.take_word();

        let mut columns = Vec::new();
        self.scanner.skip_whitespace();
        self.scanner.expect_char('(')?;
        while !self.scanner.eof() && !self.scanner.test(')') {
            self.scanner.skip_whitespace();
            columns.push(self.scanner.take_word());
            self.scanner.skip_whitespace();
            if !self.scanner.test(')') {
                self.scanner.expect_char(',')?;
            }
        }
        self.scanner.expect_char(')')?;
        self.scanner.skip_whitespace();

        self.scanner.expect("VALUES")?;
        self.scanner.skip_whitespace();
        self.scanner.expect_char('(')?;
        let mut values = HashMap::new();
        let mut next = 0;
        while !self.scanner.eof() && !self.scanner.test(')') {
            self.scanner.skip_whitespace();
            let literal = self.take_literal()?;
            self.scanner.skip_whitespace();
            if literal.is_empty() {
                return Err(self.scanner.error("Invalid value"));
            }
            if !self.scanner.test(')') {
                self.scanner.expect_char(',')?;
            }
            let Some(column) = columns.get(next) else {
                return Err(self.scanner.error("Invalid query"));
            };
            values.insert(column.clone(), literal);
            next += 1;
        }
        self.scanner.expect_char(')')?;

        self.finish_statement()?;
        Ok(Insert { table, values })
    }

    /// `SELECT (*|columns) FROM <t1> [WHERE <filter> | LEFT | RIGHT] [JOIN <t2> ON <a> = <b>]`
    fn parse_select(&mut self) -> Result<Select> {
        self.scanner.expect("ELECT")?;
        self.scanner.skip_whitespace();

        let mut table1: Option<String> = None;
        let mut table2: Option<String> = None;
        let mut columns1 = Vec::new();
        let mut columns2 = Vec::new();
        let mut unqualified = Vec::new();
        let mut all_table = false;

        if self.scanner.take_if('*') {
            all_table = true;
        } else {
            loop {
                let word = self.scanner.take_word();
                if self.scanner.take_if('.') {
                    let column = self.scanner.take_word();
                    // First qualifier seen binds table1, the second table2.
                    if table1.is_none() || table1.as_deref() == Some(word.as_str()) {
                        table1 = Some(word);
                        columns1.push(column);
                    } else if table2.is_none() || table2.as_deref() == Some(word.as_str()) {
                        table2 = Some(word);
                        columns2.push(column);
                    } else {
                        return Err(self.scanner.error("Invalid query"));
                    }
                } else {
                    unqualified.push(word);
                }
                self.scanner.skip_whitespace();
                if self.scanner.take_if(',') {
                    self.scanner.skip_whitespace();
                } else {
                    break;
                }
            }
        }

        self.scanner.skip_whitespace();
        self.scanner.expect("FROM")?;
        self.scanner.skip_whitespace();

        let from = self.scanner.take_word();
        if let Some(bound) = &table1 {
            if *bound != from {
                return Err(self.scanner.error("Invalid query"));
            }
        }
        let table1 = from;
        self.scanner.skip_whitespace();

        let mut kind = JoinType::Inner;
        let mut filters = Vec::new();
        let mut join_follows = false;
        if self.scanner.take_if('W') {
            self.scanner.expect("HERE")?;
            self.scanner.skip_whitespace();
            let clause = filter::parse_filters(&mut self.scanner)?;
            filters = clause.tokens;
            join_follows = clause.join_follows;
        } else if self.scanner.take_if('L') {
            self.scanner.expect("EFT")?;
            kind = JoinType::Left;
        } else if self.scanner.take_if('R') {
            self.scanner.expect("IGHT")?;
            kind = JoinType::Right;
        }
        self.scanner.skip_whitespace();

        let mut join = None;
        if join_follows {
            join = Some(self.parse_join_tail(&table1, &mut table2, kind)?);
        } else if self.scanner.take_if('J') {
            self.scanner.expect("OIN")?;
            join = Some(self.parse_join_tail(&table1, &mut table2, kind)?);
        }

        self.finish_statement()?;
        Ok(Select {
            table1,
            table2,
            columns1,
            columns2,
            unqualified,
            filters,
            all_table,
            join,
        })
    }

    /// The `<t2> ON <a> = <b>` part, entered with `JOIN` already consumed.
    fn parse_join_tail(
        &mut self,
        table1: &str,
        table2: &mut Option<String>,
        kind: JoinType,
    ) -> Result<Join> {
        self.scanner.skip_whitespace();
        let word = self.scanner.take_word();
        match table2 {
            None => *table2 = Some(word),
            Some(bound) if *bound == word => {}
            Some(_) => return Err(self.scanner.error("Invalid query")),
        }
        self.scanner.skip_whitespace();
        self.scanner.expect("ON")?;
        self.scanner.skip_whitespace();

        let mut left: Option<String> = None;
        let mut right: Option<String> = None;

        let word = self.scanner.take_word();
        if self.scanner.take_if('.') {
            let column = self.scanner.take_word();
            if word == table1 {
                left = Some(column);
            } else if table2.as_deref() == Some(word.as_str()) {
                right = Some(column);
            } else {
                return Err(self.scanner.error("Invalid query"));
            }
        } else {
            left = Some(word);
        }
        self.scanner.skip_whitespace();
        self.scanner.expect_char('=')?;
        self.scanner.skip_whitespace();

        let word = self.scanner.take_word();
        if self.scanner.take_if('.') {
            let column = self.scanner.take_word();
            if word == table1 && left.is_none() {
                left = Some(column);
            } else if table2.as_deref() == Some(word.as_str()) && right.is_none() {
                right = Some(column);
            } else {
                return Err(self.scanner.error("Invalid query"));
            }
        } else if left.is_none() {
            left = Some(word);
        } else {
            right = Some(word);
        }

        let (Some(left_column), Some(right_column)) = (left, right) else {
            return Err(self.scanner.error("Invalid query"));
        };
        let table = table2.clone().unwrap_or_default();
        Ok(Join {
            table,
            left_column,
            right_column,
            kind,
        })
    }

    /// `UPDATE <name> SET <col> = <literal>, … [WHERE <filter>]`
    fn parse_update(&mut self) -> Result<Update> {
        self.scanner.expect("PDATE")?;
        self.scanner.skip_whitespace();

        let table = self.scanner.take_word();
        self.scanner.skip_whitespace();
        self.scanner.expect("SET")?;
        self.scanner.skip_whitespace();

        let mut values = HashMap::new();
        loop {
            let column = self.scanner.take_word();
            self.scanner.skip_whitespace();
            self.scanner.expect_char('=')?;
            self.scanner.skip_whitespace();
            let literal = self.take_literal()?;
            self.scanner.skip_whitespace();
            if literal.is_empty() {
                return Err(self.scanner.error("Invalid value"));
            }
            values.insert(column, literal);
            if self.scanner.take_if(',') {
                self.scanner.skip_whitespace();
            } else {
                break;
            }
        }

        let mut filters = Vec::new();
        if self.scanner.take_if('W') {
            self.scanner.expect("HERE")?;
            self.scanner.skip_whitespace();
            let clause = filter::parse_filters(&mut self.scanner)?;
            if clause.join_follows {
                return Err(self.scanner.error("Invalid query"));
            }
            filters = clause.tokens;
        }

        self.finish_statement()?;
        Ok(Update {
            table,
            values,
            filters,
        })
    }

    /// `DELETE FROM <name> [WHERE <filter>]`
    fn parse_delete(&mut self) -> Result<Delete> {
        self.scanner.expect("LETE")?;
        self.scanner.skip_whitespace();
        self.scanner.expect("FROM")?;
        self.scanner.skip_whitespace();

        let table = self.scanner.take_word();
        self.scanner.skip_whitespace();

        let mut filters = Vec::new();
        let mut all_table = true;
        if self.scanner.take_if('W') {
            self.scanner.expect("HERE")?;
            self.scanner.skip_whitespace();
            let clause = filter::parse_filters(&mut self.scanner)?;
            if clause.join_follows {
                return Err(self.scanner.error("Invalid query"));
            }
            filters = clause.tokens;
            all_table = false;
        }

        self.finish_statement()?;
        Ok(Delete {
            table,
            filters,
            all_table,
        })
    }

    /// A value literal: a bare word or a single-quoted string.
    ///
    /// Bare words run to the next `,`, `)`, `;` or whitespace, so signed
    /// numbers and floats stay whole. Quoted strings keep embedded
    /// whitespace and have their quotes stripped.
    fn take_literal(&mut self) -> Result<String> {
        let mut literal = String::new();
        while let Some(c) = self.scanner.peek() {
            if c.is_whitespace() || c == ',' || c == ')' || c == ';' {
                break;
            }
            if self.scanner.take_if('\'') {
                literal = self.scanner.parse_string()?;
            } else if let Some(c) = self.scanner.take() {
                literal.push(c);
            }
        }
        Ok(literal)
    }

    /// Optional trailing `;`, then end of input.
    fn finish_statement(&mut self) -> Result<()> {
        self.scanner.skip_whitespace();
        self.scanner.take_if(';');
        self.scanner.skip_whitespace();
        self.scanner.check_eof()
    }
}
