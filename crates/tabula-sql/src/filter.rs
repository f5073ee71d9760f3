//! `WHERE` clause tokenizer and infix-to-postfix conversion.
//!
//! The clause is lowered into a postfix token list via the shunting-yard
//! algorithm, so the engine can evaluate it per row with a single operand
//! stack.

use crate::error::Result;
use crate::lexer::Scanner;

/// Characters that terminate a filter operand.
///
/// Unlike bare identifiers, operands may contain `.` so that floating
/// point literals survive tokenization.
const OPERAND_BREAKERS: &str = ",()'=<>;";

/// A binary operator inside a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl CmpOp {
    /// Shunting-yard precedence; higher binds tighter.
    const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            _ => 3,
        }
    }
}

/// A filter token.
///
/// The postfix output contains only `Var`, `Const` and `Op` tokens.
/// `Res` is produced by the evaluator as an intermediate boolean result.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A column reference.
    Var(String),
    /// A raw textual literal (quotes already stripped).
    Const(String),
    /// Intermediate boolean produced during evaluation.
    Res(bool),
    /// A binary operator.
    Op(CmpOp),
    /// `(`, only present before shunting.
    OpenParen,
    /// `)`, only present before shunting.
    CloseParen,
}

impl Token {
    /// Precedence used on the operator stack; `(` is the floor.
    const fn precedence(&self) -> u8 {
        match self {
            Self::Op(op) => op.precedence(),
            _ => 0,
        }
    }
}

/// The outcome of scanning a filter clause.
#[derive(Debug)]
pub struct FilterClause {
    /// Postfix token list, ready for per-row evaluation.
    pub tokens: Vec<Token>,
    /// True when tokenization stopped at a `JOIN` keyword, which the
    /// statement parser then continues with.
    pub join_follows: bool,
}

/// Scans the remainder of a `WHERE` clause and converts it to postfix.
///
/// Stops at the statement terminator `;` or at the keyword `JOIN`.
///
/// # Errors
///
/// Returns a position-tagged error for an unterminated string literal or
/// mismatched parentheses ("Invalid logic expression").
pub fn parse_filters(scanner: &mut Scanner<'_>) -> Result<FilterClause> {
    let (tokens, join_follows) = tokenize(scanner)?;
    let tokens = to_postfix(scanner, tokens)?;
    Ok(FilterClause {
        tokens,
        join_follows,
    })
}

fn tokenize(scanner: &mut Scanner<'_>) -> Result<(Vec<Token>, bool)> {
    let mut tokens = Vec::new();
    let mut join_follows = false;
    loop {
        scanner.skip_whitespace();
        if scanner.eof() || scanner.test(';') {
            break;
        }
        if scanner.take_if('(') {
            tokens.push(Token::OpenParen);
        } else if scanner.take_if(')') {
            tokens.push(Token::CloseParen);
        } else if scanner.take_if('=') {
            tokens.push(Token::Op(CmpOp::Eq));
        } else if scanner.take_if('<') {
            if scanner.take_if('=') {
                tokens.push(Token::Op(CmpOp::LessEq));
            } else if scanner.take_if('>') {
                tokens.push(Token::Op(CmpOp::NotEq));
            } else {
                tokens.push(Token::Op(CmpOp::Less));
            }
        } else if scanner.take_if('>') {
            if scanner.take_if('=') {
                tokens.push(Token::Op(CmpOp::GreaterEq));
            } else {
                tokens.push(Token::Op(CmpOp::Greater));
            }
        } else if scanner.take_if('\'') {
            tokens.push(Token::Const(scanner.parse_string()?));
        } else {
            let word = take_operand(scanner);
            if word.is_empty() {
                return Err(scanner.error("Invalid logic expression"));
            }
            if word.eq_ignore_ascii_case("JOIN") {
                join_follows = true;
                break;
            }
            if word.eq_ignore_ascii_case("OR") {
                tokens.push(Token::Op(CmpOp::Or));
            } else if word.eq_ignore_ascii_case("AND") {
                tokens.push(Token::Op(CmpOp::And));
            } else if word.eq_ignore_ascii_case("TRUE") || word.eq_ignore_ascii_case("FALSE") {
                tokens.push(Token::Const(word));
            } else if word.chars().next().is_some_and(char::is_alphabetic) {
                tokens.push(Token::Var(word));
            } else {
                tokens.push(Token::Const(word));
            }
        }
    }
    Ok((tokens, join_follows))
}

fn take_operand(scanner: &mut Scanner<'_>) -> String {
    let mut word = String::new();
    while let Some(c) = scanner.peek() {
        if c.is_whitespace() || OPERAND_BREAKERS.contains(c) {
            break;
        }
        word.push(c);
        scanner.take();
    }
    word
}

fn to_postfix(scanner: &Scanner<'_>, tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut postfix = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();
    for token in tokens {
        match token {
            Token::Var(_) | Token::Const(_) => postfix.push(token),
            Token::OpenParen => stack.push(token),
            Token::CloseParen => {
                loop {
                    match stack.pop() {
                        Some(Token::OpenParen) => break,
                        Some(top) => postfix.push(top),
                        None => return Err(scanner.error("Invalid logic expression")),
                    }
                }
            }
            Token::Op(_) => {
                while let Some(top) = stack.pop() {
                    if top.precedence() >= token.precedence() {
                        postfix.push(top);
                    } else {
                        stack.push(top);
                        break;
                    }
                }
                stack.push(token);
            }
            // The tokenizer never produces Res; treat it as an operand.
            Token::Res(_) => postfix.push(token),
        }
    }
    while let Some(top) = stack.pop() {
        if matches!(top, Token::OpenParen) {
            return Err(scanner.error("Invalid logic expression"));
        }
        postfix.push(top);
    }
    Ok(postfix)
}
