// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Restricted formula evaluator for translation rules
//!
//! Formulas compute derived parameters from other parameters by name, e.g.
//! `"A_minus/A_plus"` or `"0.2*1000.0/g_leak"`. The grammar is fixed and
//! deliberately small so the engine stays auditable:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := '-' factor | NUMBER | IDENT | '(' expr ')'
//! ```
//!
//! No function calls, no assignment, no control flow. The free-variable set
//! of every formula is extracted at parse time; table construction uses it
//! for static reference validation and the rule dependency graph.

use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashMap;
use thiserror::Error;

use crate::value::{ParameterValue, ShapeError};

/// Formula parse failure (reported as a malformed rule at table build)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormulaError {
    #[error("unexpected character '{0}' in formula")]
    UnexpectedChar(char),

    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("formula ended unexpectedly")]
    UnexpectedEnd,
}

/// Formula evaluation failure, mapped to a `TranslationError` by the caller
/// (which knows the rule being evaluated)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("undefined name '{0}'")]
    Undefined(String),

    #[error("array length mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },
}

impl From<ShapeError> for EvalError {
    fn from(e: ShapeError) -> Self {
        EvalError::Shape {
            expected: e.expected,
            actual: e.actual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(x) => write!(f, "{}", x),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else if c == 'e' || c == 'E' {
                        // exponent, optionally signed
                        end = i + c.len_utf8();
                        chars.next();
                        if let Some(&(j, s)) = chars.peek() {
                            if s == '+' || s == '-' {
                                end = j + s.len_utf8();
                                chars.next();
                            }
                        }
                    } else {
                        break;
                    }
                }
                let text = &source[start..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber(text.to_string()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(source[start..end].to_string()));
            }
            other => return Err(FormulaError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Ref(String),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> Result<(), FormulaError> {
        match self.next() {
            Some(t) if t == *expected => Ok(()),
            Some(t) => Err(FormulaError::UnexpectedToken(t.to_string())),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.next();
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.next();
            let rhs = self.factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some(Token::Minus) => Ok(Expr::Neg(Box::new(self.factor()?))),
            Some(Token::Number(x)) => Ok(Expr::Number(x)),
            Some(Token::Ident(name)) => Ok(Expr::Ref(name)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.eat(&Token::RParen)?;
                Ok(inner)
            }
            Some(t) => Err(FormulaError::UnexpectedToken(t.to_string())),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

/// Namespace of parameter values a formula evaluates against
#[derive(Debug, Default)]
pub struct Namespace {
    values: AHashMap<String, ParameterValue>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }
}

/// A parsed, immutable formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    ast: Expr,
    free: BTreeSet<String>,
}

impl Formula {
    /// Parse a formula string; the full input must be consumed
    pub fn parse(source: &str) -> Result<Formula, FormulaError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let ast = parser.expr()?;
        if let Some(trailing) = parser.peek() {
            return Err(FormulaError::UnexpectedToken(trailing.to_string()));
        }
        let mut free = BTreeSet::new();
        collect_refs(&ast, &mut free);
        Ok(Formula {
            source: source.to_string(),
            ast,
            free,
        })
    }

    /// The formula as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names the formula references, sorted
    pub fn free_variables(&self) -> &BTreeSet<String> {
        &self.free
    }

    /// Evaluate against a namespace, broadcasting over array values
    pub fn evaluate(&self, namespace: &Namespace) -> Result<ParameterValue, EvalError> {
        eval(&self.ast, namespace)
    }
}

fn collect_refs(expr: &Expr, out: &mut BTreeSet<String>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Ref(name) => {
            out.insert(name.clone());
        }
        Expr::Neg(inner) => collect_refs(inner, out),
        Expr::Binary(_, lhs, rhs) => {
            collect_refs(lhs, out);
            collect_refs(rhs, out);
        }
    }
}

fn eval(expr: &Expr, namespace: &Namespace) -> Result<ParameterValue, EvalError> {
    match expr {
        Expr::Number(x) => Ok(ParameterValue::Scalar(*x)),
        Expr::Ref(name) => namespace
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::Undefined(name.clone())),
        Expr::Neg(inner) => Ok(eval(inner, namespace)?.map(|x| -x)),
        Expr::Binary(op, lhs, rhs) => {
            let a = eval(lhs, namespace)?;
            let b = eval(rhs, namespace)?;
            Ok(a.try_combine(&b, |x, y| op.apply(x, y))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(pairs: &[(&str, ParameterValue)]) -> Namespace {
        let mut namespace = Namespace::new();
        for (name, value) in pairs {
            namespace.insert(*name, value.clone());
        }
        namespace
    }

    #[test]
    fn test_arithmetic_precedence() {
        let formula = Formula::parse("1.0 + 2.0 * 3.0").unwrap();
        let result = formula.evaluate(&Namespace::new()).unwrap();
        assert_eq!(result, ParameterValue::Scalar(7.0));
    }

    #[test]
    fn test_parentheses_and_unary_minus() {
        let formula = Formula::parse("-(1.0 + 3.0) / 2.0").unwrap();
        let result = formula.evaluate(&Namespace::new()).unwrap();
        assert_eq!(result, ParameterValue::Scalar(-2.0));
    }

    #[test]
    fn test_named_references() {
        let formula = Formula::parse("A_minus/A_plus").unwrap();
        let namespace = ns(&[
            ("A_minus", ParameterValue::Scalar(0.02)),
            ("A_plus", ParameterValue::Scalar(0.01)),
        ]);
        let result = formula.evaluate(&namespace).unwrap();
        assert!(result.approx_eq(&ParameterValue::Scalar(2.0), 1e-12));
    }

    #[test]
    fn test_free_variable_extraction() {
        let formula = Formula::parse("rate/1000.0*duration").unwrap();
        let free: Vec<&str> = formula.free_variables().iter().map(String::as_str).collect();
        assert_eq!(free, vec!["duration", "rate"]);
    }

    #[test]
    fn test_scientific_notation() {
        let formula = Formula::parse("1e3 * x").unwrap();
        let namespace = ns(&[("x", ParameterValue::Scalar(2.0))]);
        assert_eq!(
            formula.evaluate(&namespace).unwrap(),
            ParameterValue::Scalar(2000.0)
        );
    }

    #[test]
    fn test_array_broadcast_in_formula() {
        let formula = Formula::parse("1000.0/rate").unwrap();
        let namespace = ns(&[("rate", ParameterValue::from(vec![10.0, 20.0, 50.0]))]);
        let result = formula.evaluate(&namespace).unwrap();
        assert!(result.approx_eq(&ParameterValue::from(vec![100.0, 50.0, 20.0]), 1e-12));
    }

    #[test]
    fn test_undefined_reference() {
        let formula = Formula::parse("alpha*lambda").unwrap();
        let namespace = ns(&[("alpha", ParameterValue::Scalar(2.0))]);
        let err = formula.evaluate(&namespace).unwrap_err();
        assert_eq!(err, EvalError::Undefined("lambda".to_string()));
    }

    #[test]
    fn test_rejects_function_call_syntax() {
        // '(' after an identifier parses as a trailing token, not a call
        assert!(Formula::parse("exp(x)").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Formula::parse("a ** b").is_err());
        assert!(Formula::parse("a;b").is_err());
        assert!(Formula::parse("").is_err());
        assert!(Formula::parse("1.0.0").is_err());
    }
}
