//! Expressions used by `if`, `elseif` and `=` tags.
//!
//! The grammar is deliberately small: literals, variable paths, a handful of
//! operators and built-in functions. It is parsed once at compile time and
//! stored in the compiled program; evaluation happens in the executor.
//!
//! Precedence, loosest first: `|| or`, `&& and`, `== !=`, `< <= > >=`,
//! `+ - ~`, `* / %`, then unary `! not -`.

use crate::error::{Result, VellumError};
use crate::syntax::path::VarPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A literal value.
    Literal(Value),
    /// A variable reference.
    Var(VarPath),
    /// A prefix operator.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// An infix operator.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A built-in function call.
    Call { func: Func, args: Vec<Expr> },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Func {
    /// Number of elements (or characters for strings).
    Count,
    /// Whether the value is falsy.
    Empty,
    /// Whether the value is bound and not null.
    Defined,
    /// Uppercase a string.
    Upper,
    /// Lowercase a string.
    Lower,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "count" | "length" => Some(Func::Count),
            "empty" => Some(Func::Empty),
            "defined" | "isset" => Some(Func::Defined),
            "upper" => Some(Func::Upper),
            "lower" => Some(Func::Lower),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(Value),
    Path(VarPath),
    Name(String),
    Op(BinaryOp),
    Not,
    Minus,
    LParen,
    RParen,
    Comma,
}

/// Parse a complete expression.
///
/// # Example
///
/// ```
/// use vellum::syntax::{parse_expr, BinaryOp, Expr};
///
/// let expr = parse_expr("count(items) > 2 && user.admin").unwrap();
/// assert!(matches!(expr, Expr::Binary { op: BinaryOp::And, .. }));
/// ```
pub fn parse_expr(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
    };
    let expr = parser.expression(0)?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let error = |message: &str| VellumError::Expression {
        expr: input.to_string(),
        message: message.to_string(),
    };

    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(c) = rest.chars().next() else { break };

        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        let two = rest.get(..2).unwrap_or("");
        let three = rest.get(..3).unwrap_or("");
        let (token, len) = match (three, two, c) {
            ("===", _, _) => (Token::Op(BinaryOp::Eq), 3),
            ("!==", _, _) => (Token::Op(BinaryOp::Ne), 3),
            (_, "==", _) => (Token::Op(BinaryOp::Eq), 2),
            (_, "!=", _) => (Token::Op(BinaryOp::Ne), 2),
            (_, "<=", _) => (Token::Op(BinaryOp::Le), 2),
            (_, ">=", _) => (Token::Op(BinaryOp::Ge), 2),
            (_, "&&", _) => (Token::Op(BinaryOp::And), 2),
            (_, "||", _) => (Token::Op(BinaryOp::Or), 2),
            (_, _, '<') => (Token::Op(BinaryOp::Lt), 1),
            (_, _, '>') => (Token::Op(BinaryOp::Gt), 1),
            (_, _, '+') => (Token::Op(BinaryOp::Add), 1),
            (_, _, '-') => (Token::Minus, 1),
            (_, _, '~') => (Token::Op(BinaryOp::Concat), 1),
            (_, _, '*') => (Token::Op(BinaryOp::Mul), 1),
            (_, _, '/') => (Token::Op(BinaryOp::Div), 1),
            (_, _, '%') => (Token::Op(BinaryOp::Rem), 1),
            (_, _, '!') => (Token::Not, 1),
            (_, _, '(') => (Token::LParen, 1),
            (_, _, ')') => (Token::RParen, 1),
            (_, _, ',') => (Token::Comma, 1),
            (_, _, '\'' | '"') => {
                let close = rest[1..]
                    .find(c)
                    .ok_or_else(|| error("unterminated string"))?;
                let text = rest[1..close + 1].to_string();
                (Token::Literal(Value::String(text)), close + 2)
            }
            (_, _, d) if d.is_ascii_digit() => number(rest).ok_or_else(|| error("bad number"))?,
            _ => match VarPath::prefix_len(rest) {
                Some(len) => (word_token(&rest[..len]), len),
                None => return Err(error(&format!("unexpected character '{}'", c))),
            },
        };

        tokens.push(token);
        pos += len;
    }

    Ok(tokens)
}

fn number(rest: &str) -> Option<(Token, usize)> {
    let int_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let frac = rest[int_len..]
        .strip_prefix('.')
        .filter(|f| f.starts_with(|c: char| c.is_ascii_digit()));

    match frac {
        Some(f) => {
            let frac_len = f.find(|c: char| !c.is_ascii_digit()).unwrap_or(f.len());
            let len = int_len + 1 + frac_len;
            let value: f64 = rest[..len].parse().ok()?;
            let number = serde_json::Number::from_f64(value)?;
            Some((Token::Literal(Value::Number(number)), len))
        }
        None => {
            let value: i64 = rest[..int_len].parse().ok()?;
            Some((Token::Literal(Value::from(value)), int_len))
        }
    }
}

fn word_token(word: &str) -> Token {
    match word {
        "true" => Token::Literal(Value::Bool(true)),
        "false" => Token::Literal(Value::Bool(false)),
        "null" => Token::Literal(Value::Null),
        "and" => Token::Op(BinaryOp::And),
        "or" => Token::Op(BinaryOp::Or),
        "not" => Token::Not,
        _ => match VarPath::parse(word) {
            Some(path) if path.segments.is_empty() && !word.starts_with('$') => {
                Token::Name(path.root)
            }
            Some(path) => Token::Path(path),
            None => Token::Name(word.to_string()),
        },
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> VellumError {
        VellumError::Expression {
            expr: self.input.to_string(),
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expression(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut left = self.unary()?;

        loop {
            let op = match self.peek() {
                Some(Token::Op(op)) => *op,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            let precedence = op.precedence();
            if precedence <= min_precedence {
                break;
            }
            self.pos += 1;
            let right = self.expression(precedence)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(Token::Not) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.primary(),
        };
        self.pos += 1;
        let operand = self.unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Literal(value)) => Ok(Expr::Literal(value)),
            Some(Token::Path(path)) => Ok(Expr::Var(path)),
            Some(Token::Name(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    let func = Func::from_name(&name)
                        .ok_or_else(|| self.error(&format!("unknown function '{}'", name)))?;
                    self.pos += 1;
                    let args = self.arguments()?;
                    Ok(Expr::Call { func, args })
                } else {
                    Ok(Expr::Var(VarPath::simple(name)))
                }
            }
            Some(Token::LParen) => {
                let inner = self.expression(0)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.error("expected ')'")),
                }
            }
            Some(_) => Err(self.error("unexpected operator")),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expression(0)?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
    }
}
