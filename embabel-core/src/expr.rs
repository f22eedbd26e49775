//! A minimal expression grammar for condition evaluators.
//!
//! Grammar (highest to lowest precedence): literals and dotted identifiers
//! (member access, e.g. `elephant.age`, is just a dotted identifier looked up
//! directly in the binding environment -- the evaluator does no struct
//! traversal of its own), parenthesized groups, unary `!`, comparisons
//! (`>`, `<`, `>=`, `<=`, `==`, `!=`), `&&`, and `||`.
//!
//! Evaluation never panics: a parse error, a missing binding, or a type
//! mismatch all produce `None` from [`Expression::eval`], which callers map
//! to `Determination::Unknown`.

use std::collections::HashMap;
use std::fmt;

/// A value bound in the evaluation environment, or produced by evaluating a
/// sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl ExprValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            ExprValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ExprValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprValue::Bool(b) => write!(f, "{b}"),
            ExprValue::Number(n) => write!(f, "{n}"),
            ExprValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// An environment of bound names, built from a blackboard by the caller
/// (typically by lower-cased type simple name, with explicit binding names
/// overriding -- see `embabel_core::system::ConditionEvaluator`).
pub type Env = HashMap<String, ExprValue>;

/// A parsed, reusable boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    ast: Expr,
}

impl Expression {
    /// Parse `source`. Returns `None` on any syntax error -- callers treat
    /// that the same as an evaluation failure (UNKNOWN), never a panic.
    pub fn parse(source: &str) -> Option<Self> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let ast = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return None;
        }
        Some(Self { ast })
    }

    /// Evaluate against `env`. `None` on a missing binding or type mismatch.
    pub fn eval(&self, env: &Env) -> Option<bool> {
        eval_expr(&self.ast, env)?.as_bool()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(ExprValue),
    Ident(String),
    Not(Box<Expr>),
    Cmp(Box<Expr>, CmpOp, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CmpOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    True,
    False,
    Not,
    And,
    Or,
    Op(CmpOp),
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    let mut tokens = Vec::new();

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Op(CmpOp::Ne));
                    i += 2;
                } else {
                    tokens.push(Token::Not);
                    i += 1;
                }
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Op(CmpOp::Ge));
                    i += 2;
                } else {
                    tokens.push(Token::Op(CmpOp::Gt));
                    i += 1;
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Op(CmpOp::Le));
                    i += 2;
                } else {
                    tokens.push(Token::Op(CmpOp::Lt));
                    i += 1;
                }
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Op(CmpOp::Eq));
                i += 2;
            }
            '"' => {
                let mut s = String::new();
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    s.push(chars[i]);
                    i += 1;
                }
                if i >= chars.len() {
                    return None; // unterminated string
                }
                i += 1;
                tokens.push(Token::Str(s));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(text.parse().ok()?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(match text.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Ident(text),
                });
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.bump();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.bump();
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_not(&mut self) -> Option<Expr> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.bump();
            return Some(Expr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_cmp()
    }

    fn parse_cmp(&mut self) -> Option<Expr> {
        let left = self.parse_atom()?;
        if let Some(Token::Op(op)) = self.peek().cloned() {
            self.bump();
            let right = self.parse_atom()?;
            return Some(Expr::Cmp(Box::new(left), op, Box::new(right)));
        }
        Some(left)
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        match self.bump()?.clone() {
            Token::True => Some(Expr::Literal(ExprValue::Bool(true))),
            Token::False => Some(Expr::Literal(ExprValue::Bool(false))),
            Token::Number(n) => Some(Expr::Literal(ExprValue::Number(n))),
            Token::Str(s) => Some(Expr::Literal(ExprValue::Str(s))),
            Token::Ident(name) => Some(Expr::Ident(name)),
            Token::LParen => {
                let inner = self.parse_or()?;
                if !matches!(self.bump(), Some(Token::RParen)) {
                    return None;
                }
                Some(inner)
            }
            _ => None,
        }
    }
}

fn eval_expr(expr: &Expr, env: &Env) -> Option<ExprValue> {
    match expr {
        Expr::Literal(v) => Some(v.clone()),
        Expr::Ident(name) => env.get(name).cloned(),
        Expr::Not(inner) => Some(ExprValue::Bool(!eval_expr(inner, env)?.as_bool()?)),
        Expr::And(a, b) => {
            Some(ExprValue::Bool(eval_expr(a, env)?.as_bool()? && eval_expr(b, env)?.as_bool()?))
        }
        Expr::Or(a, b) => {
            Some(ExprValue::Bool(eval_expr(a, env)?.as_bool()? || eval_expr(b, env)?.as_bool()?))
        }
        Expr::Cmp(a, op, b) => {
            let a = eval_expr(a, env)?;
            let b = eval_expr(b, env)?;
            eval_cmp(&a, *op, &b)
        }
    }
}

fn eval_cmp(a: &ExprValue, op: CmpOp, b: &ExprValue) -> Option<ExprValue> {
    let result = match (a, b) {
        (ExprValue::Number(x), ExprValue::Number(y)) => match op {
            CmpOp::Gt => *x > *y,
            CmpOp::Lt => *x < *y,
            CmpOp::Ge => *x >= *y,
            CmpOp::Le => *x <= *y,
            CmpOp::Eq => *x == *y,
            CmpOp::Ne => *x != *y,
        },
        (ExprValue::Str(x), ExprValue::Str(y)) => match op {
            CmpOp::Eq => x == y,
            CmpOp::Ne => x != y,
            _ => return None, // strings are not ordered in this grammar
        },
        (ExprValue::Bool(x), ExprValue::Bool(y)) => match op {
            CmpOp::Eq => x == y,
            CmpOp::Ne => x != y,
            _ => return None,
        },
        _ => return None, // mismatched types: not a failure the caller should panic on
    };
    Some(ExprValue::Bool(result))
}
