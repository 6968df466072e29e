//! Boolean expression language used inside selector tags
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or_expr    := and_expr ("or" and_expr)*
//! and_expr   := not_expr ("and" not_expr)*
//! not_expr   := "not" not_expr | comparison
//! comparison := atom (("==" | "!=" | "<" | "<=" | ">" | ">=") atom)*
//! atom       := IDENT | INT | STRING | "True" | "False" | "(" or_expr ")"
//! ```
//!
//! `and`/`or` short-circuit, so a variable on the skipped side is never
//! looked up. Comparisons chain (`20 <= py < 30`).

use super::context::{SelectorContext, SelectorValue};
use std::cmp::Ordering;
use std::fmt;

/// Failure while parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// Malformed expression
    Syntax(String),
    /// Identifier missing from the context
    UndefinedVariable(String),
    /// Operands that cannot be ordered against each other
    TypeMismatch(String),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Syntax(msg) => write!(f, "syntax error: {}", msg),
            ExprError::UndefinedVariable(name) => write!(f, "name '{}' is not defined", name),
            ExprError::TypeMismatch(msg) => write!(f, "type mismatch: {}", msg),
        }
    }
}

impl std::error::Error for ExprError {}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(i64),
    Str(String),
    True,
    False,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Cmp(CmpOp),
}

/// A digit, or a minus sign directly followed by one
fn is_int_start(rest: &[char]) -> bool {
    match rest {
        [c, ..] if c.is_ascii_digit() => true,
        ['-', d, ..] => d.is_ascii_digit(),
        _ => false,
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' | '!' | '<' | '>' => {
                let next_is_eq = chars.get(i + 1) == Some(&'=');
                let op = match (c, next_is_eq) {
                    ('=', true) => CmpOp::Eq,
                    ('!', true) => CmpOp::Ne,
                    ('<', true) => CmpOp::Le,
                    ('>', true) => CmpOp::Ge,
                    ('<', false) => CmpOp::Lt,
                    ('>', false) => CmpOp::Gt,
                    _ => return Err(ExprError::Syntax(format!("unexpected character '{}'", c))),
                };
                tokens.push(Token::Cmp(op));
                i += if next_is_eq { 2 } else { 1 };
            }
            '\'' | '"' => {
                let quote = c;
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&ch| ch == quote)
                    .map(|offset| start + offset)
                    .ok_or_else(|| ExprError::Syntax("unterminated string literal".to_string()))?;
                tokens.push(Token::Str(chars[start..end].iter().collect()));
                i = end + 1;
            }
            _ if is_int_start(&chars[i..]) => {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<i64>()
                    .map_err(|_| ExprError::Syntax(format!("integer literal '{}' out of range", literal)))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "True" => Token::True,
                    "False" => Token::False,
                    _ => Token::Ident(word),
                });
            }
            other => {
                return Err(ExprError::Syntax(format!("unexpected character '{}'", other)));
            }
        }
    }

    Ok(tokens)
}

/// Parsed selector expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(SelectorValue),
    Var(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn or_expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.not_expr()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ExprError> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.not_expr()?)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let first = self.atom()?;
        let mut rest = Vec::new();
        while let Some(Token::Cmp(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            rest.push((op, self.atom()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare(Box::new(first), rest))
        }
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(Expr::Var(name)),
            Some(Token::Int(n)) => Ok(Expr::Literal(SelectorValue::Int(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(SelectorValue::Str(s))),
            Some(Token::True) => Ok(Expr::Literal(SelectorValue::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(SelectorValue::Bool(false))),
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ExprError::Syntax("expected ')'".to_string())),
                }
            }
            Some(other) => Err(ExprError::Syntax(format!("unexpected token {:?}", other))),
            None => Err(ExprError::Syntax("unexpected end of expression".to_string())),
        }
    }
}

impl Expr {
    /// Parses an expression from selector text
    pub fn parse(input: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ExprError::Syntax("empty expression".to_string()));
        }

        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.or_expr()?;
        if let Some(extra) = parser.peek() {
            return Err(ExprError::Syntax(format!("unexpected token {:?}", extra)));
        }
        Ok(expr)
    }

    /// Evaluates the expression to a value
    pub fn eval(&self, ctx: &SelectorContext) -> Result<SelectorValue, ExprError> {
        match self {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Var(name) => ctx
                .get(name)
                .cloned()
                .ok_or_else(|| ExprError::UndefinedVariable(name.clone())),
            Expr::Not(inner) => Ok(SelectorValue::Bool(!inner.eval(ctx)?.is_truthy())),
            Expr::And(lhs, rhs) => {
                let left = lhs.eval(ctx)?;
                if left.is_truthy() {
                    rhs.eval(ctx)
                } else {
                    Ok(left)
                }
            }
            Expr::Or(lhs, rhs) => {
                let left = lhs.eval(ctx)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    rhs.eval(ctx)
                }
            }
            Expr::Compare(first, rest) => {
                let mut left = first.eval(ctx)?;
                for (op, operand) in rest {
                    let right = operand.eval(ctx)?;
                    if !compare(&left, *op, &right)? {
                        return Ok(SelectorValue::Bool(false));
                    }
                    left = right;
                }
                Ok(SelectorValue::Bool(true))
            }
        }
    }

    /// Evaluates the expression and reduces it to its truth value
    pub fn is_true(&self, ctx: &SelectorContext) -> Result<bool, ExprError> {
        Ok(self.eval(ctx)?.is_truthy())
    }
}

fn compare(left: &SelectorValue, op: CmpOp, right: &SelectorValue) -> Result<bool, ExprError> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return Ok(op.holds(a.cmp(&b)));
    }
    if let (SelectorValue::Str(a), SelectorValue::Str(b)) = (left, right) {
        return Ok(op.holds(a.cmp(b)));
    }

    // A string never equals a number.
    match op {
        CmpOp::Eq => Ok(false),
        CmpOp::Ne => Ok(true),
        _ => Err(ExprError::TypeMismatch(format!(
            "'{}' not supported between {} and {}",
            op.symbol(),
            left,
            right
        ))),
    }
}

/// Parses and evaluates `input` against `ctx` in one step
pub fn evaluate(input: &str, ctx: &SelectorContext) -> Result<bool, ExprError> {
    Expr::parse(input)?.is_true(ctx)
}
