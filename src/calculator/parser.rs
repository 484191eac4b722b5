//! Recursive-descent parser for calculator arithmetic.
//!
//! PIPELINE: expression text --> tokens --> `Expr` tree --> `f64`
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | '(' expr ')'
//! number  := digits ['.' digits] | '.' digits | digits '.'
//! ```
//!
//! Spaces between tokens are ignored. Evaluation follows IEEE-754 double
//! semantics, so division by a computed zero yields an infinity or NaN
//! rather than an error.

use std::iter::Peekable;
use std::slice::Iter;

use crate::error::CalcError;

/// Parentheses and unary signs nested deeper than this are rejected.
const MAX_DEPTH: usize = 256;

/// Expressions with more tokens than this are rejected.
const MAX_TOKENS: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

/// Parsed arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate the tree.
    pub fn eval(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Negate(inner) => -inner.eval(),
            Self::Binary { op, lhs, rhs } => op.apply(lhs.eval(), rhs.eval()),
        }
    }
}

/// Parse and evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    parse(input).map(|expr| expr.eval())
}

/// Parse an arithmetic expression into an [`Expr`] tree.
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(input)?;
    if tokens.len() > MAX_TOKENS {
        return Err(CalcError::InvalidExpression);
    }

    let mut parser = Parser {
        tokens: tokens.iter().peekable(),
        depth: 0,
    };

    let expr = parser.expr()?;
    if parser.tokens.next().is_some() {
        return Err(CalcError::InvalidExpression);
    }
    Ok(expr)
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            ' ' => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                let mut dots = 0;
                while let Some(&(idx, c)) = chars.peek() {
                    if c == '.' {
                        dots += 1;
                    } else if !c.is_ascii_digit() {
                        break;
                    }
                    end = idx + c.len_utf8();
                    chars.next();
                }

                let literal = &input[start..end];
                if dots > 1 || !literal.bytes().any(|b| b.is_ascii_digit()) {
                    return Err(CalcError::InvalidExpression);
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidExpression)?;
                tokens.push(Token::Number(value));
                continue;
            }
            _ => return Err(CalcError::InvalidExpression),
        };

        tokens.push(token);
        chars.next();
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Peekable<Iter<'a, Token>>,
    depth: usize,
}

impl Parser<'_> {
    fn expr(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.term()?;

        loop {
            let op = match self.tokens.peek() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Subtract,
                _ => return Ok(lhs),
            };
            self.tokens.next();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.unary()?;

        loop {
            let op = match self.tokens.peek() {
                Some(Token::Star) => BinaryOperator::Multiply,
                Some(Token::Slash) => BinaryOperator::Divide,
                _ => return Ok(lhs),
            };
            self.tokens.next();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        match self.tokens.peek() {
            Some(Token::Minus) => {
                self.tokens.next();
                let inner = self.nested(Self::unary)?;
                Ok(Expr::Negate(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.tokens.next();
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.tokens.next() {
            Some(Token::Number(value)) => Ok(Expr::Number(*value)),
            Some(Token::LParen) => {
                let inner = self.nested(Self::expr)?;
                match self.tokens.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(CalcError::InvalidExpression),
                }
            }
            _ => Err(CalcError::InvalidExpression),
        }
    }

    /// Run a sub-parser one nesting level deeper.
    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<Expr, CalcError>,
    ) -> Result<Expr, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::InvalidExpression);
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }
}
