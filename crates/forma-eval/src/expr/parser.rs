//! Recursive-descent parser producing the operator tree.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | string | bool | placeholder | '(' expr ')'
//! ```

use super::lexer::{Spanned, Token};
use super::value::Scalar;
use crate::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Scalar,
    },
    Placeholder {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

/// Longest accepted token stream. Bounds the tree size, and with it the
/// recursion depth of evaluation.
pub const MAX_TOKENS: usize = 1024;

/// Deepest accepted nesting of parentheses and unary signs.
pub const MAX_DEPTH: usize = 256;

pub fn parse(tokens: &[Spanned], source_len: usize) -> Result<Expr, EvalError> {
    if let Some((offset, _)) = tokens.get(MAX_TOKENS) {
        return Err(EvalError::syntax(
            *offset,
            format!("expression too long (more than {MAX_TOKENS} tokens)"),
        ));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        source_len,
    };
    let expr = parser.expr()?;
    if let Some((offset, token)) = parser.tokens.get(parser.pos) {
        return Err(EvalError::syntax(
            *offset,
            format!("unexpected {token:?} after expression"),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source_len, |(offset, _)| *offset)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t);
        self.pos += 1;
        token
    }

    fn descend(&mut self, offset: usize) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::syntax(
                offset,
                format!("expression nested deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        let offset = self.offset();
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.primary(),
        };
        self.pos += 1;
        self.descend(offset)?;
        let operand = self.unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let offset = self.offset();
        let expr = match self.advance() {
            Some(Token::Number(n)) => Expr::Literal {
                value: Scalar::Number(*n),
            },
            Some(Token::Text(s)) => Expr::Literal {
                value: Scalar::Text(s.clone()),
            },
            Some(Token::Bool(b)) => Expr::Literal {
                value: Scalar::Bool(*b),
            },
            Some(Token::Placeholder(name)) => Expr::Placeholder { name: name.clone() },
            Some(Token::LParen) => {
                self.descend(offset)?;
                let inner = self.expr()?;
                if self.advance() != Some(&Token::RParen) {
                    return Err(EvalError::syntax(offset, "unclosed '('"));
                }
                self.depth -= 1;
                inner
            }
            Some(token) => {
                return Err(EvalError::syntax(
                    offset,
                    format!("unexpected {token:?}"),
                ));
            }
            None => return Err(EvalError::syntax(offset, "unexpected end of expression")),
        };
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse_str(source: &str) -> Result<Expr, EvalError> {
        parse(&tokenize(source)?, source.len())
    }

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal {
            value: Scalar::Number(n),
        })
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse_str("1 + 2 * 3").unwrap(),
            Expr::BinOp {
                left: num(1.0),
                op: BinOp::Add,
                right: Box::new(Expr::BinOp {
                    left: num(2.0),
                    op: BinOp::Mul,
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            parse_str("8 - 4 - 2").unwrap(),
            Expr::BinOp {
                left: Box::new(Expr::BinOp {
                    left: num(8.0),
                    op: BinOp::Sub,
                    right: num(4.0),
                }),
                op: BinOp::Sub,
                right: num(2.0),
            }
        );
    }

    #[test]
    fn unary_minus_nests() {
        assert_eq!(
            parse_str("--1").unwrap(),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: num(1.0),
                }),
            }
        );
    }

    #[test]
    fn malformed_expressions_report_offsets() {
        assert_eq!(
            parse_str("(1 + 2").unwrap_err(),
            EvalError::syntax(0, "unclosed '('")
        );
        assert!(matches!(
            parse_str("1 +").unwrap_err(),
            EvalError::Syntax { offset: 3, .. }
        ));
        assert!(parse_str("1 2").is_err());
        assert!(parse_str("").is_err());
        assert!(parse_str("* 3").is_err());
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_str(&ok).is_ok());

        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse_str(&deep).unwrap_err(),
            EvalError::syntax(MAX_DEPTH, format!("expression nested deeper than {MAX_DEPTH} levels"))
        );

        let signs = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_str(&signs).unwrap_err(), EvalError::Syntax { .. }));
    }

    #[test]
    fn token_count_is_bounded() {
        let chain = vec!["1"; MAX_TOKENS / 2 + 1].join("+");
        let error = parse_str(&chain).unwrap_err();
        assert!(matches!(error, EvalError::Syntax { ref message, .. } if message.contains("too long")));

        let wall = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(matches!(parse_str(&wall).unwrap_err(), EvalError::Syntax { .. }));
    }
}
