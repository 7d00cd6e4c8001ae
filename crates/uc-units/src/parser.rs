//! Recursive-descent parser for unit expressions.
//!
//! ```text
//! expr     := term (('*' | '/' | '%' | '.') term)*
//! term     := factor ('^' exponent)?
//! exponent := sign? integer | '(' sign? integer ('/' sign? integer)? ')'
//! factor   := '(' expr ')' | number | label
//! ```

use uc_core::{DimVec, UcError, UcResult};

use crate::lexer::{tokenize, Token, TokenKind};

/// Maps a label to its dimension vector.
pub trait Resolve {
    fn resolve(&self, label: &str) -> UcResult<DimVec>;
}

/// Parse `expr` into a dimension vector, resolving labels through `resolver`.
pub fn parse_expr<R: Resolve + ?Sized>(expr: &str, resolver: &R) -> UcResult<DimVec> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        expr,
        tokens,
        pos: 0,
        resolver,
    };
    if parser.tokens.is_empty() {
        return Err(parser.error_at(0, "empty expression"));
    }
    let dv = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(parser.error_at(tok.pos, "unexpected token"));
    }
    Ok(dv)
}

struct Parser<'a, R: ?Sized> {
    expr: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    resolver: &'a R,
}

impl<R: Resolve + ?Sized> Parser<'_, R> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn here(&self) -> usize {
        self.peek().map_or(self.expr.len(), |t| t.pos)
    }

    fn error_at(&self, pos: usize, what: impl Into<String>) -> UcError {
        UcError::Parse {
            expr: self.expr.to_string(),
            pos,
            what: what.into(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> UcResult<()> {
        match self.peek_kind() {
            Some(k) if *k == kind => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error_at(self.here(), format!("expected {what}"))),
        }
    }

    fn expr(&mut self) -> UcResult<DimVec> {
        let mut acc = self.term()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Star | TokenKind::Percent | TokenKind::Dot) => {
                    self.pos += 1;
                    acc = acc.multiply(&self.term()?)?;
                }
                Some(TokenKind::Slash) => {
                    self.pos += 1;
                    acc = acc.divide(&self.term()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> UcResult<DimVec> {
        let base = self.factor()?;
        if self.peek_kind() != Some(&TokenKind::Caret) {
            return Ok(base);
        }
        self.pos += 1;
        let (p, q) = self.exponent()?;
        base.pow_rational(p, q)
    }

    fn exponent(&mut self) -> UcResult<(i32, i32)> {
        if self.peek_kind() == Some(&TokenKind::LParen) {
            self.pos += 1;
            let num = self.signed_integer()?;
            let den = if self.peek_kind() == Some(&TokenKind::Slash) {
                self.pos += 1;
                self.signed_integer()?
            } else {
                1
            };
            self.expect(TokenKind::RParen, "')' after exponent")?;
            if den == 0 {
                return Err(UcError::InvalidArg {
                    what: "zero denominator in rational exponent",
                });
            }
            Ok((num, den))
        } else {
            Ok((self.signed_integer()?, 1))
        }
    }

    fn signed_integer(&mut self) -> UcResult<i32> {
        let negative = match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                true
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        let at = self.here();
        match self.bump().map(|t| t.kind) {
            Some(TokenKind::Number(v))
                if v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX) =>
            {
                let n = v as i32;
                Ok(if negative { -n } else { n })
            }
            Some(TokenKind::Number(_)) => Err(self.error_at(at, "exponent must be an integer")),
            _ => Err(self.error_at(at, "expected integer exponent")),
        }
    }

    fn factor(&mut self) -> UcResult<DimVec> {
        let at = self.here();
        match self.bump().map(|t| t.kind) {
            Some(TokenKind::LParen) => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            Some(TokenKind::Number(v)) => Ok(DimVec::dimensionless(v)),
            Some(TokenKind::Label(label)) => self.resolver.resolve(&label),
            Some(_) => Err(self.error_at(at, "expected unit, number or '('")),
            None => Err(self.error_at(at, "unexpected end of expression")),
        }
    }
}
