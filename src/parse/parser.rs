use crate::{CompareOp, Expr, Literal};

use super::error::{SyntaxError, SyntaxErrorKind};
use super::lexer::{Token, TokenKind};

// -- Binding powers (precedence: OR < AND < NOT < IN < comparison) ----------

const NOT_BP: u8 = 5;

#[derive(Debug, Clone, Copy)]
enum Infix {
    Or,
    And,
    In,
    Compare(CompareOp),
}

impl Infix {
    fn from_kind(kind: &TokenKind<'_>) -> Option<Self> {
        Some(match kind {
            TokenKind::Or => Infix::Or,
            TokenKind::And => Infix::And,
            TokenKind::In => Infix::In,
            TokenKind::Eq => Infix::Compare(CompareOp::Eq),
            TokenKind::Ne => Infix::Compare(CompareOp::Neq),
            TokenKind::Gt => Infix::Compare(CompareOp::Gt),
            TokenKind::Ge => Infix::Compare(CompareOp::Gte),
            TokenKind::Lt => Infix::Compare(CompareOp::Lt),
            TokenKind::Le => Infix::Compare(CompareOp::Lte),
            _ => return None,
        })
    }

    /// (left, right) binding power; left < right makes every operator left-associative.
    fn binding_power(self) -> (u8, u8) {
        match self {
            Infix::Or => (1, 2),
            Infix::And => (3, 4),
            Infix::In => (7, 8),
            Infix::Compare(_) => (9, 10),
        }
    }
}

struct Parser<'t, 'a> {
    source: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
}

/// Build one expression tree from a full token stream.
///
/// Nesting depth is bounded only by the call stack; pathologically deep
/// input can exhaust it.
pub(crate) fn parse_tokens(source: &str, tokens: &[Token<'_>]) -> Result<Expr, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::new(SyntaxErrorKind::Empty, source, None));
    }

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let expr = parser.expr(0)?;

    if let Some(extra) = parser.peek() {
        return Err(parser.unexpected(extra));
    }
    Ok(expr)
}

impl<'a> Parser<'_, 'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<Token<'a>, SyntaxError> {
        let tok = self.peek().ok_or_else(|| self.end())?;
        self.pos += 1;
        Ok(tok)
    }

    fn eat(&mut self, kind: TokenKind<'_>) -> bool {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: TokenKind<'_>) -> Result<(), SyntaxError> {
        let tok = self.next()?;
        if tok.kind == kind {
            Ok(())
        } else {
            Err(self.unexpected(tok))
        }
    }

    fn unexpected(&self, tok: Token<'_>) -> SyntaxError {
        SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken(tok.text.to_owned()),
            self.source,
            Some(tok.offset),
        )
    }

    fn end(&self) -> SyntaxError {
        SyntaxError::new(SyntaxErrorKind::UnexpectedEnd, self.source, None)
    }

    // -- Expressions --------------------------------------------------------

    fn expr(&mut self, min_bp: u8) -> Result<Expr, SyntaxError> {
        let mut lhs = self.prefix()?;

        while let Some(op) = self.peek().and_then(|tok| Infix::from_kind(&tok.kind)) {
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }
            self.pos += 1;

            lhs = match op {
                Infix::Or => Expr::Or(Box::new(lhs), Box::new(self.expr(r_bp)?)),
                Infix::And => Expr::And(Box::new(lhs), Box::new(self.expr(r_bp)?)),
                Infix::In => Expr::In(Box::new(lhs), Box::new(self.list()?)),
                Infix::Compare(op) => Expr::Compare {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(self.expr(r_bp)?),
                },
            };
        }

        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<Expr, SyntaxError> {
        let tok = self.next()?;
        Ok(match tok.kind {
            TokenKind::Not => Expr::Not(Box::new(self.expr(NOT_BP)?)),
            TokenKind::LParen => {
                let inner = self.expr(0)?;
                self.expect(TokenKind::RParen)?;
                inner
            }
            TokenKind::Obj => {
                self.expect(TokenKind::Dot)?;
                Expr::ObjAttr(self.path()?)
            }
            TokenKind::User => {
                if self.eat(TokenKind::Dot) {
                    Expr::UserAttr(self.path()?)
                } else {
                    Expr::UserRef
                }
            }
            TokenKind::Str(s) => Expr::Literal(Literal::Str(s.to_owned())),
            TokenKind::Int(v) => Expr::Literal(Literal::Int(v)),
            TokenKind::Float(v) => Expr::Literal(Literal::Float(v)),
            TokenKind::True => Expr::Literal(Literal::Bool(true)),
            TokenKind::False => Expr::Literal(Literal::Bool(false)),
            TokenKind::Null => Expr::Literal(Literal::Null),
            TokenKind::Name(name) => Expr::RuleRef(name.to_owned()),
            _ => return Err(self.unexpected(tok)),
        })
    }

    fn path(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut segments = vec![self.name()?];
        while self.eat(TokenKind::Dot) {
            segments.push(self.name()?);
        }
        Ok(segments)
    }

    fn name(&mut self) -> Result<String, SyntaxError> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Name(name) => Ok(name.to_owned()),
            _ => Err(self.unexpected(tok)),
        }
    }

    fn list(&mut self) -> Result<Expr, SyntaxError> {
        self.expect(TokenKind::LBracket)?;
        let mut items = Vec::new();
        if self.eat(TokenKind::RBracket) {
            return Ok(Expr::List(items));
        }
        loop {
            items.push(self.expr(0)?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::List(items))
    }
}
