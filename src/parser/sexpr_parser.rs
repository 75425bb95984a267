use crate::error::{Error, Result};
use crate::lexer::{SExprScanner, Token, TokenKind};
use crate::runtime::Expr;

/// S-expression parser with a single token of lookahead
///
/// Tokens are pulled from the scanner one at a time, so a lexical error right
/// after a complete expression surfaces when the parser steps past it.
pub struct SExprParser {
    scanner: SExprScanner,
    current: Token,
}

/// Parses exactly one expression. Tokens after it are left unread.
pub fn parse_one(source: &str) -> Result<Expr> {
    SExprParser::new(source)?.parse_expr()
}

/// Parses every expression in `source` until end of input
pub fn parse_all(source: &str) -> Result<Vec<Expr>> {
    SExprParser::new(source)?.parse_program()
}

impl SExprParser {
    /// Creates a parser positioned on the first token of `source`
    pub fn new(source: &str) -> Result<Self> {
        let mut scanner = SExprScanner::new(source);
        let current = scanner.next_token()?;
        Ok(SExprParser { scanner, current })
    }

    /// Parses expressions until end of input
    pub fn parse_program(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = Vec::new();

        while !self.is_at_end() {
            exprs.push(self.parse_expr()?);
        }

        tracing::trace!(count = exprs.len(), "parsed program");
        Ok(exprs)
    }

    /// Parses one expression starting at the current token
    pub fn parse_expr(&mut self) -> Result<Expr> {
        let position = self.current.position;

        match self.current.kind {
            TokenKind::Number => {
                let literal = std::mem::take(&mut self.current.lexeme);
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidNumberLiteral { literal, position })?;
                self.advance()?;
                Ok(Expr::Number(value))
            }
            TokenKind::String => {
                let value = std::mem::take(&mut self.current.lexeme);
                self.advance()?;
                Ok(Expr::Str(value))
            }
            TokenKind::Symbol => {
                let name = std::mem::take(&mut self.current.lexeme);
                self.advance()?;
                Ok(match name.as_str() {
                    "t" => Expr::Boolean(true),
                    "nil" => Expr::Nil,
                    _ => Expr::Symbol(name),
                })
            }
            TokenKind::LeftParen => self.parse_list(),
            TokenKind::RightParen => Err(Error::UnexpectedCloseParen { position }),
            TokenKind::Quote => self.parse_quoted(),
            TokenKind::Eof => Err(Error::UnexpectedEndOfInput { position }),
        }
    }

    /// Returns true once the lookahead is `Eof`
    pub fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    /// Parse a list after its `(`; `()` reads as `Nil`
    fn parse_list(&mut self) -> Result<Expr> {
        self.advance()?; // consume '('

        let mut items = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::RightParen => {
                    self.advance()?;
                    return Ok(Expr::list(items));
                }
                TokenKind::Eof => {
                    return Err(Error::UnterminatedList {
                        position: self.current.position,
                    })
                }
                _ => items.push(self.parse_expr()?),
            }
        }
    }

    /// Parse 'x into (quote x)
    fn parse_quoted(&mut self) -> Result<Expr> {
        self.advance()?; // consume '
        let quoted = self.parse_expr()?;
        Ok(Expr::list(vec![Expr::symbol("quote"), quoted]))
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.scanner.next_token()?;
        Ok(())
    }
}
