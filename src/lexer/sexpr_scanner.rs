use super::token::{Position, Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for S-expression source text
///
/// Tokens are produced on demand by [`SExprScanner::next_token`], which is
/// what the parser uses for its single token of lookahead.
pub struct SExprScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl SExprScanner {
    /// Creates a new S-expression scanner from source code
    pub fn new(source: &str) -> Self {
        SExprScanner {
            source: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens from source code, ending with an `Eof` token
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Produces the next token. End of input yields `Eof` every time it is asked.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let position = self.position();
        if self.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, "", position));
        }

        match self.peek() {
            '(' => Ok(self.single(TokenKind::LeftParen, position)),
            ')' => Ok(self.single(TokenKind::RightParen, position)),
            '\'' => Ok(self.single(TokenKind::Quote, position)),
            '"' => self.scan_string(position),
            c if c.is_ascii_digit() || (c == '-' && self.peek_next().is_ascii_digit()) => {
                Ok(self.scan_number(position))
            }
            c if Self::is_symbol_start(c) => Ok(self.scan_symbol(position)),
            c => Err(Error::UnexpectedCharacter { ch: c, position }),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') {
            self.advance();
        }
    }

    fn single(&mut self, kind: TokenKind, position: Position) -> Token {
        let c = self.advance();
        Token::new(kind, c.to_string(), position)
    }

    // No escape sequences: a backslash is kept as-is and cannot hide a quote.
    fn scan_string(&mut self, position: Position) -> Result<Token> {
        self.advance(); // Opening "
        let start = self.current;

        while !self.is_at_end() && self.peek() != '"' {
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::UnterminatedString { position });
        }

        let value = self.text(start);
        self.advance(); // Closing "

        Ok(Token::new(TokenKind::String, value, position))
    }

    fn scan_number(&mut self, position: Position) -> Token {
        let start = self.current;

        if self.peek() == '-' {
            self.advance();
        }
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        Token::new(TokenKind::Number, self.text(start), position)
    }

    fn scan_symbol(&mut self, position: Position) -> Token {
        let start = self.current;

        self.advance();
        while Self::is_symbol_char(self.peek()) {
            self.advance();
        }

        Token::new(TokenKind::Symbol, self.text(start), position)
    }

    fn is_symbol_start(c: char) -> bool {
        c.is_ascii_alphabetic() || matches!(c, '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!')
    }

    fn is_symbol_char(c: char) -> bool {
        Self::is_symbol_start(c) || c.is_ascii_digit() || c == '_'
    }

    fn text(&self, start: usize) -> String {
        self.source[start..self.current].iter().collect()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }
}
