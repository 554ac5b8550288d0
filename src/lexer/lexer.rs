use crate::error::{CompileError, Result};

use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS},
    Position, Token, TokenKind,
};

/// Turns shader source into tokens, one at a time.
#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    /// Lexes the whole input. The returned vector always ends with `Eof`.
    pub fn tokenize(source: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek().filter(|&c| pred(c)) {
            s.push(c);
            self.bump();
        }
        s
    }

    fn lex_number(&mut self, first: char, pos: Position) -> Result<Token> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        let value = digits
            .parse()
            .map_err(|_| CompileError::Lex { found: first, pos })?;
        Ok(Token {
            kind: TokenKind::Number(value),
            pos,
        })
    }

    fn lex_identifier(&mut self, pos: Position) -> Token {
        let s = self.take_while(|c| c.is_ascii_alphanumeric());
        let kind = match KEYWORDS.get(s.as_str()) {
            Some(kind) => kind.clone(),
            None => TokenKind::Identifier(s),
        };
        Token { kind, pos }
    }

    fn skip_trivia(&mut self) {
        loop {
            self.take_while(char::is_whitespace);
            if self.peek() == Some('/') && self.peek_second() == Some('/') {
                self.take_while(|c| c != '\n');
            } else {
                return;
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();

        let pos = self.position();
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };

        if c.is_ascii_alphabetic() {
            Ok(self.lex_identifier(pos))
        } else if c.is_ascii_digit() {
            self.lex_number(c, pos)
        } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
            self.bump();
            Ok(Token {
                kind: kind.clone(),
                pos,
            })
        } else {
            Err(CompileError::Lex { found: c, pos })
        }
    }
}
