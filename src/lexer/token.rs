use std::fmt;

use phf::phf_map;

pub(super) static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "surface" => TokenKind::Surface,
    "normal" => TokenKind::Normal,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '(' => TokenKind::ParenOpen,
    ')' => TokenKind::ParenClose,
    '{' => TokenKind::BraceOpen,
    '}' => TokenKind::BraceClose,
    '=' => TokenKind::Equals,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
    ';' => TokenKind::Semicolon,
    ',' => TokenKind::Comma,
};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Eof,
    Surface,
    Normal,

    Identifier(String),
    Number(f64),

    ParenOpen,
    ParenClose,
    BraceOpen,
    BraceClose,
    Equals,
    Star,
    Slash,
    Semicolon,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Surface => write!(f, "`surface`"),
            TokenKind::Normal => write!(f, "`normal`"),
            TokenKind::Identifier(name) => write!(f, "identifier `{}`", name),
            TokenKind::Number(value) => write!(f, "number {}", value),
            TokenKind::ParenOpen => write!(f, "`(`"),
            TokenKind::ParenClose => write!(f, "`)`"),
            TokenKind::BraceOpen => write!(f, "`{{`"),
            TokenKind::BraceClose => write!(f, "`}}`"),
            TokenKind::Equals => write!(f, "`=`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Slash => write!(f, "`/`"),
            TokenKind::Semicolon => write!(f, "`;`"),
            TokenKind::Comma => write!(f, "`,`"),
        }
    }
}

/// 1-based line and column of a character in the shader source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}
