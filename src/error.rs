use std::fmt;

use thiserror::Error;

use crate::ir::Type;
use crate::lexer::{Position, TokenKind};

/// Where an operand pairing could not be reconciled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MismatchSite {
    Assignment,
    Multiply,
    Call,
}

impl fmt::Display for MismatchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchSite::Assignment => write!(f, "Unimplemented assignment"),
            MismatchSite::Multiply => write!(f, "Unimplemented binary expression"),
            MismatchSite::Call => write!(f, "Types do not match for function call"),
        }
    }
}

/// Every way a compilation can fail. The first error aborts the pipeline.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("{pos}: Unknown token {found:?}")]
    Lex { found: char, pos: Position },

    #[error("{pos}: {message} (found {found})")]
    Parse {
        message: String,
        found: TokenKind,
        pos: Position,
    },

    #[error("Unknown type `{type_name}` for argument `{argument}`")]
    UnknownType { type_name: String, argument: String },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("`{0}` is a function and cannot be used as a value")]
    NotAValue(String),

    #[error("`{0}` is a built-in function and cannot be redefined")]
    Redefinition(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Function `{callee}` takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("{site}: cannot reconcile {lhs} with {rhs}")]
    TypeMismatch {
        site: MismatchSite,
        lhs: Type,
        rhs: Type,
    },

    #[error("Function verification failed: {0}")]
    Verification(String),

    #[error("Internal codegen error: {0}")]
    Internal(String),
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
