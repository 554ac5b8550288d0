//! Runs emitted shader functions against global storage.

mod color;
mod environment;
mod interpreter;
mod intrinsics;

pub use color::{ArgValue, Color};
pub use environment::ExecutionEnvironment;
pub(crate) use interpreter::{RtValue, Slot};

use thiserror::Error;

use crate::ir::Type;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExecError {
    #[error("No function named `{0}` is defined")]
    UnknownFunction(String),

    #[error("No native implementation for intrinsic `{0}`")]
    UnboundIntrinsic(String),

    #[error("No global named `{0}`")]
    UnknownGlobal(String),

    #[error("Global `{name}` does not hold a {expected}")]
    GlobalType { name: String, expected: Type },

    #[error("Missing value for argument `{name}` of `{function}`")]
    MissingArgument { function: String, name: String },

    #[error("`{function}` has no argument `{name}`")]
    UnknownArgument { function: String, name: String },

    #[error("`{function}` takes {expected} argument(s) but {found} were supplied")]
    TooManyArguments {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("Argument `{name}` expects {expected}")]
    ArgumentType { name: String, expected: Type },

    #[error("Execution fault: {0}")]
    Fault(String),
}
