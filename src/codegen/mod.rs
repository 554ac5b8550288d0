mod builtins;
mod codegen;
mod lower;
mod symbol_table;

pub use builtins::*;
pub use codegen::*;
pub use symbol_table::*;
