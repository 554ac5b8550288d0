use std::fmt::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Variable(String),
    Assignment(Box<Expr>, Box<Expr>),
    Multiply(Box<Expr>, Box<Expr>),
    /// A call of a named function with zero or one identifier argument.
    Call {
        callee: String,
        argument: Option<String>,
    },
    Number(f64),
}

impl Expr {
    pub fn variable(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }

    pub fn assignment(lhs: Expr, rhs: Expr) -> Self {
        Expr::Assignment(Box::new(lhs), Box::new(rhs))
    }

    pub fn multiply(lhs: Expr, rhs: Expr) -> Self {
        Expr::Multiply(Box::new(lhs), Box::new(rhs))
    }

    pub fn describe(&self) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_description(&mut s, 0);
        s
    }

    pub(super) fn write_description(&self, out: &mut String, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Expr::Variable(name) => writeln!(out, "{indent}Variable {name}"),
            Expr::Number(value) => writeln!(out, "{indent}Number {value}"),
            Expr::Call {
                callee,
                argument: Some(argument),
            } => writeln!(out, "{indent}FunctionCall {callee} {argument}"),
            Expr::Call {
                callee,
                argument: None,
            } => writeln!(out, "{indent}FunctionCall {callee}"),
            Expr::Assignment(lhs, rhs) => {
                writeln!(out, "{indent}Assignment")?;
                lhs.write_description(out, depth + 1)?;
                rhs.write_description(out, depth + 1)
            }
            Expr::Multiply(lhs, rhs) => {
                writeln!(out, "{indent}BinaryMultiply")?;
                lhs.write_description(out, depth + 1)?;
                rhs.write_description(out, depth + 1)
            }
        }
    }
}
