use std::fmt::{self, Write};

use crate::ty::ValueType;

use super::Expr;

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub ty: ValueType,
    pub name: String,
    pub default: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderPrototype {
    pub name: String,
    /// In declaration order; this is the parameter order of the emitted function.
    pub arguments: Vec<Argument>,
}

/// `normal <name>;`
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShaderDefinition {
    pub prototype: ShaderPrototype,
    pub body: Vec<Stmt>,
}

impl ShaderDefinition {
    pub fn describe(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_description(&mut out);
        out
    }

    fn write_description(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "SurfaceShader")?;
        writeln!(out, "  ShaderPrototype {}", self.prototype.name)?;
        for Argument { ty, name, default } in &self.prototype.arguments {
            match default {
                Some(value) => writeln!(out, "    Argument {ty} {name} {value}")?,
                None => writeln!(out, "    Argument {ty} {name}")?,
            }
        }
        for stmt in &self.body {
            match stmt {
                Stmt::Declaration(Declaration { name }) => {
                    writeln!(out, "  Declaration normal {name}")?
                }
                Stmt::Expr(expr) => expr.write_description(out, 1)?,
            }
        }
        Ok(())
    }
}
