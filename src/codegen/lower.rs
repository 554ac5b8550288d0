use tracing::{debug, info_span};

use crate::error::{CompileError, MismatchSite, Result};
use crate::ir::{FuncId, Param, Type, Value};
use crate::parser::{Declaration, Expr, ShaderDefinition, ShaderPrototype, Stmt};
use crate::ty::ValueType;

use super::{Codegen, Symbol};

impl Codegen {
    /// Emits the shader as a function, returning it once it verifies.
    pub fn gen_shader(&mut self, shader: &ShaderDefinition) -> Result<FuncId> {
        let _span = info_span!("lower", shader = %shader.prototype.name).entered();

        let func = self.gen_prototype(&shader.prototype)?;
        let entry = self.append_block(func, "entry")?;
        self.position_at_end(func, entry);

        for stmt in &shader.body {
            self.gen_stmt(stmt)?;
        }
        self.emit_ret()?;

        self.verify(func)?;
        Ok(func)
    }

    /// Floats are passed by value, colors by reference.
    pub fn gen_prototype(&mut self, prototype: &ShaderPrototype) -> Result<FuncId> {
        if let Some(Symbol::Function(existing)) = self.lookup(&prototype.name) {
            if self.module().function(existing).is_some_and(|f| f.body.is_none()) {
                return Err(CompileError::Redefinition(prototype.name.clone()));
            }
        }

        let mut params = vec![];
        for argument in &prototype.arguments {
            let ty = match argument.ty {
                ValueType::Float => Type::Float,
                ValueType::Color => Type::VectorPtr,
                ValueType::Error => {
                    return Err(CompileError::Internal(format!(
                        "argument `{}` has no known type",
                        argument.name
                    )))
                }
            };
            params.push(Param {
                name: argument.name.clone(),
                ty,
                default: argument.default.map(|v| v as f32),
            });
        }

        let func = self.create_function(&prototype.name, params, Type::Void);
        for (i, argument) in prototype.arguments.iter().enumerate() {
            self.bind(&argument.name, Symbol::Value(Value::Param(i as u32)));
        }
        Ok(func)
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> Result<Option<Value>> {
        match stmt {
            Stmt::Declaration(d) => {
                self.gen_declaration(d)?;
                Ok(None)
            }
            Stmt::Expr(expr) => self.gen_expr(expr),
        }
    }

    /// `normal n;` gets fresh vector storage.
    pub fn gen_declaration(&mut self, declaration: &Declaration) -> Result<()> {
        let ptr = self.emit_alloca(Type::Vector)?;
        debug!(name = %declaration.name, "declared normal");
        self.bind(&declaration.name, Symbol::Value(ptr));
        Ok(())
    }

    pub fn gen_expr(&mut self, expr: &Expr) -> Result<Option<Value>> {
        match expr {
            Expr::Number(value) => Ok(Some(Value::Float(*value as f32))),
            Expr::Variable(name) => self.gen_variable(name).map(Some),
            Expr::Call { callee, argument } => self.gen_call(callee, argument.as_deref()).map(Some),
            Expr::Multiply(lhs, rhs) => self.gen_mul(lhs, rhs).map(Some),
            Expr::Assignment(lhs, rhs) => self.gen_assign(lhs, rhs),
        }
    }

    fn gen_variable(&mut self, name: &str) -> Result<Value> {
        match self.lookup(name) {
            Some(Symbol::Value(value)) => Ok(value),
            Some(Symbol::Function(_)) => Err(CompileError::NotAValue(name.to_string())),
            None => Err(CompileError::UnknownVariable(name.to_string())),
        }
    }

    fn type_of_opt(&self, value: Option<Value>) -> Result<Type> {
        match value {
            Some(v) => self.type_of(v),
            None => Ok(Type::Void),
        }
    }

    fn gen_assign(&mut self, lhs: &Expr, rhs: &Expr) -> Result<Option<Value>> {
        let dst = self.gen_expr(lhs)?;
        let src = self.gen_expr(rhs)?;
        let dst_ty = self.type_of_opt(dst)?;
        let src_ty = self.type_of_opt(src)?;

        let (Some(dst), Some(src)) = (dst, src) else {
            return Err(CompileError::TypeMismatch {
                site: MismatchSite::Assignment,
                lhs: dst_ty,
                rhs: src_ty,
            });
        };

        match (dst_ty, src_ty) {
            (Type::VectorPtr, Type::VectorPtr) => {
                debug!("assign: copy vector storage");
                let loaded = self.emit_load(src)?;
                self.emit_store(loaded, dst).map(Some)
            }
            (Type::Float, Type::Float) => {
                debug!("assign: propagate scalar");
                if let Expr::Variable(name) = lhs {
                    self.bind(name, Symbol::Value(src));
                }
                Ok(Some(src))
            }
            (Type::FloatPtr, Type::Float) | (Type::VectorPtr, Type::Vector) => {
                debug!(ty = %src_ty, "assign: store");
                self.emit_store(src, dst).map(Some)
            }
            (Type::VectorPtr, Type::Float) => {
                debug!("assign: broadcast scalar into vector storage");
                let vector = self.emit_broadcast(src)?;
                self.emit_store(vector, dst).map(Some)
            }
            (lhs, rhs) => Err(CompileError::TypeMismatch {
                site: MismatchSite::Assignment,
                lhs,
                rhs,
            }),
        }
    }

    /// Loads through pointers so that both operands are values.
    fn gen_operand(&mut self, value: Value) -> Result<Value> {
        if self.type_of(value)?.is_pointer() {
            self.emit_load(value)
        } else {
            Ok(value)
        }
    }

    fn gen_mul(&mut self, lhs: &Expr, rhs: &Expr) -> Result<Value> {
        let lhs = self.gen_expr(lhs)?;
        let rhs = self.gen_expr(rhs)?;
        let lhs_ty = self.type_of_opt(lhs)?;
        let rhs_ty = self.type_of_opt(rhs)?;
        let mismatch = CompileError::TypeMismatch {
            site: MismatchSite::Multiply,
            lhs: lhs_ty,
            rhs: rhs_ty,
        };

        let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
            return Err(mismatch);
        };

        let lhs = self.gen_operand(lhs)?;
        let rhs = self.gen_operand(rhs)?;
        match (self.type_of(lhs)?, self.type_of(rhs)?) {
            (Type::Float, Type::Float) | (Type::Vector, Type::Vector) => self.emit_fmul(lhs, rhs),
            (Type::Float, Type::Vector) => {
                debug!("mul: broadcast left operand");
                let lhs = self.emit_broadcast(lhs)?;
                self.emit_fmul(lhs, rhs)
            }
            (Type::Vector, Type::Float) => {
                debug!("mul: broadcast right operand");
                let rhs = self.emit_broadcast(rhs)?;
                self.emit_fmul(lhs, rhs)
            }
            _ => Err(mismatch),
        }
    }

    fn gen_call(&mut self, callee: &str, argument: Option<&str>) -> Result<Value> {
        let Some(Symbol::Function(func)) = self.lookup(callee) else {
            return Err(CompileError::UnknownFunction(callee.to_string()));
        };
        let param_types: Vec<Type> = self
            .module()
            .function(func)
            .map(|f| f.params.iter().map(|p| p.ty).collect())
            .unwrap_or_default();

        let args = match argument {
            Some(name) => vec![self.gen_variable(name)?],
            None => vec![],
        };
        if args.len() != param_types.len() {
            return Err(CompileError::ArityMismatch {
                callee: callee.to_string(),
                expected: param_types.len(),
                found: args.len(),
            });
        }
        for (param_ty, arg) in param_types.iter().zip(&args) {
            let arg_ty = self.type_of(*arg)?;
            if arg_ty != *param_ty {
                return Err(CompileError::TypeMismatch {
                    site: MismatchSite::Call,
                    lhs: *param_ty,
                    rhs: arg_ty,
                });
            }
        }

        debug!(callee, "call");
        self.emit_call(func, args)
    }
}
