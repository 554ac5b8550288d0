use tracing::{info_span, trace};

use crate::error::{CompileError, Result};
use crate::ir::{self, BlockId, FuncId, Inst, InstId, InstKind, Module, Param, Type, Value, LANES};

use super::builtins::{BUILTIN_GLOBALS, INTRINSICS};
use super::{Symbol, SymbolTable};

/// Everything one compilation emits into: the module, the names visible to
/// the shader, and the current insertion point.
#[derive(Debug)]
pub struct Codegen {
    module: Module,
    symbols: SymbolTable,
    insertion: Option<(FuncId, BlockId)>,
}

impl Codegen {
    pub fn new(module_name: &str) -> Self {
        let mut codegen = Self {
            module: Module::new(module_name),
            symbols: SymbolTable::new(),
            insertion: None,
        };
        codegen.install_builtins();
        codegen
    }

    fn install_builtins(&mut self) {
        for (name, ty) in BUILTIN_GLOBALS {
            let id = self.module.add_global(name, *ty);
            self.symbols.bind(name, Symbol::Value(Value::Global(id)));
        }
        for intrinsic in INTRINSICS {
            let params = intrinsic
                .params
                .iter()
                .map(|(name, ty)| Param {
                    name: name.to_string(),
                    ty: *ty,
                    default: None,
                })
                .collect();
            let id = self
                .module
                .get_or_insert_function(intrinsic.name, params, intrinsic.ret);
            self.symbols.bind(intrinsic.name, Symbol::Function(id));
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.symbols.lookup(name)
    }

    pub fn bind(&mut self, name: &str, symbol: Symbol) {
        trace!(name, ?symbol, "bind");
        self.symbols.bind(name, symbol);
    }

    pub fn create_function(&mut self, name: &str, params: Vec<Param>, ret: Type) -> FuncId {
        self.module.get_or_insert_function(name, params, ret)
    }

    pub fn append_block(&mut self, func: FuncId, label: &str) -> Result<BlockId> {
        let function = self
            .module
            .function_mut(func)
            .ok_or_else(|| CompileError::Internal(format!("no function #{}", func.0)))?;
        Ok(function.body.get_or_insert_with(Default::default).append_block(label))
    }

    pub fn position_at_end(&mut self, func: FuncId, block: BlockId) {
        self.insertion = Some((func, block));
    }

    fn current_function(&self) -> Result<&ir::Function> {
        self.insertion
            .and_then(|(func, _)| self.module.function(func))
            .ok_or_else(|| CompileError::Internal("no insertion point".to_string()))
    }

    pub fn type_of(&self, value: Value) -> Result<Type> {
        let func = self.current_function()?;
        self.module
            .value_type(func, value)
            .ok_or_else(|| CompileError::Internal(format!("untyped value {:?}", value)))
    }

    fn push(&mut self, kind: InstKind, ty: Type) -> Result<Value> {
        let (func, block) = self
            .insertion
            .ok_or_else(|| CompileError::Internal("no insertion point".to_string()))?;
        let body = self
            .module
            .function_mut(func)
            .and_then(|f| f.body.as_mut())
            .ok_or_else(|| CompileError::Internal(format!("function #{} has no body", func.0)))?;
        let id = InstId(body.insts.len() as u32);
        body.insts.push(Inst { kind, ty });
        body.blocks
            .get_mut(block.0 as usize)
            .ok_or_else(|| CompileError::Internal(format!("no block #{}", block.0)))?
            .insts
            .push(id);
        Ok(Value::Inst(id))
    }

    pub fn emit_alloca(&mut self, ty: Type) -> Result<Value> {
        let ptr = ty
            .pointer_to()
            .ok_or_else(|| CompileError::Internal(format!("cannot allocate {}", ty)))?;
        self.push(InstKind::Alloca(ty), ptr)
    }

    pub fn emit_load(&mut self, ptr: Value) -> Result<Value> {
        let ptr_ty = self.type_of(ptr)?;
        let ty = ptr_ty
            .pointee()
            .ok_or_else(|| CompileError::Internal(format!("load through {}", ptr_ty)))?;
        self.push(InstKind::Load(ptr), ty)
    }

    pub fn emit_store(&mut self, value: Value, ptr: Value) -> Result<Value> {
        self.push(InstKind::Store { value, ptr }, Type::Void)
    }

    pub fn emit_fmul(&mut self, lhs: Value, rhs: Value) -> Result<Value> {
        let ty = self.type_of(lhs)?;
        self.push(InstKind::FMul(lhs, rhs), ty)
    }

    pub fn emit_call(&mut self, callee: FuncId, args: Vec<Value>) -> Result<Value> {
        let ret = self
            .module
            .function(callee)
            .map(|f| f.ret)
            .ok_or_else(|| CompileError::Internal(format!("no function #{}", callee.0)))?;
        self.push(InstKind::Call { callee, args }, ret)
    }

    /// Replicates a scalar across every lane: insert into lane 0, then
    /// shuffle with an all-zero mask.
    pub fn emit_broadcast(&mut self, scalar: Value) -> Result<Value> {
        let inserted = self.push(
            InstKind::InsertElement {
                vector: Value::Undef(Type::Vector),
                scalar,
                lane: 0,
            },
            Type::Vector,
        )?;
        self.push(
            InstKind::ShuffleVector {
                vector: inserted,
                mask: [0; LANES],
            },
            Type::Vector,
        )
    }

    pub fn emit_ret(&mut self) -> Result<Value> {
        self.push(InstKind::Ret, Type::Void)
    }

    pub fn verify(&self, func: FuncId) -> Result<()> {
        let _span = info_span!("verify", function = func.0).entered();
        ir::verify(&self.module, func).map_err(CompileError::Verification)
    }
}
