use std::collections::HashSet;

use super::{FuncId, Function, InstId, InstKind, Module, Type, Value, LANES};

/// Checks the structural well-formedness of a defined function.
pub fn verify(module: &Module, id: FuncId) -> Result<(), String> {
    let func = module
        .function(id)
        .ok_or_else(|| format!("no function with id {}", id.0))?;
    let body = func
        .body
        .as_ref()
        .ok_or_else(|| format!("@{} has no body", func.name))?;
    if body.blocks.is_empty() {
        return Err(format!("@{} has no blocks", func.name));
    }

    let mut defined: HashSet<InstId> = HashSet::new();
    for block in &body.blocks {
        let Some((last, init)) = block.insts.split_last() else {
            return Err(format!("block `{}` is empty", block.label));
        };
        for id in init {
            if body.inst(*id).is_some_and(|i| i.kind.is_terminator()) {
                return Err(format!(
                    "terminator %{} in the middle of block `{}`",
                    id.0, block.label
                ));
            }
        }
        if !body.inst(*last).is_some_and(|i| i.kind.is_terminator()) {
            return Err(format!("block `{}` has no terminator", block.label));
        }

        for id in &block.insts {
            let inst = body
                .inst(*id)
                .ok_or_else(|| format!("dangling instruction %{}", id.0))?;
            for operand in inst.kind.operands() {
                check_operand(module, func, &defined, operand)
                    .map_err(|e| format!("%{}: {}", id.0, e))?;
            }
            check_types(module, func, &inst.kind, inst.ty)
                .map_err(|e| format!("%{}: {}", id.0, e))?;
            if !defined.insert(*id) {
                return Err(format!("%{} is placed twice", id.0));
            }
        }
    }
    Ok(())
}

fn check_operand(
    module: &Module,
    func: &Function,
    defined: &HashSet<InstId>,
    value: Value,
) -> Result<(), String> {
    match value {
        Value::Inst(id) if !defined.contains(&id) => {
            Err(format!("use of %{} before its definition", id.0))
        }
        Value::Inst(id) if module.value_type(func, value) == Some(Type::Void) => {
            Err(format!("use of void value %{}", id.0))
        }
        Value::Param(i) if i as usize >= func.params.len() => {
            Err(format!("reference to missing parameter #{}", i))
        }
        Value::Global(id) if module.global(id).is_none() => {
            Err(format!("reference to missing global #{}", id.0))
        }
        _ => Ok(()),
    }
}

fn check_types(module: &Module, func: &Function, kind: &InstKind, ty: Type) -> Result<(), String> {
    let type_of = |v| {
        module
            .value_type(func, v)
            .ok_or_else(|| format!("untyped operand {:?}", v))
    };

    match kind {
        InstKind::Alloca(allocated) => {
            if allocated.pointer_to() != Some(ty) {
                return Err(format!("alloca of {} typed {}", allocated, ty));
            }
        }
        InstKind::Load(ptr) => {
            let ptr_ty = type_of(*ptr)?;
            if ptr_ty.pointee() != Some(ty) {
                return Err(format!("load of {} through {}", ty, ptr_ty));
            }
        }
        InstKind::Store { value, ptr } => {
            let (value_ty, ptr_ty) = (type_of(*value)?, type_of(*ptr)?);
            if ptr_ty.pointee() != Some(value_ty) {
                return Err(format!("store of {} through {}", value_ty, ptr_ty));
            }
        }
        InstKind::FMul(a, b) => {
            let (a_ty, b_ty) = (type_of(*a)?, type_of(*b)?);
            if a_ty != b_ty || a_ty != ty || !matches!(ty, Type::Float | Type::Vector) {
                return Err(format!("fmul of {} and {} typed {}", a_ty, b_ty, ty));
            }
        }
        InstKind::InsertElement {
            vector,
            scalar,
            lane,
        } => {
            let (vector_ty, scalar_ty) = (type_of(*vector)?, type_of(*scalar)?);
            if vector_ty != Type::Vector || scalar_ty != Type::Float || ty != Type::Vector {
                return Err(format!(
                    "insertelement of {} into {}",
                    scalar_ty, vector_ty
                ));
            }
            if *lane as usize >= LANES {
                return Err(format!("lane {} out of range", lane));
            }
        }
        InstKind::ShuffleVector { vector, mask } => {
            let vector_ty = type_of(*vector)?;
            if vector_ty != Type::Vector || ty != Type::Vector {
                return Err(format!("shufflevector of {}", vector_ty));
            }
            if let Some(lane) = mask.iter().find(|&&m| m as usize >= LANES) {
                return Err(format!("shuffle mask lane {} out of range", lane));
            }
        }
        InstKind::Call { callee, args } => {
            let target = module
                .function(*callee)
                .ok_or_else(|| format!("call to missing function #{}", callee.0))?;
            if target.params.len() != args.len() {
                return Err(format!(
                    "call to @{} with {} arguments, expected {}",
                    target.name,
                    args.len(),
                    target.params.len()
                ));
            }
            for (param, arg) in target.params.iter().zip(args) {
                let arg_ty = type_of(*arg)?;
                if arg_ty != param.ty {
                    return Err(format!(
                        "argument `{}` of @{} is {}, found {}",
                        param.name, target.name, param.ty, arg_ty
                    ));
                }
            }
            if target.ret != ty {
                return Err(format!("call to @{} typed {}", target.name, ty));
            }
        }
        InstKind::Ret => {
            if func.ret != Type::Void || ty != Type::Void {
                return Err(format!("ret void in a function returning {}", func.ret));
            }
        }
    }
    Ok(())
}
