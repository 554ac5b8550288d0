use std::collections::HashMap;

use tracing::trace;

use crate::ir::{FuncId, InstKind, Module, Type, Value, LANES};

use super::intrinsics::Intrinsic;
use super::ExecError;

/// One cell of runtime storage, addressed by index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Slot {
    Float(f32),
    Vector([f32; LANES]),
}

impl Slot {
    pub fn zeroed(ty: Type) -> Option<Slot> {
        match ty {
            Type::Float => Some(Slot::Float(0.0)),
            Type::Vector => Some(Slot::Vector([0.0; LANES])),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RtValue {
    Void,
    Float(f32),
    Vector([f32; LANES]),
    Ptr(usize),
}

fn fault<T>(message: String) -> Result<T, ExecError> {
    Err(ExecError::Fault(message))
}

/// Runs IR against borrowed storage.
pub(super) struct Machine<'a> {
    pub module: &'a Module,
    pub memory: &'a mut Vec<Slot>,
    pub global_slots: &'a [usize],
    pub natives: &'a HashMap<FuncId, Intrinsic>,
}

impl Machine<'_> {
    fn eval(&self, value: Value, params: &[RtValue], regs: &[RtValue]) -> Result<RtValue, ExecError> {
        let v = match value {
            Value::Inst(id) => regs.get(id.0 as usize).copied(),
            Value::Param(i) => params.get(i as usize).copied(),
            Value::Global(id) => self.global_slots.get(id.0 as usize).map(|s| RtValue::Ptr(*s)),
            Value::Float(f) => Some(RtValue::Float(f)),
            Value::Undef(Type::Float) => Some(RtValue::Float(0.0)),
            Value::Undef(Type::Vector) => Some(RtValue::Vector([0.0; LANES])),
            Value::Undef(_) => Some(RtValue::Void),
        };
        v.ok_or_else(|| ExecError::Fault(format!("unbound operand {:?}", value)))
    }

    fn slot(&self, ptr: RtValue) -> Result<usize, ExecError> {
        match ptr {
            RtValue::Ptr(slot) if slot < self.memory.len() => Ok(slot),
            other => fault(format!("{:?} is not a valid pointer", other)),
        }
    }

    pub fn call(&mut self, func: FuncId, params: &[RtValue]) -> Result<RtValue, ExecError> {
        if let Some(native) = self.natives.get(&func) {
            return native(params, &self.memory[..]);
        }

        let module = self.module;
        let function = module
            .function(func)
            .ok_or_else(|| ExecError::Fault(format!("no function #{}", func.0)))?;
        let Some(body) = &function.body else {
            return Err(ExecError::UnboundIntrinsic(function.name.clone()));
        };
        let Some(block) = body.blocks.first() else {
            return fault(format!("@{} has no blocks", function.name));
        };

        let mut regs = vec![RtValue::Void; body.insts.len()];
        for id in &block.insts {
            let Some(inst) = body.inst(*id) else {
                return fault(format!("dangling instruction %{}", id.0));
            };
            let eval = |v| self.eval(v, params, &regs);

            let result = match &inst.kind {
                InstKind::Alloca(ty) => {
                    let slot = Slot::zeroed(*ty)
                        .ok_or_else(|| ExecError::Fault(format!("alloca of {}", ty)))?;
                    self.memory.push(slot);
                    RtValue::Ptr(self.memory.len() - 1)
                }
                InstKind::Load(ptr) => match self.memory[self.slot(eval(*ptr)?)?] {
                    Slot::Float(f) => RtValue::Float(f),
                    Slot::Vector(v) => RtValue::Vector(v),
                },
                InstKind::Store { value, ptr } => {
                    let slot = self.slot(eval(*ptr)?)?;
                    self.memory[slot] = match (self.memory[slot], eval(*value)?) {
                        (Slot::Float(_), RtValue::Float(f)) => Slot::Float(f),
                        (Slot::Vector(_), RtValue::Vector(v)) => Slot::Vector(v),
                        (old, new) => return fault(format!("store of {:?} into {:?}", new, old)),
                    };
                    RtValue::Void
                }
                InstKind::FMul(a, b) => match (eval(*a)?, eval(*b)?) {
                    (RtValue::Float(a), RtValue::Float(b)) => RtValue::Float(a * b),
                    (RtValue::Vector(a), RtValue::Vector(b)) => {
                        RtValue::Vector(std::array::from_fn(|i| a[i] * b[i]))
                    }
                    (a, b) => return fault(format!("fmul of {:?} and {:?}", a, b)),
                },
                InstKind::InsertElement {
                    vector,
                    scalar,
                    lane,
                } => match (eval(*vector)?, eval(*scalar)?) {
                    (RtValue::Vector(mut v), RtValue::Float(f)) if (*lane as usize) < LANES => {
                        v[*lane as usize] = f;
                        RtValue::Vector(v)
                    }
                    (v, f) => return fault(format!("insertelement of {:?} into {:?}", f, v)),
                },
                InstKind::ShuffleVector { vector, mask } => match eval(*vector)? {
                    RtValue::Vector(v) if mask.iter().all(|&m| (m as usize) < LANES) => {
                        RtValue::Vector(std::array::from_fn(|i| v[mask[i] as usize]))
                    }
                    v => return fault(format!("shufflevector of {:?}", v)),
                },
                InstKind::Call { callee, args } => {
                    let args = args.iter().map(|a| eval(*a)).collect::<Result<Vec<_>, _>>()?;
                    self.call(*callee, &args)?
                }
                InstKind::Ret => return Ok(RtValue::Void),
            };
            trace!(inst = id.0, ?result, "executed");
            regs[id.0 as usize] = result;
        }
        fault(format!("@{} fell off the end of its entry block", function.name))
    }
}
