use std::fmt;

use super::{Function, InstKind, Module, Type, Value, LANES};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Float => write!(f, "float"),
            Type::Vector => write!(f, "<{} x float>", LANES),
            Type::FloatPtr => write!(f, "float*"),
            Type::VectorPtr => write!(f, "<{} x float>*", LANES),
        }
    }
}

struct Operand<'a> {
    module: &'a Module,
    func: &'a Function,
    value: Value,
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Inst(id) => write!(f, "%{}", id.0),
            Value::Param(i) => match self.func.params.get(i as usize) {
                Some(param) => write!(f, "%{}", param.name),
                None => write!(f, "%arg{}", i),
            },
            Value::Global(id) => match self.module.global(id) {
                Some(global) => write!(f, "@{}", global.name),
                None => write!(f, "@global{}", id.0),
            },
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Undef(_) => write!(f, "undef"),
        }
    }
}

impl Module {
    fn write_function(&self, f: &mut fmt::Formatter<'_>, func: &Function) -> fmt::Result {
        let Some(body) = &func.body else {
            let params: Vec<_> = func.params.iter().map(|p| p.ty.to_string()).collect();
            return writeln!(f, "declare {} @{}({})", func.ret, func.name, params.join(", "));
        };

        let params: Vec<_> = func
            .params
            .iter()
            .map(|p| format!("{} %{}", p.ty, p.name))
            .collect();
        writeln!(f, "define {} @{}({}) {{", func.ret, func.name, params.join(", "))?;

        let op = move |value| Operand {
            module: self,
            func,
            value,
        };
        let ty = move |value| {
            self.value_type(func, value)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string())
        };

        for block in &body.blocks {
            writeln!(f, "{}:", block.label)?;
            for id in &block.insts {
                let Some(inst) = body.inst(*id) else {
                    writeln!(f, "  <dangling %{}>", id.0)?;
                    continue;
                };
                write!(f, "  ")?;
                if inst.ty != Type::Void {
                    write!(f, "%{} = ", id.0)?;
                }
                match &inst.kind {
                    InstKind::Alloca(t) => writeln!(f, "alloca {}", t)?,
                    InstKind::Load(ptr) => writeln!(f, "load {}, {} {}", inst.ty, ty(*ptr), op(*ptr))?,
                    InstKind::Store { value, ptr } => writeln!(
                        f,
                        "store {} {}, {} {}",
                        ty(*value),
                        op(*value),
                        ty(*ptr),
                        op(*ptr)
                    )?,
                    InstKind::FMul(a, b) => writeln!(f, "fmul {} {}, {}", inst.ty, op(*a), op(*b))?,
                    InstKind::InsertElement {
                        vector,
                        scalar,
                        lane,
                    } => writeln!(
                        f,
                        "insertelement {} {}, {} {}, i32 {}",
                        ty(*vector),
                        op(*vector),
                        ty(*scalar),
                        op(*scalar),
                        lane
                    )?,
                    InstKind::ShuffleVector { vector, mask } => {
                        let mask: Vec<_> = mask.iter().map(|m| format!("i32 {}", m)).collect();
                        writeln!(
                            f,
                            "shufflevector {} {}, {} undef, <{} x i32> <{}>",
                            ty(*vector),
                            op(*vector),
                            ty(*vector),
                            LANES,
                            mask.join(", ")
                        )?
                    }
                    InstKind::Call { callee, args } => {
                        let name = self
                            .function(*callee)
                            .map(|c| c.name.as_str())
                            .unwrap_or("?");
                        let args: Vec<_> = args
                            .iter()
                            .map(|a| format!("{} {}", ty(*a), op(*a)))
                            .collect();
                        writeln!(f, "call {} @{}({})", inst.ty, name, args.join(", "))?
                    }
                    InstKind::Ret => writeln!(f, "ret void")?,
                }
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        for global in &self.globals {
            writeln!(f, "@{} = external global {}", global.name, global.ty)?;
        }
        for func in &self.functions {
            writeln!(f)?;
            self.write_function(f, func)?;
        }
        Ok(())
    }
}
