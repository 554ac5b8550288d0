//! The SSA-style backend the code generator emits into.
//!
//! A [`Module`] owns globals and functions. A defined [`Function`] owns a
//! [`Body`]: an arena of instructions plus the blocks that sequence them.
//! Instructions, blocks, globals and functions are all referred to by
//! stable indices, so a [`Value`] is a small `Copy` handle.

mod display;
mod verify;

pub use verify::verify;

/// Lanes in a color or normal vector.
pub const LANES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Float,
    Vector,
    FloatPtr,
    VectorPtr,
}

impl Type {
    pub fn pointee(self) -> Option<Type> {
        match self {
            Type::FloatPtr => Some(Type::Float),
            Type::VectorPtr => Some(Type::Vector),
            _ => None,
        }
    }

    pub fn pointer_to(self) -> Option<Type> {
        match self {
            Type::Float => Some(Type::FloatPtr),
            Type::Vector => Some(Type::VectorPtr),
            _ => None,
        }
    }

    pub fn is_pointer(self) -> bool {
        self.pointee().is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlobalId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Inst(InstId),
    Param(u32),
    Global(GlobalId),
    Float(f32),
    Undef(Type),
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstKind {
    Alloca(Type),
    Load(Value),
    Store { value: Value, ptr: Value },
    /// Scalar or lane-wise vector multiply.
    FMul(Value, Value),
    InsertElement { vector: Value, scalar: Value, lane: u32 },
    ShuffleVector { vector: Value, mask: [u32; LANES] },
    Call { callee: FuncId, args: Vec<Value> },
    Ret,
}

impl InstKind {
    pub fn is_terminator(&self) -> bool {
        matches!(self, InstKind::Ret)
    }

    pub fn operands(&self) -> Vec<Value> {
        match self {
            InstKind::Alloca(_) | InstKind::Ret => vec![],
            InstKind::Load(ptr) => vec![*ptr],
            InstKind::Store { value, ptr } => vec![*value, *ptr],
            InstKind::FMul(a, b) => vec![*a, *b],
            InstKind::InsertElement { vector, scalar, .. } => vec![*vector, *scalar],
            InstKind::ShuffleVector { vector, .. } => vec![*vector],
            InstKind::Call { args, .. } => args.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Inst {
    pub kind: InstKind,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub label: String,
    pub insts: Vec<InstId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub blocks: Vec<Block>,
    pub insts: Vec<Inst>,
}

impl Body {
    pub fn inst(&self, id: InstId) -> Option<&Inst> {
        self.insts.get(id.0 as usize)
    }

    pub fn append_block(&mut self, label: &str) -> BlockId {
        self.blocks.push(Block {
            label: label.to_string(),
            insts: vec![],
        });
        BlockId(self.blocks.len() as u32 - 1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    /// Used by the execution environment when a caller omits the argument.
    pub default: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
    /// `None` for an external declaration such as an intrinsic.
    pub body: Option<Body>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Global {
    pub name: String,
    /// The type of the stored value; the global itself is a pointer to it.
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub name: String,
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            globals: vec![],
            functions: vec![],
        }
    }

    pub fn add_global(&mut self, name: &str, ty: Type) -> GlobalId {
        self.globals.push(Global {
            name: name.to_string(),
            ty,
        });
        GlobalId(self.globals.len() as u32 - 1)
    }

    pub fn global(&self, id: GlobalId) -> Option<&Global> {
        self.globals.get(id.0 as usize)
    }

    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id.0 as usize)
    }

    pub fn function_mut(&mut self, id: FuncId) -> Option<&mut Function> {
        self.functions.get_mut(id.0 as usize)
    }

    pub fn function_by_name(&self, name: &str) -> Option<FuncId> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|i| FuncId(i as u32))
    }

    /// Adds the function, or returns the existing one of that name after
    /// resetting its signature and dropping any previous body.
    pub fn get_or_insert_function(&mut self, name: &str, params: Vec<Param>, ret: Type) -> FuncId {
        let function = Function {
            name: name.to_string(),
            params,
            ret,
            body: None,
        };
        match self.function_by_name(name) {
            Some(id) => {
                self.functions[id.0 as usize] = function;
                id
            }
            None => {
                self.functions.push(function);
                FuncId(self.functions.len() as u32 - 1)
            }
        }
    }

    /// The type of `value` as seen from inside `func`.
    pub fn value_type(&self, func: &Function, value: Value) -> Option<Type> {
        match value {
            Value::Inst(id) => func.body.as_ref()?.inst(id).map(|i| i.ty),
            Value::Param(i) => func.params.get(i as usize).map(|p| p.ty),
            Value::Global(id) => self.global(id)?.ty.pointer_to(),
            Value::Float(_) => Some(Type::Float),
            Value::Undef(ty) => Some(ty),
        }
    }
}
