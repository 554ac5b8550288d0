use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info_span};

use crate::ir::{FuncId, Module, Type, LANES};

use super::intrinsics::{Intrinsic, NATIVE_INTRINSICS};
use super::interpreter::{Machine, RtValue, Slot};
use super::{ArgValue, Color, ExecError};

/// Storage for a module's globals plus native bindings for its intrinsics.
pub struct ExecutionEnvironment {
    module: Module,
    memory: Vec<Slot>,
    global_slots: Vec<usize>,
    natives: HashMap<FuncId, Intrinsic>,
}

impl fmt::Debug for ExecutionEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionEnvironment")
            .field("module", &self.module.name)
            .field("memory", &self.memory)
            .field("natives", &self.natives.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn initial_value(name: &str, ty: Type) -> Option<Slot> {
    match name {
        "Cs" | "Os" | "Oi" => Some(Slot::Vector([1.0; LANES])),
        "N" => Some(Slot::Vector([0.0, 0.0, 1.0])),
        _ => Slot::zeroed(ty),
    }
}

impl ExecutionEnvironment {
    pub fn new(module: Module) -> Result<Self, ExecError> {
        let mut memory = vec![];
        let mut global_slots = vec![];
        for global in &module.globals {
            let slot = initial_value(&global.name, global.ty)
                .ok_or_else(|| ExecError::Fault(format!("global @{} of type {}", global.name, global.ty)))?;
            memory.push(slot);
            global_slots.push(memory.len() - 1);
        }

        let mut natives = HashMap::new();
        for (i, function) in module.functions.iter().enumerate() {
            if function.body.is_some() {
                continue;
            }
            let native = NATIVE_INTRINSICS
                .get(function.name.as_str())
                .ok_or_else(|| ExecError::UnboundIntrinsic(function.name.clone()))?;
            natives.insert(FuncId(i as u32), *native);
        }

        Ok(Self {
            module,
            memory,
            global_slots,
            natives,
        })
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    fn global_slot(&self, name: &str) -> Result<usize, ExecError> {
        self.module
            .globals
            .iter()
            .position(|g| g.name == name)
            .and_then(|i| self.global_slots.get(i).copied())
            .ok_or_else(|| ExecError::UnknownGlobal(name.to_string()))
    }

    pub fn global(&self, name: &str) -> Result<ArgValue, ExecError> {
        let slot = self.global_slot(name)?;
        Ok(match self.memory[slot] {
            Slot::Float(f) => ArgValue::Float(f),
            Slot::Vector(v) => ArgValue::Color(Color(v)),
        })
    }

    pub fn color(&self, name: &str) -> Result<Color, ExecError> {
        match self.global(name)? {
            ArgValue::Color(c) => Ok(c),
            ArgValue::Float(_) => Err(ExecError::GlobalType {
                name: name.to_string(),
                expected: Type::Vector,
            }),
        }
    }

    pub fn float(&self, name: &str) -> Result<f32, ExecError> {
        match self.global(name)? {
            ArgValue::Float(f) => Ok(f),
            ArgValue::Color(_) => Err(ExecError::GlobalType {
                name: name.to_string(),
                expected: Type::Float,
            }),
        }
    }

    /// A float stored into a color global is broadcast.
    pub fn set_global(&mut self, name: &str, value: ArgValue) -> Result<(), ExecError> {
        let slot = self.global_slot(name)?;
        self.memory[slot] = match (self.memory[slot], value) {
            (Slot::Float(_), ArgValue::Float(f)) => Slot::Float(f),
            (Slot::Vector(_), ArgValue::Float(f)) => Slot::Vector([f; LANES]),
            (Slot::Vector(_), ArgValue::Color(c)) => Slot::Vector(c.0),
            (Slot::Float(_), ArgValue::Color(_)) => {
                return Err(ExecError::GlobalType {
                    name: name.to_string(),
                    expected: Type::Float,
                })
            }
        };
        Ok(())
    }

    fn defined_function(&self, name: &str) -> Result<FuncId, ExecError> {
        self.module
            .function_by_name(name)
            .filter(|func| self.module.functions[func.0 as usize].body.is_some())
            .ok_or_else(|| ExecError::UnknownFunction(name.to_string()))
    }

    /// Runs a defined function with positional arguments. Omitted trailing
    /// arguments take the parameter's default.
    pub fn run_function(&mut self, name: &str, args: &[ArgValue]) -> Result<(), ExecError> {
        let args: Vec<_> = args.iter().copied().map(Some).collect();
        self.run(name, &args)
    }

    /// Runs a defined function with arguments matched to parameters by name.
    /// Parameters not named take their default.
    pub fn run_function_named(
        &mut self,
        name: &str,
        args: &[(String, ArgValue)],
    ) -> Result<(), ExecError> {
        let func = self.defined_function(name)?;
        let params = &self.module.functions[func.0 as usize].params;
        let mut positional = vec![None; params.len()];
        for (arg, value) in args {
            let i = params
                .iter()
                .position(|p| &p.name == arg)
                .ok_or_else(|| ExecError::UnknownArgument {
                    function: name.to_string(),
                    name: arg.clone(),
                })?;
            positional[i] = Some(*value);
        }
        self.run(name, &positional)
    }

    fn run(&mut self, name: &str, args: &[Option<ArgValue>]) -> Result<(), ExecError> {
        let _span = info_span!("execute", function = name).entered();

        let func = self.defined_function(name)?;
        let function = &self.module.functions[func.0 as usize];
        if args.len() > function.params.len() {
            return Err(ExecError::TooManyArguments {
                function: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
            });
        }

        let mark = self.memory.len();
        let mut params = vec![];
        for (i, param) in function.params.iter().enumerate() {
            let arg = match (args.get(i).copied().flatten(), param.default) {
                (Some(arg), _) => arg,
                (None, Some(default)) => ArgValue::Float(default),
                (None, None) => {
                    self.memory.truncate(mark);
                    return Err(ExecError::MissingArgument {
                        function: name.to_string(),
                        name: param.name.clone(),
                    });
                }
            };
            debug!(param = %param.name, value = %arg, "argument");

            let value = match (param.ty, arg) {
                (Type::Float, ArgValue::Float(f)) => RtValue::Float(f),
                (Type::VectorPtr, ArgValue::Float(f)) => {
                    self.memory.push(Slot::Vector([f; LANES]));
                    RtValue::Ptr(self.memory.len() - 1)
                }
                (Type::VectorPtr, ArgValue::Color(c)) => {
                    self.memory.push(Slot::Vector(c.0));
                    RtValue::Ptr(self.memory.len() - 1)
                }
                (expected, _) => {
                    self.memory.truncate(mark);
                    return Err(ExecError::ArgumentType {
                        name: param.name.clone(),
                        expected,
                    });
                }
            };
            params.push(value);
        }

        let mut machine = Machine {
            module: &self.module,
            memory: &mut self.memory,
            global_slots: &self.global_slots,
            natives: &self.natives,
        };
        let result = machine.call(func, &params);
        self.memory.truncate(mark);
        result.map(|_| ())
    }

    pub fn dump(&self) -> String {
        let show = |name| {
            self.global(name)
                .map(|v| v.to_string())
                .unwrap_or_else(|_| "-".to_string())
        };
        format!("Cs: {}, Ci: {}", show("Cs"), show("Ci"))
    }
}
