pub mod codegen;
pub mod error;
pub mod exec;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod ty;

use tracing::{debug, info_span};

use codegen::Codegen;
use error::Result;
use ir::{FuncId, Module};
use lexer::Lexer;
use parser::{Parser, ShaderDefinition};

pub const MODULE_NAME: &str = "shmoptix";

/// A shader together with the module its function was emitted into.
#[derive(Debug)]
pub struct CompiledShader {
    pub definition: ShaderDefinition,
    pub module: Module,
    pub function: FuncId,
}

impl CompiledShader {
    pub fn name(&self) -> &str {
        &self.definition.prototype.name
    }
}

pub fn parse(source: &str) -> Result<ShaderDefinition> {
    let _span = info_span!("parse").entered();
    let mut parser = Parser::new(Lexer::new(source))?;
    let shader = parser.parse()?;
    debug!(name = %shader.prototype.name, statements = shader.body.len(), "parsed shader");
    Ok(shader)
}

/// Lowers a parsed shader into a fresh module.
pub fn lower(shader: &ShaderDefinition) -> Result<(Module, FuncId)> {
    let mut codegen = Codegen::new(MODULE_NAME);
    let function = codegen.gen_shader(shader)?;
    Ok((codegen.into_module(), function))
}

pub fn compile(source: &str) -> Result<CompiledShader> {
    let definition = parse(source)?;
    let (module, function) = lower(&definition)?;
    Ok(CompiledShader {
        definition,
        module,
        function,
    })
}
