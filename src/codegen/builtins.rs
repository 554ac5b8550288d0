use crate::ir::Type;

/// Globals every shader can read and write, with their stored type.
pub const BUILTIN_GLOBALS: &[(&str, Type)] = &[
    ("Ci", Type::Vector),
    ("Oi", Type::Vector),
    ("Cs", Type::Vector),
    ("Os", Type::Vector),
    ("N", Type::Vector),
    ("s", Type::Float),
    ("t", Type::Float),
];

pub struct IntrinsicDecl {
    pub name: &'static str,
    pub params: &'static [(&'static str, Type)],
    pub ret: Type,
}

/// Declared in every module; the execution environment supplies the bodies.
pub const INTRINSICS: &[IntrinsicDecl] = &[
    IntrinsicDecl {
        name: "diffuse",
        params: &[("N", Type::VectorPtr)],
        ret: Type::Vector,
    },
    IntrinsicDecl {
        name: "ambient",
        params: &[],
        ret: Type::Vector,
    },
];
