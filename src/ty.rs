use std::fmt;

/// Types a shader argument may be declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Float,
    Color,
    /// An unrecognized type name. Never lowered.
    Error,
}

impl ValueType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "float" => ValueType::Float,
            "color" => ValueType::Color,
            _ => ValueType::Error,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Float => write!(f, "Float"),
            ValueType::Color => write!(f, "Color"),
            ValueType::Error => write!(f, "Error"),
        }
    }
}
