use std::fmt;
use std::str::FromStr;

use crate::ir::LANES;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color(pub [f32; LANES]);

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    pub fn splat(v: f32) -> Self {
        Self([v; LANES])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{} {} {}", r, g, b)
    }
}

/// A value handed to a shader argument or stored in a global.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArgValue {
    Float(f32),
    Color(Color),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::Color(c) => write!(f, "{}", c),
        }
    }
}

/// Parses `f` as a float and `r,g,b` as a color.
impl FromStr for ArgValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid number in `{}`: {}", s, e))?;
        match parts[..] {
            [v] => Ok(ArgValue::Float(v)),
            [r, g, b] => Ok(ArgValue::Color(Color::new(r, g, b))),
            _ => Err(format!(
                "expected a float or {} comma-separated floats, got `{}`",
                LANES, s
            )),
        }
    }
}
