use phf::phf_map;

use crate::ir::LANES;

use super::{ExecError, RtValue, Slot};

pub(super) type Intrinsic = fn(&[RtValue], &[Slot]) -> Result<RtValue, ExecError>;

pub(super) static NATIVE_INTRINSICS: phf::Map<&str, Intrinsic> = phf_map! {
    "diffuse" => diffuse as Intrinsic,
    "ambient" => ambient as Intrinsic,
};

/// The only light is a distant white light shining along +Z.
const LIGHT_DIRECTION: [f32; LANES] = [0.0, 0.0, 1.0];

fn diffuse(args: &[RtValue], memory: &[Slot]) -> Result<RtValue, ExecError> {
    let [RtValue::Ptr(slot)] = args else {
        return Err(ExecError::Fault(format!("diffuse called with {:?}", args)));
    };
    let Some(Slot::Vector(n)) = memory.get(*slot) else {
        return Err(ExecError::Fault(format!("diffuse of non-vector slot {}", slot)));
    };

    let length = n.iter().map(|c| c * c).sum::<f32>().sqrt();
    if length == 0.0 {
        return Ok(RtValue::Vector([0.0; LANES]));
    }
    let cosine: f32 = n
        .iter()
        .zip(LIGHT_DIRECTION)
        .map(|(c, l)| c / length * l)
        .sum();
    Ok(RtValue::Vector([cosine.max(0.0); LANES]))
}

fn ambient(_args: &[RtValue], _memory: &[Slot]) -> Result<RtValue, ExecError> {
    Ok(RtValue::Vector([0.0; LANES]))
}
