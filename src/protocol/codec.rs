use rosc::{OscMessage, OscType};

use crate::camera::codec::CameraSample;
use crate::foundation::error::ProtocolError;
use crate::params::store::ParameterStore;
use crate::params::value::{ParamKind, ParamValue};

/// Scalars per camera sample on the wire: fov + 12 matrix entries.
pub const CAMERA_SAMPLE_ARITY: usize = 13;

const CONFIGURE_ARG_COUNT: usize = 11;

/// Raw `setup` payload, positional on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigureRequest {
    /// Output directory; empty keeps the current one.
    pub path: String,
    /// Output file stem; empty keeps the current one.
    pub file_name: String,
    /// Host caches timelines between sessions.
    pub cache: bool,
    /// Write rendered frames to disk.
    pub write: bool,
    /// Render into an offscreen buffer (only honored together with `write`).
    pub offscreen: bool,
    /// Applied only when > 0.
    pub fps: f32,
    /// Applied only when > 0.
    pub duration: i32,
    /// Applied only when both width and height are > 0.
    pub width: i32,
    /// See `width`.
    pub height: i32,
    /// Originating source media; empty keeps the current one.
    pub source_path: String,
    /// Originating source media timestamp, applied together with `source_path`.
    pub source_time: f32,
}

pub(crate) fn arg_f32(arg: &OscType) -> Result<f32, ProtocolError> {
    match *arg {
        OscType::Float(v) => Ok(v),
        OscType::Double(v) => Ok(v as f32),
        OscType::Int(v) => Ok(v as f32),
        OscType::Long(v) => Ok(v as f32),
        OscType::Bool(v) => Ok(if v { 1.0 } else { 0.0 }),
        _ => Err(ProtocolError::InvalidArgType),
    }
}

pub(crate) fn arg_i32(arg: &OscType) -> Result<i32, ProtocolError> {
    match *arg {
        OscType::Int(v) => Ok(v),
        OscType::Long(v) => i32::try_from(v).map_err(|_| ProtocolError::InvalidArgType),
        OscType::Float(v) => Ok(v as i32),
        OscType::Double(v) => Ok(v as i32),
        OscType::Bool(v) => Ok(i32::from(v)),
        _ => Err(ProtocolError::InvalidArgType),
    }
}

pub(crate) fn arg_string(arg: &OscType) -> Result<String, ProtocolError> {
    match arg {
        OscType::String(s) => Ok(s.clone()),
        _ => Err(ProtocolError::InvalidArgType),
    }
}

pub(crate) fn parse_configure(args: &[OscType]) -> Result<ConfigureRequest, ProtocolError> {
    if args.len() < CONFIGURE_ARG_COUNT {
        return Err(ProtocolError::InvalidArgSize);
    }
    Ok(ConfigureRequest {
        path: arg_string(&args[0])?,
        file_name: arg_string(&args[1])?,
        cache: arg_i32(&args[2])? != 0,
        write: arg_i32(&args[3])? != 0,
        offscreen: arg_i32(&args[4])? != 0,
        fps: arg_f32(&args[5])?,
        duration: arg_i32(&args[6])?,
        width: arg_i32(&args[7])?,
        height: arg_i32(&args[8])?,
        source_path: arg_string(&args[9])?,
        source_time: arg_f32(&args[10])?,
    })
}

/// Unpack a flat scalar list into values of `kind`.
pub fn decode_values(kind: ParamKind, args: &[OscType]) -> Result<Vec<ParamValue>, ProtocolError> {
    let arity = kind.arity();
    if !args.len().is_multiple_of(arity) {
        return Err(ProtocolError::InvalidArgSize);
    }
    let mut scalars = [0f32; 3];
    args.chunks_exact(arity)
        .map(|chunk| {
            for (dst, a) in scalars.iter_mut().zip(chunk) {
                *dst = match kind {
                    ParamKind::Checkbox => arg_i32(a)? as f32,
                    _ => arg_f32(a)?,
                };
            }
            ParamValue::from_scalars(kind, &scalars[..arity])
                .map_err(|_| ProtocolError::InvalidArgSize)
        })
        .collect()
}

/// Unpack a flat scalar list into camera samples of 13 scalars each.
pub fn decode_camera_samples(args: &[OscType]) -> Result<Vec<CameraSample>, ProtocolError> {
    if !args.len().is_multiple_of(CAMERA_SAMPLE_ARITY) {
        return Err(ProtocolError::InvalidArgSize);
    }
    args.chunks_exact(CAMERA_SAMPLE_ARITY)
        .map(|chunk| {
            let fov = arg_f32(&chunk[0])?;
            let mut m = [0f32; 12];
            for (dst, a) in m.iter_mut().zip(&chunk[1..]) {
                *dst = arg_f32(a)?;
            }
            Ok(CameraSample::from_wire(fov, &m))
        })
        .collect()
}

/// Append the wire scalars of `value` (checkbox as int, everything else as floats).
pub fn push_value(out: &mut Vec<OscType>, value: &ParamValue) {
    match *value {
        ParamValue::Checkbox(v) => out.push(OscType::Int(i32::from(v))),
        ParamValue::Slider(v) => out.push(OscType::Float(v)),
        ParamValue::Point2(v) => out.extend([OscType::Float(v.x), OscType::Float(v.y)]),
        ParamValue::Point3(v) => {
            out.extend([OscType::Float(v.x), OscType::Float(v.y), OscType::Float(v.z)])
        }
        ParamValue::Color([r, g, b]) => {
            out.extend([OscType::Float(r), OscType::Float(g), OscType::Float(b)])
        }
    }
}

/// Reply to `setup`: camera flag, cache flag, then `name, type, initial value...` per
/// parameter in id order.
pub fn configure_reply(addr: &str, store: &ParameterStore) -> OscMessage {
    let mut args = vec![
        OscType::Int(i32::from(store.camera_requested())),
        OscType::Int(i32::from(store.is_cache_complete())),
    ];
    for p in store.parameters() {
        args.push(OscType::String(p.name.clone()));
        args.push(OscType::String(p.kind.wire_name().to_owned()));
        push_value(&mut args, &p.initial);
    }
    OscMessage {
        addr: addr.to_owned(),
        args,
    }
}

/// Status reply carrying one string: empty on success, the error text otherwise.
pub fn status_reply(addr: &str, status: Result<(), ProtocolError>) -> OscMessage {
    let text = match status {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    };
    OscMessage {
        addr: addr.to_owned(),
        args: vec![OscType::String(text)],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/codec.rs"]
mod tests;
