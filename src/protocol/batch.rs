use rosc::{OscMessage, OscType};

use crate::camera::CAMERA_SETDOWN_NAME;
use crate::camera::codec::{CameraSample, encode_camera};
use crate::foundation::core::FrameIndex;
use crate::params::store::{ParameterStore, SetterRecord};
use crate::protocol::address::Addresses;
use crate::protocol::codec::push_value;

/// Maximum `(frame, value...)` groups per parameter setter message.
pub const MAX_SETTER_GROUPS: usize = 150;
/// Maximum camera samples per camera setter message (8 scalars each).
pub const MAX_CAMERA_SAMPLES: usize = 30;

/// Number of chunk messages needed for `count` items.
pub fn chunk_count(count: usize, chunk_size: usize) -> usize {
    count.div_ceil(chunk_size)
}

/// Setter frames are bounded to int32 by `ParameterStore::writeback` and the session duration.
fn frame_arg(frame: FrameIndex) -> OscType {
    OscType::Int(i32::try_from(frame.0).unwrap_or(i32::MAX))
}

fn begin_message(addrs: &Addresses, name: &str, type_name: &str, chunks: usize) -> OscMessage {
    OscMessage {
        addr: addrs.setdown(name, "begin"),
        args: vec![
            OscType::String(type_name.to_owned()),
            OscType::Int(chunks as i32),
        ],
    }
}

/// `begin` + numbered chunks for one parameter setter record, frames ascending.
pub fn setter_messages(addrs: &Addresses, record: &SetterRecord) -> Vec<OscMessage> {
    let values = record.sorted_values();
    let chunks = chunk_count(values.len(), MAX_SETTER_GROUPS);

    let mut out = Vec::with_capacity(chunks + 1);
    out.push(begin_message(addrs, &record.name, record.kind.wire_name(), chunks));
    for (n, chunk) in values.chunks(MAX_SETTER_GROUPS).enumerate() {
        let mut args = Vec::with_capacity(chunk.len() * (1 + record.kind.arity()));
        for (frame, value) in chunk {
            args.push(frame_arg(*frame));
            push_value(&mut args, value);
        }
        out.push(OscMessage {
            addr: addrs.setdown(&record.name, &n.to_string()),
            args,
        });
    }
    out
}

/// `begin` + numbered chunks for the camera setters.
///
/// Each sample goes out as `frame, position.xyz, orientation.xyz, zoom`.
pub fn camera_setter_messages(
    addrs: &Addresses,
    samples: &[(FrameIndex, CameraSample)],
    output_height: u32,
) -> Vec<OscMessage> {
    let chunks = chunk_count(samples.len(), MAX_CAMERA_SAMPLES);

    let mut out = Vec::with_capacity(chunks + 1);
    out.push(begin_message(addrs, CAMERA_SETDOWN_NAME, "camera", chunks));
    for (n, chunk) in samples.chunks(MAX_CAMERA_SAMPLES).enumerate() {
        let mut args = Vec::with_capacity(chunk.len() * 8);
        for (frame, sample) in chunk {
            let host = encode_camera(sample.fov_degrees, &sample.matrix, output_height);
            args.push(frame_arg(*frame));
            args.extend(
                [
                    host.position.x,
                    host.position.y,
                    host.position.z,
                    host.orientation.x,
                    host.orientation.y,
                    host.orientation.z,
                    host.zoom,
                ]
                .map(OscType::Float),
            );
        }
        out.push(OscMessage {
            addr: addrs.setdown(CAMERA_SETDOWN_NAME, &n.to_string()),
            args,
        });
    }
    out
}

/// Full setdown stream: camera setters first (when any), then parameter setters in id order.
pub fn setdown_messages(
    addrs: &Addresses,
    store: &ParameterStore,
    output_height: u32,
) -> Vec<OscMessage> {
    let mut out = Vec::new();
    let camera = store.sorted_camera_setters();
    if !camera.is_empty() {
        out.extend(camera_setter_messages(addrs, &camera, output_height));
    }
    for record in store.setters() {
        out.extend(setter_messages(addrs, record));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/batch.rs"]
mod tests;
