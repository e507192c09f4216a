use crate::camera::CAMERA_PARAM_NAME;
use crate::foundation::error::ProtocolError;
use crate::params::store::ParameterStore;
use crate::protocol::address::{BatchMarker, PrerenderRequest};
use crate::protocol::codec::{decode_camera_samples, decode_values};

/// Apply one `prerender` batch to the store.
///
/// `begin` clears the target timeline before appending. `last` checks the total against the
/// session duration; on mismatch the timeline is cleared. A payload that does not decode
/// leaves the store untouched.
pub fn apply_prerender(store: &mut ParameterStore, req: &PrerenderRequest) -> Result<(), ProtocolError> {
    let duration = store.duration() as usize;

    if req.target == CAMERA_PARAM_NAME && store.camera_requested() {
        let samples = decode_camera_samples(&req.args)?;
        let Some(timeline) = store.camera_timeline_mut() else {
            return Err(ProtocolError::UnknownParameter);
        };
        return append_batch(timeline, samples, &req.marker, duration);
    }

    let Some((kind, timeline)) = store.timeline_mut(&req.target) else {
        return Err(ProtocolError::UnknownParameter);
    };
    let values = decode_values(kind, &req.args)?;
    append_batch(timeline, values, &req.marker, duration)
}

fn append_batch<T>(
    timeline: &mut Vec<T>,
    values: Vec<T>,
    marker: &BatchMarker,
    duration: usize,
) -> Result<(), ProtocolError> {
    if *marker == BatchMarker::Begin {
        timeline.clear();
    }
    timeline.extend(values);
    if *marker == BatchMarker::Last && timeline.len() != duration {
        timeline.clear();
        return Err(ProtocolError::InvalidArgSize);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/ingest.rs"]
mod tests;
