use std::collections::HashMap;

use crate::camera::{CAMERA_PARAM_NAME, CAMERA_SETDOWN_NAME};
use crate::camera::codec::CameraSample;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::params::value::{ParamKind, ParamValue};

/// A registered parameter and its per-frame timeline.
#[derive(Clone, Debug)]
pub struct Parameter {
    /// Registration order, also the wire id order.
    pub id: u32,
    /// Unique name.
    pub name: String,
    /// Type tag shared by the initial value and every timeline entry.
    pub kind: ParamKind,
    /// Default reported to the host before any session.
    pub initial: ParamValue,
    pub(crate) timeline: Vec<ParamValue>,
}

impl Parameter {
    /// Number of timeline entries received so far.
    pub fn timeline_len(&self) -> usize {
        self.timeline.len()
    }
}

/// Renderer-to-host values for one parameter, baked back at setdown.
#[derive(Clone, Debug)]
pub struct SetterRecord {
    /// Creation order among setter records.
    pub id: u32,
    /// Parameter name on the host.
    pub name: String,
    /// Type of every entry.
    pub kind: ParamKind,
    pub(crate) values: Vec<(FrameIndex, ParamValue)>,
}

impl SetterRecord {
    /// Entries sorted by frame, stable for duplicates so arrival order is kept.
    pub fn sorted_values(&self) -> Vec<(FrameIndex, ParamValue)> {
        let mut v = self.values.clone();
        v.sort_by_key(|(f, _)| *f);
        v
    }
}

/// Parameter registry plus session timelines and setter records.
///
/// Reads are gated: [`ParameterStore::read_value`] is only legal while the session is
/// rendering, which the session controller signals through `set_readable`.
#[derive(Debug)]
pub struct ParameterStore {
    params: Vec<Parameter>,
    by_name: HashMap<String, usize>,

    camera_requested: bool,
    camera_timeline: Vec<CameraSample>,

    setters: Vec<SetterRecord>,
    setters_by_name: HashMap<String, usize>,
    camera_setters: Vec<(FrameIndex, CameraSample)>,

    duration: u32,
    registration_open: bool,
    readable: bool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    /// Create an empty store open for registration, with a session duration of 1.
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            by_name: HashMap::new(),
            camera_requested: false,
            camera_timeline: Vec::new(),
            setters: Vec::new(),
            setters_by_name: HashMap::new(),
            camera_setters: Vec::new(),
            duration: 1,
            registration_open: true,
            readable: false,
        }
    }

    /// Register a parameter. Re-registering an existing name is a no-op.
    pub fn register(&mut self, name: &str, initial: ParamValue) -> BridgeResult<()> {
        if !self.registration_open {
            return Err(BridgeError::defect(format!(
                "parameter '{name}' registered after the session started"
            )));
        }
        if name == CAMERA_PARAM_NAME {
            return Err(BridgeError::defect(format!(
                "'{CAMERA_PARAM_NAME}' is reserved for the camera; use request_camera"
            )));
        }
        if self.by_name.contains_key(name) {
            return Ok(());
        }
        let id = self.params.len() as u32;
        self.by_name.insert(name.to_owned(), self.params.len());
        self.params.push(Parameter {
            id,
            name: name.to_owned(),
            kind: initial.kind(),
            initial,
            timeline: Vec::new(),
        });
        Ok(())
    }

    /// Request a camera timeline from the host.
    pub fn request_camera(&mut self) -> BridgeResult<()> {
        if !self.registration_open {
            return Err(BridgeError::defect(
                "camera requested after the session started",
            ));
        }
        self.camera_requested = true;
        Ok(())
    }

    pub(crate) fn close_registration(&mut self) {
        self.registration_open = false;
    }

    pub(crate) fn set_readable(&mut self, readable: bool) {
        self.readable = readable;
    }

    pub(crate) fn set_duration(&mut self, duration: u32) {
        self.duration = duration.max(1);
    }

    /// Session duration used for clamping and the cache-complete check.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whether a camera timeline was requested.
    pub fn camera_requested(&self) -> bool {
        self.camera_requested
    }

    /// Registered parameters in id order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    /// Look up a registered parameter.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.by_name.get(name).map(|&i| &self.params[i])
    }

    pub(crate) fn timeline_mut(&mut self, name: &str) -> Option<(ParamKind, &mut Vec<ParamValue>)> {
        let &i = self.by_name.get(name)?;
        let p = &mut self.params[i];
        Some((p.kind, &mut p.timeline))
    }

    pub(crate) fn camera_timeline_mut(&mut self) -> Option<&mut Vec<CameraSample>> {
        self.camera_requested.then_some(&mut self.camera_timeline)
    }

    /// Timeline value of `name` at `frame`, clamped to `[0, duration - 1]`.
    pub fn read_value(&self, name: &str, frame: FrameIndex) -> BridgeResult<ParamValue> {
        if !self.readable {
            return Err(BridgeError::defect(format!(
                "parameter '{name}' read outside of rendering"
            )));
        }
        let p = self
            .parameter(name)
            .ok_or_else(|| BridgeError::defect(format!("unknown parameter '{name}'")))?;
        let f = frame.clamp_to(self.duration);
        p.timeline.get(f.0 as usize).copied().ok_or_else(|| {
            BridgeError::defect(format!("timeline of '{name}' has no frame {}", f.0))
        })
    }

    /// Camera timeline sample at `frame`, clamped to `[0, duration - 1]`.
    pub fn read_camera_value(&self, frame: FrameIndex) -> BridgeResult<CameraSample> {
        if !self.readable {
            return Err(BridgeError::defect("camera read outside of rendering"));
        }
        if !self.camera_requested {
            return Err(BridgeError::defect("camera read but no camera was requested"));
        }
        let f = frame.clamp_to(self.duration);
        self.camera_timeline
            .get(f.0 as usize)
            .copied()
            .ok_or_else(|| BridgeError::defect(format!("camera timeline has no frame {}", f.0)))
    }

    /// Record a value to bake back to the host.
    ///
    /// Records are created lazily in first-write order. Several writes for the same frame are
    /// all kept.
    pub fn writeback(&mut self, name: &str, value: ParamValue, frame: FrameIndex) -> BridgeResult<()> {
        if name == CAMERA_PARAM_NAME || name == CAMERA_SETDOWN_NAME {
            return Err(BridgeError::defect(format!(
                "'{name}' is reserved for the camera; use set_camera"
            )));
        }
        if i32::try_from(frame.0).is_err() {
            return Err(BridgeError::defect(format!(
                "setter '{name}' frame {} does not fit the wire's int32",
                frame.0
            )));
        }
        let idx = match self.setters_by_name.get(name) {
            Some(&i) => i,
            None => {
                let i = self.setters.len();
                self.setters.push(SetterRecord {
                    id: i as u32,
                    name: name.to_owned(),
                    kind: value.kind(),
                    values: Vec::new(),
                });
                self.setters_by_name.insert(name.to_owned(), i);
                i
            }
        };
        let rec = &mut self.setters[idx];
        if rec.kind != value.kind() {
            return Err(BridgeError::defect(format!(
                "setter '{name}' is {} but got a {} value",
                rec.kind.wire_name(),
                value.kind().wire_name()
            )));
        }
        rec.values.push((frame, value));
        Ok(())
    }

    /// Record a renderer camera (fov + view-inverse) to bake back to the host.
    pub fn writeback_camera(&mut self, sample: CameraSample, frame: FrameIndex) {
        self.camera_setters.push((frame, sample));
    }

    /// Setter records in id order.
    pub fn setters(&self) -> &[SetterRecord] {
        &self.setters
    }

    /// Camera setters sorted by frame.
    pub fn sorted_camera_setters(&self) -> Vec<(FrameIndex, CameraSample)> {
        let mut v = self.camera_setters.clone();
        v.sort_by_key(|(f, _)| *f);
        v
    }

    pub(crate) fn clear_setters(&mut self) {
        self.setters.clear();
        self.setters_by_name.clear();
        self.camera_setters.clear();
    }

    /// `true` iff every timeline (and the camera timeline, if requested) has exactly
    /// `duration` entries.
    pub fn is_cache_complete(&self) -> bool {
        let d = self.duration as usize;
        if self.camera_requested && self.camera_timeline.len() != d {
            return false;
        }
        self.params.iter().all(|p| p.timeline.len() == d)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/store.rs"]
mod tests;
