use glam::{Mat4, Vec2, Vec3};

use crate::camera::codec::{CameraSample, CameraView, decode_camera};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::params::store::ParameterStore;
use crate::params::value::ParamValue;
use crate::session::state::{SessionSettings, SurfaceSpec};
use crate::session::tween::TweenClock;

/// Registration surface handed to [`Renderer::init`](crate::Renderer::init).
///
/// Registration order is the wire id order.
pub struct ParamRegistry<'a> {
    pub(crate) store: &'a mut ParameterStore,
}

impl ParamRegistry<'_> {
    /// Register a parameter with its initial value; the value's type fixes the parameter type.
    pub fn add(&mut self, name: &str, initial: impl Into<ParamValue>) -> BridgeResult<()> {
        self.store.register(name, initial.into())
    }

    /// Ask the host for a camera timeline.
    pub fn add_camera(&mut self) -> BridgeResult<()> {
        self.store.request_camera()
    }
}

/// Per-callback view of the session.
pub struct FrameContext<'a> {
    pub(crate) store: &'a mut ParameterStore,
    pub(crate) tweens: &'a mut TweenClock,
    pub(crate) settings: &'a SessionSettings,
    pub(crate) frame: FrameIndex,
}

fn kind_mismatch(name: &str, want: &str, got: &ParamValue) -> BridgeError {
    BridgeError::defect(format!(
        "parameter '{name}' is a {}, not a {want}",
        got.kind().wire_name()
    ))
}

impl FrameContext<'_> {
    /// Current frame.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Current frame time in seconds.
    pub fn time(&self) -> f64 {
        self.settings.fps.frame_to_secs(self.frame)
    }

    /// Session frame rate.
    pub fn fps(&self) -> Fps {
        self.settings.fps
    }

    /// Session duration in frames.
    pub fn duration(&self) -> u32 {
        self.settings.duration
    }

    /// Surface to draw into.
    pub fn surface(&self) -> SurfaceSpec {
        self.settings.surface()
    }

    /// Source media path of the host layer (may be empty).
    pub fn source_path(&self) -> &str {
        &self.settings.source_path
    }

    /// Source media start time of the host layer.
    pub fn source_time(&self) -> f32 {
        self.settings.source_time
    }

    /// Tween clock, already stepped to [`FrameContext::time`].
    pub fn tweens(&mut self) -> &mut TweenClock {
        &mut *self.tweens
    }

    /// Parameter value at the current frame.
    pub fn value(&self, name: &str) -> BridgeResult<ParamValue> {
        self.store.read_value(name, self.frame)
    }

    /// Parameter value at `frame` (clamped to the session).
    pub fn value_at(&self, name: &str, frame: FrameIndex) -> BridgeResult<ParamValue> {
        self.store.read_value(name, frame)
    }

    /// Checkbox value at the current frame.
    pub fn checkbox(&self, name: &str) -> BridgeResult<bool> {
        let v = self.value(name)?;
        v.as_checkbox().ok_or_else(|| kind_mismatch(name, "checkbox", &v))
    }

    /// Slider value at the current frame.
    pub fn slider(&self, name: &str) -> BridgeResult<f32> {
        let v = self.value(name)?;
        v.as_slider().ok_or_else(|| kind_mismatch(name, "slider", &v))
    }

    /// 2D point at the current frame.
    pub fn point2(&self, name: &str) -> BridgeResult<Vec2> {
        let v = self.value(name)?;
        v.as_point2().ok_or_else(|| kind_mismatch(name, "point", &v))
    }

    /// 3D point at the current frame.
    pub fn point3(&self, name: &str) -> BridgeResult<Vec3> {
        let v = self.value(name)?;
        v.as_point3().ok_or_else(|| kind_mismatch(name, "point3d", &v))
    }

    /// Color at the current frame.
    pub fn color(&self, name: &str) -> BridgeResult<[f32; 3]> {
        let v = self.value(name)?;
        v.as_color().ok_or_else(|| kind_mismatch(name, "color", &v))
    }

    /// Host camera at the current frame, converted to renderer matrices.
    pub fn camera(&self) -> BridgeResult<CameraView> {
        self.camera_at(self.frame)
    }

    /// Host camera at `frame` (clamped to the session).
    pub fn camera_at(&self, frame: FrameIndex) -> BridgeResult<CameraView> {
        Ok(decode_camera(&self.store.read_camera_value(frame)?))
    }

    /// Bake `value` back into parameter `name` at the current frame.
    pub fn set_value(&mut self, name: &str, value: impl Into<ParamValue>) -> BridgeResult<()> {
        self.store.writeback(name, value.into(), self.frame)
    }

    /// Bake `value` back into parameter `name` at `frame`.
    pub fn set_value_at(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
        frame: FrameIndex,
    ) -> BridgeResult<()> {
        self.store.writeback(name, value.into(), frame)
    }

    /// Bake the renderer camera back to the host at the current frame.
    pub fn set_camera(&mut self, fov_degrees: f32, view_inverse: Mat4) {
        self.store.writeback_camera(
            CameraSample {
                fov_degrees,
                matrix: view_inverse,
            },
            self.frame,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
