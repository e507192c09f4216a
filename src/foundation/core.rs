use crate::foundation::error::{BridgeError, BridgeResult};

/// Absolute 0-based frame index in session timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Clamp into `[0, duration - 1]`.
    ///
    /// A zero duration clamps to frame 0.
    pub fn clamp_to(self, duration: u32) -> Self {
        Self(self.0.min(duration.saturating_sub(1)))
    }
}

/// Frames-per-second as sent by the host (fractional rates such as 29.97 are common).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fps(f32);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: f32) -> BridgeResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(BridgeError::validation("fps must be finite and > 0"));
        }
        Ok(Self(fps))
    }

    /// Raw frames-per-second value.
    pub fn as_f32(self) -> f32 {
        self.0
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / f64::from(self.0)
    }

    /// Convert a frame index to seconds.
    pub fn frame_to_secs(self, frame: FrameIndex) -> f64 {
        f64::from(frame.0) * self.frame_duration_secs()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(30.0)
    }
}

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> BridgeResult<Self> {
        if width == 0 || height == 0 {
            return Err(BridgeError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
