use std::path::PathBuf;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::protocol::codec::ConfigureRequest;

/// `$HOME`, or the working directory when it is unset.
pub(crate) fn home_dir_or_cwd() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Lifecycle state of the single session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Before parameter registration has completed.
    Uninitialized,
    /// Accepting configuration and timeline data.
    Setup,
    /// Rendering one frame per tick.
    Render,
    /// Draining image writes and handing setters back.
    Setdown,
}

/// Target the renderer should draw into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSpec {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Draw into an offscreen buffer instead of the window.
    pub offscreen: bool,
}

/// Host-controlled session settings, updated by `setup` messages.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    /// Directory frames are written to.
    pub output_dir: PathBuf,
    /// File stem of written frames.
    pub file_stem: String,
    /// Image extension (selects the encoder).
    pub image_ext: String,
    /// Host caches timelines between sessions.
    pub cache: bool,
    /// Write frames to disk.
    pub write: bool,
    /// Offscreen rendering requested (effective only with `write`).
    pub offscreen: bool,
    /// Frame rate.
    pub fps: Fps,
    /// Number of frames in the session, at least 1.
    pub duration: u32,
    /// Output size.
    pub canvas: Canvas,
    /// Originating source media path on the host.
    pub source_path: String,
    /// Originating source media timestamp in seconds.
    pub source_time: f32,
}

impl SessionSettings {
    /// Defaults before the host has configured anything.
    pub fn new(output_dir: impl Into<PathBuf>, file_stem: impl Into<String>, image_ext: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_stem: file_stem.into(),
            image_ext: image_ext.into(),
            cache: false,
            write: false,
            offscreen: false,
            fps: Fps::default(),
            duration: 1,
            canvas: Canvas::default(),
            source_path: String::new(),
            source_time: 0.0,
        }
    }

    /// Merge a `setup` payload; non-positive numbers and empty strings keep current values.
    pub fn apply(&mut self, req: &ConfigureRequest) {
        if !req.path.is_empty() {
            self.output_dir = PathBuf::from(&req.path);
        }
        if !req.file_name.is_empty() {
            self.file_stem = req.file_name.clone();
        }
        self.cache = req.cache;
        self.write = req.write;
        self.offscreen = req.offscreen;
        if let Ok(fps) = Fps::new(req.fps) {
            self.fps = fps;
        }
        if req.duration > 0 {
            self.duration = req.duration as u32;
        }
        if req.width > 0 && req.height > 0 {
            self.canvas = Canvas {
                width: req.width as u32,
                height: req.height as u32,
            };
        }
        if !req.source_path.is_empty() {
            self.source_path = req.source_path.clone();
            self.source_time = req.source_time;
        }
    }

    /// Offscreen buffer is only used when frames are also written.
    pub fn uses_offscreen(&self) -> bool {
        self.offscreen && self.write
    }

    /// Surface the renderer should target.
    pub fn surface(&self) -> SurfaceSpec {
        SurfaceSpec {
            canvas: self.canvas,
            offscreen: self.uses_offscreen(),
        }
    }

    /// `<output_dir>/<file_stem>_<frame:05>.<ext>`.
    pub fn frame_path(&self, frame: FrameIndex) -> PathBuf {
        self.output_dir
            .join(format!("{}_{:05}.{}", self.file_stem, frame.0, self.image_ext))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
