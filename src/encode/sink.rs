use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context as _;

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::render::backend::FrameRGBA;

/// Destination for finished frames. Called from the writer thread only.
pub trait ImageSink: Send {
    /// Persist `frame` (top-to-bottom rows) at `path`.
    fn write(&mut self, path: &Path, frame: &FrameRGBA) -> BridgeResult<()>;
}

/// Writes frames as image files; the format follows the path extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageSink;

impl FileImageSink {
    /// Create a file sink.
    pub fn new() -> Self {
        Self
    }
}

impl ImageSink for FileImageSink {
    fn write(&mut self, path: &Path, frame: &FrameRGBA) -> BridgeResult<()> {
        let expected = (frame.width as usize) * (frame.height as usize) * 4;
        if frame.data.len() != expected {
            return Err(BridgeError::validation(format!(
                "frame buffer is {} bytes, expected {expected} for {}x{}",
                frame.data.len(),
                frame.width,
                frame.height
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer(
            path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("write image '{}'", path.display()))?;
        Ok(())
    }
}

/// Check that `ext` names a format the file sink can encode RGBA8 frames as.
///
/// Write failures are swallowed by the pipeline, so an unusable extension has to be caught
/// before a session starts.
pub fn check_image_ext(ext: &str) -> BridgeResult<()> {
    let Some(format) = image::ImageFormat::from_extension(ext) else {
        return Err(BridgeError::validation(format!(
            "image_ext '{ext}' is not a known image format"
        )));
    };
    if !format.writing_enabled() {
        return Err(BridgeError::validation(format!(
            "image_ext '{ext}' cannot be written"
        )));
    }
    image::write_buffer_with_format(
        &mut Cursor::new(Vec::new()),
        &[0u8; 4],
        1,
        1,
        image::ColorType::Rgba8,
        format,
    )
    .map_err(|e| BridgeError::validation(format!("image_ext '{ext}' cannot hold RGBA8: {e}")))
}

/// Keeps written frames in memory; clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct InMemoryImageSink {
    frames: Arc<Mutex<Vec<(PathBuf, FrameRGBA)>>>,
}

impl InMemoryImageSink {
    /// Create an empty in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the frames written so far, in write order.
    pub fn frames(&self) -> Vec<(PathBuf, FrameRGBA)> {
        self.frames
            .lock()
            .map(|g| g.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ImageSink for InMemoryImageSink {
    fn write(&mut self, path: &Path, frame: &FrameRGBA) -> BridgeResult<()> {
        let mut g = self
            .frames
            .lock()
            .map_err(|_| BridgeError::validation("in-memory sink lock poisoned"))?;
        g.push((path.to_path_buf(), frame.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
