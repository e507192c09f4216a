use glam::Vec2;

use crate::foundation::error::BridgeResult;
use crate::render::context::{FrameContext, ParamRegistry};

/// A rendered frame as RGBA8 pixels.
///
/// Rows are stored bottom-to-top, the order a GL framebuffer read-back produces. The write
/// pipeline flips them before encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    /// Reverse the row order in place.
    pub fn flip_vertical(&mut self) {
        let stride = self.width as usize * 4;
        if stride == 0 {
            return;
        }
        let rows = self.data.len() / stride;
        for y in 0..rows / 2 {
            let (top, bottom) = self.data.split_at_mut((rows - 1 - y) * stride);
            top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
    }
}

/// Pointer input forwarded to the renderer while rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Down(Vec2),
    /// Button released.
    Up(Vec2),
    /// Pointer moved with no button held.
    Move(Vec2),
    /// Pointer moved with a button held.
    Drag(Vec2),
    /// Wheel scrolled.
    Wheel {
        /// Pointer position.
        position: Vec2,
        /// Scroll amount.
        delta: f32,
    },
}

/// Callbacks the session drives.
///
/// An `Err` from any callback is fatal to the session loop.
pub trait Renderer {
    /// Register parameters (and optionally request the camera). Called once at start-up.
    fn init(&mut self, params: &mut ParamRegistry<'_>) -> BridgeResult<()>;

    /// Called once when rendering begins, after timelines are complete.
    fn setup(&mut self, _ctx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }

    /// Per-frame update, after the tween clock has advanced.
    fn update(&mut self, _ctx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }

    /// Per-frame draw; returns the captured surface.
    fn draw(&mut self, ctx: &mut FrameContext<'_>) -> BridgeResult<FrameRGBA>;

    /// Pointer input, only delivered while rendering.
    fn pointer(&mut self, _event: PointerEvent, _ctx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
