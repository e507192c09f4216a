//! Session lifecycle: `Uninitialized -> Setup -> Render -> Setdown -> Setup ...`.

pub(crate) mod controller;
pub(crate) mod state;
pub(crate) mod tween;
