//! Boundary with the external renderer: pixel buffers, callbacks and the per-frame context
//! handed to them.

pub(crate) mod backend;
pub(crate) mod context;
