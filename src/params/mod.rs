//! Named, typed parameters: initial values, per-frame timelines supplied by the host, and
//! setter records baked back after rendering.

pub(crate) mod store;
pub(crate) mod value;
