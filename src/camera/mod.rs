//! Camera samples exchanged with the host and the codec between the host's
//! position/orientation/zoom encoding and the renderer's matrices.

pub(crate) mod codec;

/// Reserved parameter name carrying camera timelines in `prerender` messages.
pub const CAMERA_PARAM_NAME: &str = "CameraAE";

/// Address segment used when baking camera setters back to the host.
pub(crate) const CAMERA_SETDOWN_NAME: &str = "cameraAE";
