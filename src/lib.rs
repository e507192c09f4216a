//! Lockstep drives an interactive renderer frame by frame on behalf of an external host.
//!
//! The host owns timing, parameter values and the fate of the rendered images; the two sides
//! talk OSC over UDP. A session runs `Setup -> Render -> Setdown -> Setup`:
//!
//! - Implement [`Renderer`] and register parameters in [`Renderer::init`]
//! - Create a [`SessionController`] over a [`Transport`] and an [`ImageSink`]
//! - Call [`SessionController::tick`] once per frame (or [`SessionController::run`])
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod camera;
/// Process configuration.
pub mod config;
pub mod encode;
pub(crate) mod params;
pub(crate) mod protocol;
pub(crate) mod render;
pub(crate) mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{BridgeError, BridgeResult, ProtocolError};

pub use crate::camera::CAMERA_PARAM_NAME;
pub use crate::camera::codec::{
    CameraSample, CameraView, HostCamera, decode_camera, encode_camera, fov_from_zoom,
    zoom_for_fov,
};
pub use crate::config::BridgeConfig;
pub use crate::encode::sink::{FileImageSink, ImageSink, InMemoryImageSink, check_image_ext};
pub use crate::encode::writer::{ImageJob, ImageWritePipeline, WriterOpts};
pub use crate::params::store::{Parameter, ParameterStore, SetterRecord};
pub use crate::params::value::{ParamKind, ParamValue};
pub use crate::protocol::address::{
    Addresses, BatchMarker, Command, DEFAULT_NAMESPACE, PrerenderRequest, parse_command,
};
pub use crate::protocol::batch::{MAX_CAMERA_SAMPLES, MAX_SETTER_GROUPS, setdown_messages};
pub use crate::protocol::codec::ConfigureRequest;
pub use crate::protocol::transport::{LoopbackTransport, Transport, UdpTransport};
pub use crate::render::backend::{FrameRGBA, PointerEvent, Renderer};
pub use crate::render::context::{FrameContext, ParamRegistry};
pub use crate::session::controller::{ControllerOpts, MIN_DRAIN_INTERVAL, SessionController};
pub use crate::session::state::{SessionSettings, SessionState, SurfaceSpec};
pub use crate::session::tween::{Ease, TweenClock, TweenId};

/// OSC types used on the wire, re-exported for embedding code and tests.
pub use rosc::{OscMessage, OscType};
