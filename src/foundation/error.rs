/// Result alias used throughout the crate.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Crate-level error.
///
/// `Defect` marks programming errors (calling a query in the wrong session state, registering
/// the reserved camera name, ...). The session loop treats them as fatal.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    /// Invalid user-provided value.
    #[error("validation error: {0}")]
    Validation(String),

    /// Misuse of the API by the renderer or embedding code.
    #[error("configuration defect: {0}")]
    Defect(String),

    /// Recoverable wire-protocol error (reported back to the host).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The image write pipeline has been shut down.
    #[error("image write pipeline is closed")]
    PipelineClosed,

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    /// Build a [`BridgeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BridgeError::Defect`].
    pub fn defect(msg: impl Into<String>) -> Self {
        Self::Defect(msg.into())
    }

    /// Build a [`BridgeError::Transport`].
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Errors reported to the host as the string argument of a reply.
///
/// The `Display` strings are part of the wire contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Address has too few segments for its command family.
    #[error("invalid address")]
    InvalidAddress,
    /// Prerender target is neither a registered parameter nor the requested camera.
    #[error("cannot find a parameter name")]
    UnknownParameter,
    /// Argument count does not match the expected arity or the session duration.
    #[error("invalid arg size")]
    InvalidArgSize,
    /// Argument has the wrong scalar type.
    #[error("invalid arg type")]
    InvalidArgType,
    /// Render requested before every timeline is complete.
    #[error("parameters are not cached")]
    NotCached,
    /// Configure received while rendering.
    #[error("cannot configure while rendering")]
    ConfigureWhileRendering,
    /// Prerender data received while rendering.
    #[error("cannot prerender while rendering")]
    PrerenderWhileRendering,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
