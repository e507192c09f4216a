use rosc::{OscMessage, OscType};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::ProtocolError;
use crate::protocol::codec::{ConfigureRequest, parse_configure};

/// Default first address segment shared by every message of the protocol.
pub const DEFAULT_NAMESPACE: &str = "cinder";

/// Position of a `prerender` message within a batch sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchMarker {
    /// Clears the partially received timeline before appending.
    Begin,
    /// Any token other than `begin`/`last`; appends only.
    Intermediate(String),
    /// Appends, then checks the total length against the session duration.
    Last,
}

impl BatchMarker {
    fn parse(token: &str) -> Self {
        match token {
            "begin" => Self::Begin,
            "last" => Self::Last,
            other => Self::Intermediate(other.to_owned()),
        }
    }
}

/// Timeline batch for one parameter (or the camera).
#[derive(Clone, Debug, PartialEq)]
pub struct PrerenderRequest {
    /// Parameter name, or the reserved camera name.
    pub target: String,
    /// Position of this batch in the sequence.
    pub marker: BatchMarker,
    /// Flat scalar payload.
    pub args: Vec<OscType>,
}

/// Inbound command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Session settings; always answered with the parameter listing.
    Configure(ConfigureRequest),
    /// Timeline data batch.
    Prerender(PrerenderRequest),
    /// Start rendering.
    RenderBegin,
    /// Stop rendering and hand results back.
    Quit,
}

/// Route an inbound message.
///
/// `Ok(None)` means the message does not belong to this protocol and must be ignored
/// silently. `Err` must be answered on the message's own address.
pub fn parse_command(namespace: &str, msg: &OscMessage) -> Result<Option<Command>, ProtocolError> {
    let segments: Vec<&str> = msg.addr.split('/').skip(1).collect();
    if segments.len() < 2 || segments[0] != namespace {
        return Ok(None);
    }

    match segments[1] {
        "setup" => Ok(Some(Command::Configure(parse_configure(&msg.args)?))),
        "prerender" => {
            if segments.len() < 4 {
                return Err(ProtocolError::InvalidAddress);
            }
            Ok(Some(Command::Prerender(PrerenderRequest {
                target: segments[2].to_owned(),
                marker: BatchMarker::parse(segments[3]),
                args: msg.args.clone(),
            })))
        }
        "render" => Ok(Some(Command::RenderBegin)),
        "quit" => Ok(Some(Command::Quit)),
        _ => Ok(None),
    }
}

/// Outbound address builder for one namespace.
#[derive(Clone, Debug)]
pub struct Addresses {
    ns: String,
}

impl Addresses {
    /// Builder for `/<namespace>/...` addresses.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            ns: namespace.into(),
        }
    }

    /// Namespace segment.
    pub fn namespace(&self) -> &str {
        &self.ns
    }

    /// Per-frame render acknowledgement.
    pub fn render_ack(&self, frame: FrameIndex) -> String {
        format!("/{}/render/{}", self.ns, frame.0)
    }

    /// Drain heartbeat while images are still being written.
    pub fn write_heartbeat(&self) -> String {
        format!("/{}/render/write", self.ns)
    }

    /// Final message of a session.
    pub fn render_end(&self) -> String {
        format!("/{}/renderend", self.ns)
    }

    /// Setter stream address: `/<ns>/setdown/<name>/<segment>`.
    pub fn setdown(&self, name: &str, segment: &str) -> String {
        format!("/{}/setdown/{}/{}", self.ns, name, segment)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/address.rs"]
mod tests;
