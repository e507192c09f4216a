use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use rosc::{OscMessage, OscPacket};

use crate::foundation::error::{BridgeError, BridgeResult};

/// Largest UDP payload we accept.
const RECV_BUF_LEN: usize = 65_536;

/// Message transport between the bridge and the host.
///
/// Receipt is polled: [`Transport::drain`] must not block and returns every message that
/// is currently waiting.
pub trait Transport {
    /// Send one message to the host.
    fn send(&mut self, msg: OscMessage) -> BridgeResult<()>;
    /// Take all currently waiting inbound messages.
    fn drain(&mut self) -> BridgeResult<Vec<OscMessage>>;
}

/// OSC over UDP: listens on one port, replies to a fixed peer.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    buf: Vec<u8>,
}

impl UdpTransport {
    /// Bind `listen` (non-blocking) and send replies to `peer`.
    pub fn bind(listen: SocketAddr, peer: SocketAddr) -> BridgeResult<Self> {
        let socket = UdpSocket::bind(listen)
            .map_err(|e| BridgeError::transport(format!("bind {listen}: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| BridgeError::transport(format!("set_nonblocking: {e}")))?;
        tracing::info!(%listen, %peer, "udp transport ready");
        Ok(Self {
            socket,
            peer,
            buf: vec![0u8; RECV_BUF_LEN],
        })
    }

    /// Local address the socket is bound to.
    pub fn local_addr(&self) -> BridgeResult<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| BridgeError::transport(e.to_string()))
    }
}

fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(m) => out.push(m),
        OscPacket::Bundle(b) => {
            for p in b.content {
                flatten(p, out);
            }
        }
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, msg: OscMessage) -> BridgeResult<()> {
        let bytes = rosc::encoder::encode(&OscPacket::Message(msg))
            .map_err(|e| BridgeError::transport(format!("encode: {e}")))?;
        self.socket
            .send_to(&bytes, self.peer)
            .map_err(|e| BridgeError::transport(format!("send to {}: {e}", self.peer)))?;
        Ok(())
    }

    fn drain(&mut self) -> BridgeResult<Vec<OscMessage>> {
        let mut out = Vec::new();
        loop {
            match self.socket.recv_from(&mut self.buf) {
                Ok((n, from)) => match rosc::decoder::decode_udp(&self.buf[..n]) {
                    Ok((_, packet)) => flatten(packet, &mut out),
                    Err(e) => tracing::debug!(%from, "dropping undecodable packet: {e}"),
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                // Windows reports ICMP port-unreachable from an earlier send here.
                Err(e) if e.kind() == ErrorKind::ConnectionReset => continue,
                Err(e) => return Err(BridgeError::transport(format!("recv: {e}"))),
            }
        }
        Ok(out)
    }
}

/// In-process transport used by tests and embedding code.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    inbox: VecDeque<OscMessage>,
    sent: Vec<OscMessage>,
}

impl LoopbackTransport {
    /// Create an empty loopback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message as if the host had sent it.
    pub fn push_inbound(&mut self, msg: OscMessage) {
        self.inbox.push_back(msg);
    }

    /// Messages sent so far.
    pub fn sent(&self) -> &[OscMessage] {
        &self.sent
    }

    /// Take and clear the messages sent so far.
    pub fn take_sent(&mut self) -> Vec<OscMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, msg: OscMessage) -> BridgeResult<()> {
        self.sent.push(msg);
        Ok(())
    }

    fn drain(&mut self) -> BridgeResult<Vec<OscMessage>> {
        Ok(self.inbox.drain(..).collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/transport.rs"]
mod tests;
