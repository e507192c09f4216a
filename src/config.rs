use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::encode::sink::check_image_ext;
use crate::encode::writer::{DEFAULT_QUEUE_CAPACITY, WriterOpts};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::protocol::address::DEFAULT_NAMESPACE;
use crate::session::controller::{ControllerOpts, MIN_DRAIN_INTERVAL};
use crate::session::state::home_dir_or_cwd;

/// Process-level settings for the bridge.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// UDP port host commands arrive on.
    pub inbound_port: u16,
    /// Host address replies are sent to.
    pub outbound_host: IpAddr,
    /// UDP port replies are sent to.
    pub outbound_port: u16,
    /// First address segment of every message.
    pub namespace: String,
    /// Output directory until the host configures one.
    pub output_dir: PathBuf,
    /// Output file stem until the host configures one.
    pub file_stem: String,
    /// Image file extension (selects the encoder).
    pub image_ext: String,
    /// Frames queued before rendering blocks on disk I/O.
    pub queue_capacity: usize,
    /// Convert premultiplied frames to straight alpha before writing.
    pub unpremultiply: bool,
    /// Heartbeat interval while draining image writes.
    pub drain_interval_ms: u64,
    /// Pause between the renderer's setup callback and the first frame.
    pub settle_delay_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            inbound_port: 3000,
            outbound_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            outbound_port: 3001,
            namespace: DEFAULT_NAMESPACE.to_owned(),
            output_dir: home_dir_or_cwd(),
            file_stem: "render".to_owned(),
            image_ext: "png".to_owned(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            unpremultiply: false,
            drain_interval_ms: 1000,
            settle_delay_ms: 500,
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the bridge cannot run with.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.namespace.is_empty() || self.namespace.contains('/') {
            return Err(BridgeError::validation(
                "namespace must be a single non-empty address segment",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(BridgeError::validation("queue_capacity must be > 0"));
        }
        check_image_ext(&self.image_ext)?;
        if Duration::from_millis(self.drain_interval_ms) < MIN_DRAIN_INTERVAL {
            return Err(BridgeError::validation(format!(
                "drain_interval_ms must be >= {}",
                MIN_DRAIN_INTERVAL.as_millis()
            )));
        }
        if self.inbound_port == 0 {
            return Err(BridgeError::validation("inbound_port must be > 0"));
        }
        Ok(())
    }

    /// Address to listen on for host commands.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.inbound_port)
    }

    /// Address replies are sent to.
    pub fn peer_addr(&self) -> SocketAddr {
        SocketAddr::new(self.outbound_host, self.outbound_port)
    }

    /// Session controller options derived from this config.
    pub fn controller_opts(&self) -> ControllerOpts {
        ControllerOpts {
            namespace: self.namespace.clone(),
            writer: WriterOpts {
                capacity: self.queue_capacity,
                unpremultiply: self.unpremultiply,
            },
            drain_interval: Duration::from_millis(self.drain_interval_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            executable_path: None,
            output_dir: self.output_dir.clone(),
            file_stem: self.file_stem.clone(),
            image_ext: self.image_ext.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
