//! OSC wire protocol: inbound command routing, scalar packing, outbound setter batching
//! and the transports that carry it.

pub(crate) mod address;
pub(crate) mod batch;
pub(crate) mod codec;
pub(crate) mod ingest;
pub(crate) mod transport;
