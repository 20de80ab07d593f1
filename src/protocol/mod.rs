//! Framed binary protocol spoken with the mining device
//!
//! Frame boundary detection happens upstream in the transport layer; every
//! function here takes one complete frame, delimited by the preamble and
//! finalizer markers, and either decodes it into a typed packet or fails
//! with an error naming the check that broke.

pub mod frame;
mod rx;
mod tx;

pub use rx::{DeviceInfoPacket, JobResultPacket, NoncePacket, StatusPacket};
pub use tx::{DeviceInfoQueryPacket, DeviceParams, JobPacket, ParamsAction, ParamsPacket, RestartPacket};

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One decoded packet of the device protocol.
///
/// The variant set is closed; dispatch matches it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Device status report
    Status(StatusPacket),
    /// Nonce candidate from the device
    Nonce(NoncePacket),
    /// Job acknowledgement from the device
    JobResult(JobResultPacket),
    /// Device identification report
    DeviceInfo(DeviceInfoPacket),
    /// Job dispatch to the device
    Job(JobPacket),
    /// Parameter query or set request
    Params(ParamsPacket),
    /// Device-info query
    DeviceInfoQuery(DeviceInfoQueryPacket),
    /// Device restart command
    Restart(RestartPacket),
}

impl Packet {
    /// The wire type tag of this packet
    pub fn tag(&self) -> u8 {
        match self {
            Packet::Status(_) => StatusPacket::TYPE,
            Packet::Nonce(_) => NoncePacket::TYPE,
            Packet::JobResult(_) => JobResultPacket::TYPE,
            Packet::DeviceInfo(_) => DeviceInfoPacket::TYPE,
            Packet::Job(_) => JobPacket::TYPE,
            Packet::Params(_) => ParamsPacket::TYPE,
            Packet::DeviceInfoQuery(_) => DeviceInfoQueryPacket::TYPE,
            Packet::Restart(_) => RestartPacket::TYPE,
        }
    }
}

type PacketDecoder = fn(&[u8]) -> Result<Packet>;

/// Registry mapping type tags to decoders.
///
/// Built once before first use and read-only afterwards; safe for
/// concurrent lookup.
static DECODERS: Lazy<HashMap<u8, PacketDecoder>> = Lazy::new(|| {
    let mut registry: HashMap<u8, PacketDecoder> = HashMap::new();
    registry.insert(StatusPacket::TYPE, |f| {
        StatusPacket::decode(f).map(Packet::Status)
    });
    registry.insert(NoncePacket::TYPE, |f| {
        NoncePacket::decode(f).map(Packet::Nonce)
    });
    registry.insert(JobResultPacket::TYPE, |f| {
        JobResultPacket::decode(f).map(Packet::JobResult)
    });
    registry.insert(DeviceInfoPacket::TYPE, |f| {
        DeviceInfoPacket::decode(f).map(Packet::DeviceInfo)
    });
    registry.insert(JobPacket::TYPE, |f| JobPacket::decode(f).map(Packet::Job));
    registry.insert(ParamsPacket::TYPE, |f| {
        ParamsPacket::decode(f).map(Packet::Params)
    });
    registry.insert(DeviceInfoQueryPacket::TYPE, |f| {
        DeviceInfoQueryPacket::decode(f).map(Packet::DeviceInfoQuery)
    });
    registry.insert(RestartPacket::TYPE, |f| {
        RestartPacket::decode(f).map(Packet::Restart)
    });
    registry
});

/// Decode an arbitrary complete frame by its type tag.
///
/// The type byte at the fixed frame offset selects the decoder; a tag
/// absent from the registry yields an unknown-type error carrying the
/// offending byte and the raw frame for diagnostics.
pub fn dispatch(frame_bytes: &[u8]) -> Result<Packet> {
    if frame_bytes.len() <= frame::TYPE_OFFSET {
        return Err(Error::TruncatedFrame {
            expected: frame::ENVELOPE_SIZE,
            actual: frame_bytes.len(),
        });
    }

    let tag = frame_bytes[frame::TYPE_OFFSET];
    let decoder = DECODERS.get(&tag).ok_or_else(|| Error::UnknownPacketType {
        tag,
        frame: frame_bytes.to_vec(),
    })?;

    tracing::trace!(tag, len = frame_bytes.len(), "dispatching frame");
    decoder(frame_bytes)
}
