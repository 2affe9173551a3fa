//! Collaborator traits
//!
//! The board crate never touches a socket. Encoded packets leave through a
//! `PacketSink` and the protocol era of a connection comes from an
//! `EraDetector`; the host wires both to its own transport.

use bytes::Bytes;
use scorebar_core::ProtocolEra;

/// Ordered, fire-and-forget byte sink for one viewer's connection.
///
/// `send` must preserve call order per viewer; delivery failures are the
/// host's concern and are never reported back.
pub trait PacketSink: Send + Sync {
    fn send(&self, packet: Bytes);
}

/// Reports the protocol era in effect. Consulted once at service
/// construction; the era never changes afterwards.
pub trait EraDetector {
    fn detect(&self) -> ProtocolEra;
}

impl<F: Fn(Bytes) + Send + Sync> PacketSink for F {
    fn send(&self, packet: Bytes) {
        self(packet)
    }
}
