//! Protocol registry
//!
//! Maps packet kinds to the numeric packet ids of a live connection. Ids
//! vary by protocol version, so they come from a caller-supplied source at
//! build time. A built registry is immutable, lookups never synchronize.

use std::collections::HashMap;

use bytes::Bytes;
use scorebar_core::{ProtocolEra, ScorebarError, ScorebarResult};
use tracing::debug;

use crate::codec::{codec_for, ComponentCodec};
use crate::packets::{
    AnyPacket, DisplayObjectivePacket, ObjectivePacket, Packet, PacketKind, ResetScorePacket,
    ScorePacket, TeamPacket,
};
use crate::serializer::{PacketReader, PacketWriter};

/// Supplies the version-specific numeric id for each packet kind.
pub trait PacketIdSource {
    fn packet_id(&self, kind: PacketKind) -> ScorebarResult<i32>;
}

/// Immutable id↔kind table for one era, plus the era's codec.
pub struct ProtocolRegistry {
    era: ProtocolEra,
    codec: &'static dyn ComponentCodec,
    by_kind: HashMap<PacketKind, i32>,
    by_id: HashMap<i32, PacketKind>,
}

impl ProtocolRegistry {
    /// Registers every kind the era supports. Two kinds mapped to one id is
    /// a caller bug and fails the build.
    pub fn build(era: ProtocolEra, ids: &dyn PacketIdSource) -> ScorebarResult<Self> {
        let mut kinds = vec![
            PacketKind::DisplayObjective,
            PacketKind::Objective,
            PacketKind::Team,
            PacketKind::Score,
        ];
        if era.has_reset_score() {
            kinds.push(PacketKind::ResetScore);
        }

        let mut by_kind = HashMap::new();
        let mut by_id = HashMap::new();
        for kind in kinds {
            let id = ids.packet_id(kind)?;
            if by_id.insert(id, kind).is_some() {
                return Err(ScorebarError::DuplicatePacketId(id));
            }
            by_kind.insert(kind, id);
        }

        debug!(?era, kinds = by_kind.len(), "protocol registry built");
        Ok(ProtocolRegistry {
            era,
            codec: codec_for(era),
            by_kind,
            by_id,
        })
    }

    pub fn era(&self) -> ProtocolEra {
        self.era
    }

    pub fn codec(&self) -> &'static dyn ComponentCodec {
        self.codec
    }

    pub fn packet_id(&self, kind: PacketKind) -> ScorebarResult<i32> {
        self.by_kind
            .get(&kind)
            .copied()
            .ok_or(ScorebarError::UnsupportedForEra {
                feature: kind_name(kind),
                era: self.era,
            })
    }

    /// Encodes a packet with its registered id as the varint prefix.
    pub fn serialize(&self, packet: &impl Packet) -> ScorebarResult<Bytes> {
        let id = self.packet_id(packet.kind())?;
        let mut w = PacketWriter::new();
        w.write_var_int(id);
        packet.write(&mut w, self.codec)?;
        Ok(w.into_bytes())
    }

    /// Decodes a packet from its id prefix and era-shaped body.
    pub fn deserialize(&self, bytes: &[u8]) -> ScorebarResult<AnyPacket> {
        let mut r = PacketReader::new(bytes);
        let id = r.read_var_int()?;
        let kind = *self
            .by_id
            .get(&id)
            .ok_or(ScorebarError::UnknownPacketId(id))?;

        Ok(match kind {
            PacketKind::DisplayObjective => {
                AnyPacket::DisplayObjective(DisplayObjectivePacket::read(&mut r, self.codec)?)
            }
            PacketKind::Objective => AnyPacket::Objective(ObjectivePacket::read(&mut r, self.codec)?),
            PacketKind::Team => AnyPacket::Team(TeamPacket::read(&mut r, self.codec)?),
            PacketKind::Score => AnyPacket::Score(ScorePacket::read(&mut r, self.codec)?),
            PacketKind::ResetScore => {
                AnyPacket::ResetScore(ResetScorePacket::read(&mut r, self.codec)?)
            }
        })
    }
}

fn kind_name(kind: PacketKind) -> &'static str {
    match kind {
        PacketKind::DisplayObjective => "display objective packet",
        PacketKind::Objective => "objective packet",
        PacketKind::Team => "team packet",
        PacketKind::Score => "score packet",
        PacketKind::ResetScore => "reset score packet",
    }
}
