//! Protocol era identification
//!
//! The scoreboard packet family went through three mutually incompatible
//! wire generations. The era is detected once at startup and every format
//! decision afterwards is an ordered comparison against it.

use std::fmt;

/// Wire generation, oldest to newest. The derived `Ord` is load bearing:
/// capability checks are `>=` comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolEra {
    /// Styled text travels as raw legacy strings; sidebar lines ride on
    /// team prefix/suffix pairs with a 32 character budget.
    Legacy,
    /// Styled text travels as a structured tag tree.
    Component,
    /// Adds score number formats and a dedicated reset-score packet;
    /// score updates become implicit upserts.
    Modern,
}

impl ProtocolEra {
    /// Styled text is encoded as a tag tree instead of a raw legacy string.
    #[inline]
    pub fn has_structured_text(self) -> bool {
        self >= ProtocolEra::Component
    }

    /// Score number formats exist on the wire.
    #[inline]
    pub fn has_number_formats(self) -> bool {
        self >= ProtocolEra::Modern
    }

    /// Score removal is a dedicated packet instead of a score action.
    #[inline]
    pub fn has_reset_score(self) -> bool {
        self >= ProtocolEra::Modern
    }

    /// Hex colors are understood by clients of this era.
    #[inline]
    pub fn has_hex_colors(self) -> bool {
        self >= ProtocolEra::Component
    }
}

impl fmt::Display for ProtocolEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolEra::Legacy => "legacy",
            ProtocolEra::Component => "component",
            ProtocolEra::Modern => "modern",
        };
        write!(f, "{}", name)
    }
}
