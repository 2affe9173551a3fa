//! Scorebar Wire - Versioned scoreboard packet encoding
//!
//! This crate implements the wire format for the scoreboard packet family:
//! - Wire primitives (varint/varlong, strings, nullable and collection framing)
//! - A binary tag tree and the legacy-text styled component codec
//! - The score number-format union
//! - The era codec strategy and the five packet schemas
//! - The id-to-schema protocol registry

pub mod codec;
pub mod component;
pub mod format;
pub mod nbt;
pub mod packets;
pub mod registry;
pub mod serializer;

pub use codec::*;
pub use component::*;
pub use format::*;
pub use nbt::*;
pub use packets::*;
pub use registry::*;
pub use serializer::*;
