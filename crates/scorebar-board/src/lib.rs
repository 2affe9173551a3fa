//! Scorebar Board - Per-viewer sidebar state machine
//!
//! Builds on the wire crate to keep one fifteen-line sidebar per viewer and
//! emit the right packet sequence for every mutation. Byte delivery and era
//! detection stay behind the `PacketSink` and `EraDetector` traits.

pub mod line;
pub mod service;
pub mod sidebar;
pub mod sink;

pub use line::*;
pub use service::*;
pub use sidebar::*;
pub use sink::*;
