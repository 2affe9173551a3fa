//! Scorebar Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout scorebar:
//! - Protocol era identification (ProtocolEra)
//! - Viewer identity (ViewerId)
//! - The legacy color/format table and helpers (TextColor)
//! - Scoreboard enums shared by the packet schemas
//! - Error types

pub mod color;
pub mod enums;
pub mod era;
pub mod error;
pub mod viewer;

pub use color::*;
pub use enums::*;
pub use era::*;
pub use error::*;
pub use viewer::*;
