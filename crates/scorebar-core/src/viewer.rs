//! Viewer identity
//!
//! A viewer is one connected client of the live session. The host hands us
//! an opaque 64-bit identity; the sidebar registry is keyed by it.

use std::fmt;

/// Identity of one connected viewer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewerId(pub u64);

impl ViewerId {
    #[inline]
    pub fn new(id: u64) -> Self {
        ViewerId(id)
    }
}

impl fmt::Debug for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Viewer({:016x})", self.0)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
