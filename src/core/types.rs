//! src/core/types.rs
//!
//! Core identifier and timing types shared by every engine component
//!
//! This module defines the small value types passed between layers:
//! - `ControlId`: a bindable control (only obtainable from a `ControlRegistry`)
//! - `ComboId` / `BindId`: dense indices inside a single `BindGroup`
//! - `ClientId` / `GroupId`: handles into a `BindRegistry`
//! - `Tick`: the host's per-frame timing sample
//!
//! All ids are plain indices. They are only meaningful to the owner that
//! produced them; using an id with a different owner is a programming error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Maximum number of controls a single combo may contain.
pub const MAX_COMBO_LENGTH: usize = 3;

/// A bindable control
///
/// Wraps the dense control index. Construction is restricted to the crate so
/// that reserved placeholder slots (bare modifier keys, unassigned codes) can
/// never end up inside a combo.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ControlId(u16);

impl ControlId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u16)
    }

    /// Dense index of the control in the registry table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a combo inside its owning group.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ComboId(pub(crate) usize);

impl ComboId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a bind inside its owning group.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BindId(pub(crate) usize);

impl BindId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a client namespace in a `BindRegistry`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ClientId(pub(crate) usize);

impl ClientId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a group owned by a client in a `BindRegistry`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GroupId {
    pub(crate) client: ClientId,
    pub(crate) group: usize,
}

impl GroupId {
    pub fn client(self) -> ClientId {
        self.client
    }

    /// Index of the group within its client.
    pub fn index(self) -> usize {
        self.group
    }
}

/// One simulation step as seen by the engine
///
/// `elapsed` is read from the host's monotonic clock and must never go
/// backwards between ticks. Hold detection compares it against the moment a
/// combo became pressed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tick {
    /// Frame counter, informational only.
    pub frame: u64,
    /// Time since the host clock started.
    pub elapsed: Duration,
}

impl Tick {
    pub fn new(frame: u64, elapsed: Duration) -> Self {
        Self { frame, elapsed }
    }

    /// Convenience for hosts and tests that count milliseconds.
    pub fn from_millis(frame: u64, millis: u64) -> Self {
        Self::new(frame, Duration::from_millis(millis))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} @ {}ms", self.frame, self.elapsed.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_id_display() {
        assert_eq!(format!("{}", ControlId::new(87)), "#87");
        assert_eq!(ControlId::new(257).index(), 257);
    }

    #[test]
    fn test_tick_from_millis() {
        let tick = Tick::from_millis(3, 48);
        assert_eq!(tick.elapsed, Duration::from_millis(48));
        assert_eq!(format!("{}", tick), "tick 3 @ 48ms");
    }
}
