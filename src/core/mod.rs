// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/mod.rs
//!
//! Core engine module
//!
//! This module contains the data structures and algorithms that turn raw
//! per-control pressed values into bind transitions:
//! - Control table and host input seams
//! - Combo state machine with hold timer and graceful release
//! - Named binds with alias combos and subscriber lists
//! - Bind groups: inverted index, conflict checks, disambiguation
//! - The registry that owns everything and drives the tick
//!
//! The engine is single-threaded and synchronous. Nothing here performs I/O;
//! every failure is a deterministic validation error.

pub mod bind;
pub mod combo;
pub mod conflict;
pub mod control;
pub mod definition;
pub mod error;
pub mod group;
pub mod keys;
pub mod observer;
pub mod parser;
pub mod registry;
pub mod types;
pub mod validator;

pub use bind::{Bind, BindEvent, BindEventKind};
pub use combo::Combo;
pub use conflict::{ComboConflict, ConflictDetector};
pub use control::{Control, ControlRegistry, ControlSample, InputSource};
pub use definition::{AliasDefinition, BindDefinition};
pub use error::BindError;
pub use group::{BindGroup, BindTransaction, BindsChanged};
pub use keys::{ControlSource, RawControl, VirtualKeySource};
pub use observer::SubscriptionId;
pub use registry::BindRegistry;
pub use types::*;

#[cfg(test)]
mod tests;
