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

//! Tick-driven keybinding engine
//!
//! Turns raw per-frame key, button and scroll-wheel state into named bind
//! transitions (new press, held, released) for a game or interactive tool.
//!
//! # Features
//!
//! - **Multi-key combos:** up to three controls per combo, any order
//! - **Disambiguation:** when combos overlap, the longest fully pressed one
//!   wins the shared controls, so `Ctrl+S` does not also fire `S`
//! - **Graceful release:** letting go of one key of a combo does not drop
//!   the bind or fall through to a shorter combo
//! - **Aliases:** each bind has a primary combo plus any number of aliases
//! - **Conflict checks:** identical control sets are rejected at assignment
//! - **Atomic bulk loads:** a rejected load leaves the group untouched
//!
//! # Architecture
//!
//! - **`core`:** the engine (controls, combos, binds, groups, registry)
//! - **`config`:** engine settings and JSON bind profiles
//!
//! The engine is single-threaded. The host owns one `BindRegistry` and,
//! once per tick, refreshes control values and then calls `update`.
//!
//! # Examples
//!
//! ## Binding and evaluating
//!
//! ```
//! use bind_engine::core::{BindRegistry, Tick};
//!
//! let mut registry = BindRegistry::new();
//! let client = registry.client("game");
//! let id = registry.get_or_create_group(client, "player");
//!
//! let (group, controls) = registry.group_with_controls(id);
//! let save = group.register_bind("QuickSave")?;
//! group.set_combo_by_names(save, 0, &["Ctrl", "S"], controls, true)?;
//!
//! let ctrl = registry.controls().lookup_by_name("Ctrl").unwrap();
//! let s = registry.controls().lookup_by_name("S").unwrap();
//! registry.controls_mut().refresh_pressed(&[ctrl, s]);
//! registry.update(Tick::from_millis(1, 16));
//!
//! assert!(registry.group(id).bind(save).is_new_press());
//! # Ok::<(), bind_engine::core::BindError>(())
//! ```
//!
//! ## Reporting conflicts
//!
//! ```no_run
//! use bind_engine::config::load_profile;
//! use bind_engine::core::BindRegistry;
//! use std::path::Path;
//!
//! let profile = load_profile(Path::new("binds.json"))?;
//! let mut registry = BindRegistry::with_config(profile.settings.clone());
//! for id in profile.apply(&mut registry, false)? {
//!     for conflict in registry.group(id).find_conflicts() {
//!         println!("{} combos share a key set", conflict.combos.len());
//!     }
//! }
//! # Ok::<(), bind_engine::config::ConfigError>(())
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod core;

// Re-export commonly used types for convenience
pub use config::{BindProfile, EngineConfig};
pub use core::{BindError, BindGroup, BindRegistry, ControlRegistry, Tick};
