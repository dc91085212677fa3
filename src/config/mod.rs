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

//! Engine settings and bind profiles
//!
//! - `EngineConfig`: tunables shared by every group (hold threshold)
//! - `BindProfile`: the JSON shape a host or the CLI uses to describe
//!   clients, groups and their bind definitions
//!
//! Applying a profile is transactional per group: a group whose definitions
//! are rejected is left exactly as it was.
//!
//! # Example
//!
//! ```
//! use bind_engine::config::BindProfile;
//! use bind_engine::core::BindRegistry;
//!
//! let profile = BindProfile::from_json(r#"{
//!     "clients": [{
//!         "name": "game",
//!         "groups": [{
//!             "name": "player",
//!             "binds": [{ "name": "Jump", "control_names": ["Space"] }]
//!         }]
//!     }]
//! }"#)?;
//!
//! let mut registry = BindRegistry::with_config(profile.settings.clone());
//! profile.apply(&mut registry, true)?;
//! # Ok::<(), bind_engine::config::ConfigError>(())
//! ```

mod error;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::{BindDefinition, BindRegistry, GroupId};

pub use error::ConfigError;

/// Default time a combo must stay pressed to count as held.
pub const DEFAULT_HOLD_THRESHOLD_MS: u64 = 500;

/// Tunables shared by every group in a registry.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Milliseconds a combo must stay pressed before it reports held.
    pub hold_threshold_ms: u64,
}

impl EngineConfig {
    pub fn hold_threshold(&self) -> Duration {
        Duration::from_millis(self.hold_threshold_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_threshold_ms: DEFAULT_HOLD_THRESHOLD_MS,
        }
    }
}

/// Bind definitions of one group.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GroupProfile {
    pub name: String,
    #[serde(default)]
    pub binds: Vec<BindDefinition>,
}

/// Groups of one client namespace.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ClientProfile {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<GroupProfile>,
}

/// Settings plus every client's bind definitions.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BindProfile {
    #[serde(default)]
    pub settings: EngineConfig,
    #[serde(default)]
    pub clients: Vec<ClientProfile>,
}

impl BindProfile {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot of every group in `registry`, with canonical control names.
    pub fn capture(registry: &BindRegistry) -> Self {
        let clients = registry
            .clients()
            .map(|client| ClientProfile {
                name: registry.client_name(client).to_string(),
                groups: registry
                    .groups(client)
                    .map(|(_, group)| GroupProfile {
                        name: group.name().to_string(),
                        binds: group.export(registry.controls()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            settings: registry.config().clone(),
            clients,
        }
    }

    /// Registers every named bind and loads its combos
    ///
    /// Groups are created on demand. Each group is edited in its own
    /// transaction, so on error the failing group is untouched while groups
    /// applied before it keep their new state.
    pub fn apply(&self, registry: &mut BindRegistry, strict: bool) -> Result<Vec<GroupId>, ConfigError> {
        let mut applied = Vec::new();

        for client_profile in &self.clients {
            let client = registry.client(&client_profile.name);

            for group_profile in &client_profile.groups {
                let id = registry.get_or_create_group(client, &group_profile.name);
                let (group, controls) = registry.group_with_controls(id);
                let in_group = |source| ConfigError::Group {
                    group: group_profile.name.clone(),
                    source,
                };

                let mut tx = group.begin_transaction();
                for definition in &group_profile.binds {
                    if tx.group().find_bind(definition.name()).is_none() {
                        tx.group()
                            .register_bind(definition.name())
                            .map_err(in_group)?;
                    }
                }
                tx.group()
                    .load_bind_data_with(&group_profile.binds, controls, strict)
                    .map_err(in_group)?;
                tx.commit();

                debug!(
                    client = %client_profile.name,
                    group = %group_profile.name,
                    binds = group_profile.binds.len(),
                    "applied group profile"
                );
                applied.push(id);
            }
        }

        Ok(applied)
    }
}

/// Reads and parses a profile file.
pub fn load_profile(path: &Path) -> Result<BindProfile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let profile = BindProfile::from_json(&content)?;

    info!(
        path = %path.display(),
        clients = profile.clients.len(),
        "loaded bind profile"
    );
    Ok(profile)
}

#[cfg(test)]
mod tests;
