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

//! Top-level owner of controls and bind groups
//!
//! The host constructs one `BindRegistry`, keeps it next to its simulation
//! loop, and each frame:
//! 1. refreshes raw input via `controls_mut().refresh(..)`
//! 2. calls `update(tick)` exactly once
//!
//! Groups are namespaced per client (one per consuming subsystem). Group
//! names are unique and case-insensitive within a client.

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::core::control::{ControlRegistry, InputSource};
use crate::core::group::BindGroup;
use crate::core::types::{ClientId, GroupId, Tick};

#[derive(Debug)]
struct Client {
    name: String,
    groups: Vec<BindGroup>,
}

/// Owns the control table and every client's bind groups.
#[derive(Debug)]
pub struct BindRegistry {
    config: EngineConfig,
    controls: ControlRegistry,
    clients: Vec<Client>,
}

impl BindRegistry {
    /// Registry over the built-in virtual-key table with default settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_controls(ControlRegistry::new(), config)
    }

    /// Registry over a host-built control table.
    pub fn with_controls(controls: ControlRegistry, config: EngineConfig) -> Self {
        info!(
            hold_threshold_ms = config.hold_threshold_ms,
            "bind registry initialised"
        );
        Self {
            config,
            controls,
            clients: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    /// Mutable access for the host's per-tick refresh.
    pub fn controls_mut(&mut self) -> &mut ControlRegistry {
        &mut self.controls
    }

    // ---- clients ---------------------------------------------------------

    /// Returns the client with this name, creating it on first use.
    pub fn client(&mut self, name: &str) -> ClientId {
        if let Some(id) = self.find_client(name) {
            return id;
        }
        self.clients.push(Client {
            name: name.trim().to_string(),
            groups: Vec::new(),
        });
        debug!(client = name, "registered client");
        ClientId(self.clients.len() - 1)
    }

    pub fn find_client(&self, name: &str) -> Option<ClientId> {
        let name = name.trim();
        self.clients
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(ClientId)
    }

    /// Every client, in registration order.
    pub fn clients(&self) -> impl Iterator<Item = ClientId> {
        (0..self.clients.len()).map(ClientId)
    }

    pub fn client_name(&self, client: ClientId) -> &str {
        &self.clients[client.0].name
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Clears every group owned by the client. The groups themselves stay
    /// registered so existing `GroupId`s remain valid.
    pub fn clear_client(&mut self, client: ClientId) {
        for group in &mut self.clients[client.0].groups {
            group.clear();
        }
    }

    // ---- groups ----------------------------------------------------------

    /// Returns the client's group with this name, creating it on first use.
    pub fn get_or_create_group(&mut self, client: ClientId, name: &str) -> GroupId {
        if let Some(id) = self.find_group(client, name) {
            return id;
        }

        let group = BindGroup::new(name.trim(), &self.config);
        let groups = &mut self.clients[client.0].groups;
        groups.push(group);
        debug!(client = %self.clients[client.0].name, group = name, "created group");

        GroupId {
            client,
            group: self.clients[client.0].groups.len() - 1,
        }
    }

    pub fn find_group(&self, client: ClientId, name: &str) -> Option<GroupId> {
        let name = name.trim();
        self.clients[client.0]
            .groups
            .iter()
            .position(|g| g.name().eq_ignore_ascii_case(name))
            .map(|group| GroupId { client, group })
    }

    /// # Panics
    /// Panics if `id` was not issued by this registry.
    pub fn group(&self, id: GroupId) -> &BindGroup {
        &self.clients[id.client.0].groups[id.group]
    }

    /// # Panics
    /// Panics if `id` was not issued by this registry.
    pub fn group_mut(&mut self, id: GroupId) -> &mut BindGroup {
        &mut self.clients[id.client.0].groups[id.group]
    }

    /// Group together with the control table, for name-based edits.
    pub fn group_with_controls(&mut self, id: GroupId) -> (&mut BindGroup, &ControlRegistry) {
        (
            &mut self.clients[id.client.0].groups[id.group],
            &self.controls,
        )
    }

    /// Groups owned by a client, in creation order.
    pub fn groups(&self, client: ClientId) -> impl Iterator<Item = (GroupId, &BindGroup)> {
        self.clients[client.0]
            .groups
            .iter()
            .enumerate()
            .map(move |(group, g)| (GroupId { client, group }, g))
    }

    // ---- tick ------------------------------------------------------------

    /// Refreshes the control table from the host and then runs `update`.
    pub fn poll_and_update(&mut self, source: &mut impl InputSource, tick: Tick) {
        self.controls.refresh(source);
        self.update(tick);
    }

    /// Evaluates every group of every client, in registration order.
    ///
    /// Control values must already be refreshed for this tick.
    pub fn update(&mut self, tick: Tick) {
        let controls = &self.controls;
        for client in &mut self.clients {
            for group in &mut client.groups {
                group.update(controls, tick);
            }
        }
    }
}

impl Default for BindRegistry {
    fn default() -> Self {
        Self::new()
    }
}
