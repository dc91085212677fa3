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

//! All-or-nothing edits of a bind group
//!
//! A transaction captures the group's combo layout when it begins. Changes
//! made through it are kept only if `commit()` is called; `rollback()`, or
//! dropping the transaction without committing, restores the snapshot.
//!
//! Subscribers are not part of the snapshot. Binds registered during the
//! transaction are removed again on rollback.

use crate::core::bind::BindState;
use crate::core::combo::Combo;
use crate::core::group::{BindGroup, ControlIndex};
use crate::core::types::ComboId;

/// Everything `set_combo` and `register_bind` can change.
#[derive(Clone, Debug)]
struct GroupSnapshot {
    combos: Vec<Combo>,
    index: ControlIndex,
    bind_count: usize,
    bind_combos: Vec<Vec<ComboId>>,
    bind_states: Vec<BindState>,
    binds_changed: bool,
}

impl GroupSnapshot {
    fn capture(group: &BindGroup) -> Self {
        Self {
            combos: group.combos.clone(),
            index: group.index.clone(),
            bind_count: group.binds.len(),
            bind_combos: group.binds.iter().map(|b| b.combos.clone()).collect(),
            bind_states: group.binds.iter().map(|b| b.state).collect(),
            binds_changed: group.binds_changed,
        }
    }

    fn restore(self, group: &mut BindGroup) {
        group.binds.truncate(self.bind_count);
        group
            .names
            .retain(|_, id| id.index() < self.bind_count);

        for ((bind, combos), state) in group
            .binds
            .iter_mut()
            .zip(self.bind_combos)
            .zip(self.bind_states)
        {
            bind.combos = combos;
            bind.state = state;
        }

        group.combos = self.combos;
        group.index = self.index;
        group.binds_changed = self.binds_changed;
    }
}

/// Guard over a group edit
///
/// # Example
///
/// ```
/// use bind_engine::core::{BindGroup, ControlRegistry};
/// use bind_engine::config::EngineConfig;
///
/// let controls = ControlRegistry::new();
/// let mut group = BindGroup::new("player", &EngineConfig::default());
/// let jump = group.register_bind("Jump")?;
/// let space = controls.lookup_by_name("Space").unwrap();
///
/// {
///     let mut tx = group.begin_transaction();
///     tx.group().set_combo(jump, 0, &[space], true)?;
///     // dropped without commit: rolled back
/// }
/// assert!(group.combo_controls(jump, 0).unwrap().is_empty());
/// # Ok::<(), bind_engine::core::BindError>(())
/// ```
pub struct BindTransaction<'a> {
    group: &'a mut BindGroup,
    snapshot: Option<GroupSnapshot>,
}

impl<'a> BindTransaction<'a> {
    pub(crate) fn begin(group: &'a mut BindGroup) -> Self {
        let snapshot = GroupSnapshot::capture(group);
        Self {
            group,
            snapshot: Some(snapshot),
        }
    }

    /// The group being edited.
    pub fn group(&mut self) -> &mut BindGroup {
        self.group
    }

    /// Keeps all changes made so far.
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    /// Restores the group to its state at `begin`.
    pub fn rollback(mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(self.group);
        }
    }
}

impl Drop for BindTransaction<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(self.group);
        }
    }
}
