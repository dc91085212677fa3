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

//! Bind groups: registration, conflict management and per-tick evaluation
//!
//! A `BindGroup` owns a namespace of binds, every combo those binds use, and
//! the inverted index from controls to combos. Once per tick the group turns
//! the registry's raw pressed values into combo states, resolves overlapping
//! combos, and lets each bind pick up its transitions.
//!
//! # Evaluation
//! 1. **Hits:** count pressed controls per combo through the index. A brand
//!    new press anywhere in the group cancels every pending graceful release.
//! 2. **Grace:** a combo that was pressed but lost some (not all) of its
//!    controls keeps its full hit count and is marked as being released.
//! 3. **Disambiguation:** for every control, the longest fully-hit combo
//!    claiming it keeps that control; every other claimant loses one hit.
//! 4. **Finalise combos:** a combo is pressed iff all its controls still
//!    count as hit.
//! 5. **Finalise binds:** each bind adopts the first of its combos (primary
//!    first) that changed state this tick.
//!
//! # Conflicts
//! Two live combos in one group may not hold exactly the same control set,
//! unless the caller opts out with a non-strict assignment. Subsets are fine:
//! disambiguation gives the longer combo priority.

mod index;
mod transaction;

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::core::bind::{Bind, BindEvent};
use crate::core::combo::Combo;
use crate::core::conflict::{ComboConflict, ConflictDetector};
use crate::core::control::ControlRegistry;
use crate::core::definition::{AliasDefinition, BindDefinition};
use crate::core::error::BindError;
use crate::core::observer::{Observers, SubscriptionId};
use crate::core::types::{BindId, ComboId, ControlId, Tick};
use crate::core::validator::{resolve_control_names, validate_bind_name, validate_combo};

pub use index::ControlIndex;
pub use transaction::BindTransaction;

/// Raised once per tick when the composition of any combo changed.
#[derive(Clone, Debug, PartialEq)]
pub struct BindsChanged {
    pub group: String,
    pub frame: u64,
}

/// A namespace of uniquely named binds evaluated together.
#[derive(Debug)]
pub struct BindGroup {
    name: String,
    hold_threshold: Duration,
    binds: Vec<Bind>,
    names: HashMap<String, BindId>,
    combos: Vec<Combo>,
    index: ControlIndex,
    binds_changed: bool,
    on_binds_changed: Observers<BindsChanged>,
    events: Vec<BindEvent>,
}

impl BindGroup {
    pub fn new(name: &str, config: &EngineConfig) -> Self {
        Self {
            name: name.to_string(),
            hold_threshold: config.hold_threshold(),
            binds: Vec::new(),
            names: HashMap::new(),
            combos: Vec::new(),
            index: ControlIndex::new(),
            binds_changed: false,
            on_binds_changed: Observers::new(),
            events: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ---- binds -----------------------------------------------------------

    /// Registers a new bind with an empty primary combo.
    pub fn register_bind(&mut self, name: &str) -> Result<BindId, BindError> {
        let name = validate_bind_name(name)?;
        let key = name.to_lowercase();
        if self.names.contains_key(&key) {
            return Err(BindError::DuplicateBindName(name.to_string()));
        }

        let id = BindId(self.binds.len());
        let primary = self.push_combo(id);
        self.binds.push(Bind::new(id, name, primary));
        self.names.insert(key, id);
        self.binds_changed = true;

        debug!(group = %self.name, bind = name, "registered bind");
        Ok(id)
    }

    /// Case-insensitive lookup.
    pub fn find_bind(&self, name: &str) -> Option<BindId> {
        self.names.get(&name.trim().to_lowercase()).copied()
    }

    /// # Panics
    /// Panics if `id` was not issued by this group.
    pub fn bind(&self, id: BindId) -> &Bind {
        &self.binds[id.0]
    }

    /// # Panics
    /// Panics if `id` was not issued by this group.
    pub fn bind_mut(&mut self, id: BindId) -> &mut Bind {
        &mut self.binds[id.0]
    }

    pub fn bind_by_name(&self, name: &str) -> Option<&Bind> {
        self.find_bind(name).map(|id| self.bind(id))
    }

    pub fn binds(&self) -> impl Iterator<Item = &Bind> {
        self.binds.iter()
    }

    pub fn bind_count(&self) -> usize {
        self.binds.len()
    }

    // ---- combos ----------------------------------------------------------

    pub fn combo(&self, id: ComboId) -> &Combo {
        &self.combos[id.0]
    }

    pub fn combos(&self) -> impl Iterator<Item = &Combo> {
        self.combos.iter()
    }

    /// Combos of a bind in slot order.
    pub fn bind_combos(&self, bind: BindId) -> impl Iterator<Item = &Combo> {
        self.binds[bind.0].combos.iter().map(|id| &self.combos[id.0])
    }

    /// Controls assigned to a slot, or `None` if the slot does not exist.
    pub fn combo_controls(&self, bind: BindId, slot: usize) -> Option<&[ControlId]> {
        self.binds[bind.0]
            .combos
            .get(slot)
            .map(|id| self.combos[id.0].controls())
    }

    /// Controls claimed by at least one combo.
    pub fn used_controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.index.used_controls()
    }

    /// Combos claiming a control, in claim order.
    pub fn claimants(&self, control: ControlId) -> &[ComboId] {
        self.index.claimants(control)
    }

    /// Assigns the combo in `slot` of `bind`
    ///
    /// Slot 0 is the primary combo, higher slots are aliases. Assigning the
    /// slot right after the last one appends a new alias. An empty control
    /// list unbinds the slot and is always accepted.
    ///
    /// With `strict`, a control set that exactly matches another live combo
    /// in the group is rejected. Nothing is modified on error.
    pub fn set_combo(
        &mut self,
        bind: BindId,
        slot: usize,
        controls: &[ControlId],
        strict: bool,
    ) -> Result<ComboId, BindError> {
        let controls = validate_combo(controls)?;
        let target = &self.binds[bind.0];
        let slots = target.combos.len();

        if slot > slots {
            return Err(BindError::InvalidAliasSlot {
                bind: target.name().to_string(),
                slot,
                slots,
            });
        }

        let existing = target.combos.get(slot).copied();

        if strict {
            if let Some(other) = self.conflicting_combo(&controls, existing) {
                let owner = self.combos[other.0].owner();
                let error = BindError::ComboConflict {
                    bind: target.name().to_string(),
                    existing: self.binds[owner.0].name().to_string(),
                };
                warn!(group = %self.name, "{}", error);
                return Err(error);
            }
        }

        let combo = match existing {
            Some(id) => id,
            None => {
                let id = self.push_combo(bind);
                self.binds[bind.0].combos.push(id);
                self.binds_changed = true;
                id
            }
        };

        if self.combos[combo.0].controls() != controls.as_slice() {
            self.assign(combo, controls);
        }

        debug!(
            group = %self.name,
            bind = %self.binds[bind.0],
            slot,
            combo = %self.combos[combo.0],
            "assigned combo"
        );
        Ok(combo)
    }

    /// Resolves control names against `controls` and assigns them.
    pub fn set_combo_by_names<S: AsRef<str>>(
        &mut self,
        bind: BindId,
        slot: usize,
        names: &[S],
        controls: &ControlRegistry,
        strict: bool,
    ) -> Result<ComboId, BindError> {
        let ids = resolve_control_names(controls, names)?;
        self.set_combo(bind, slot, &ids, strict)
    }

    /// Unbinds a slot.
    pub fn clear_combo(&mut self, bind: BindId, slot: usize) -> Result<(), BindError> {
        self.set_combo(bind, slot, &[], false).map(|_| ())
    }

    /// True if a live combo other than `excluding` holds exactly `controls`.
    pub fn does_combo_conflict(&self, controls: &[ControlId], excluding: Option<ComboId>) -> bool {
        match validate_combo(controls) {
            Ok(controls) => self.conflicting_combo(&controls, excluding).is_some(),
            Err(_) => false,
        }
    }

    /// Every set of live combos sharing an identical control set.
    pub fn find_conflicts(&self) -> Vec<ComboConflict> {
        let mut detector = ConflictDetector::new();
        for (index, combo) in self.combos.iter().enumerate() {
            detector.add_combo(ComboId(index), combo);
        }
        detector.find_conflicts()
    }

    fn conflicting_combo(&self, controls: &[ControlId], excluding: Option<ComboId>) -> Option<ComboId> {
        let first = *controls.first()?;
        self.index
            .claimants(first)
            .iter()
            .copied()
            .filter(|id| Some(*id) != excluding)
            .find(|id| self.combos[id.0].matches(controls))
    }

    fn push_combo(&mut self, owner: BindId) -> ComboId {
        let id = ComboId(self.combos.len());
        self.combos.push(Combo::new(owner));
        id
    }

    /// Swaps a combo's key set, keeping the index in step.
    fn assign(&mut self, id: ComboId, controls: Vec<ControlId>) {
        for control in self.combos[id.0].controls().to_vec() {
            self.index.release(control, id);
        }
        for &control in &controls {
            self.index.claim(control, id);
        }
        self.combos[id.0].set_controls(controls);
        self.binds_changed = true;

        // A bind whose only pressed combo was just rebuilt is no longer pressed.
        let owner = self.combos[id.0].owner();
        let still_pressed = self.binds[owner.0]
            .combos
            .iter()
            .any(|c| self.combos[c.0].is_pressed());
        if !still_pressed {
            self.binds[owner.0].reset_state();
        }
    }

    // ---- bulk load / export ----------------------------------------------

    /// Starts an all-or-nothing edit of this group.
    pub fn begin_transaction(&mut self) -> BindTransaction<'_> {
        BindTransaction::begin(self)
    }

    /// Replaces the combos of the named binds
    ///
    /// Every referenced bind must already be registered. Slots of those binds
    /// that the definition does not mention are unbound. If any assignment
    /// fails the group is restored to exactly its prior state.
    pub fn load_bind_data(
        &mut self,
        definitions: &[BindDefinition],
        controls: &ControlRegistry,
    ) -> Result<(), BindError> {
        self.load_bind_data_with(definitions, controls, true)
    }

    /// `load_bind_data` with explicit conflict checking.
    pub fn load_bind_data_with(
        &mut self,
        definitions: &[BindDefinition],
        controls: &ControlRegistry,
        strict: bool,
    ) -> Result<(), BindError> {
        let mut tx = self.begin_transaction();
        match tx.group().apply_definitions(definitions, controls, strict) {
            Ok(()) => {
                tx.commit();
                debug!(group = %self.name, binds = definitions.len(), "loaded bind data");
                Ok(())
            }
            Err(error) => {
                tx.rollback();
                warn!(group = %self.name, %error, "bind data rejected, group rolled back");
                Err(error)
            }
        }
    }

    fn apply_definitions(
        &mut self,
        definitions: &[BindDefinition],
        controls: &ControlRegistry,
        strict: bool,
    ) -> Result<(), BindError> {
        let mut resolved = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let bind = self
                .find_bind(definition.name())
                .ok_or_else(|| BindError::UnknownBind(definition.name().to_string()))?;

            let slots = definition
                .slots()
                .map(|names| match names {
                    Some(names) => resolve_control_names(controls, names),
                    None => Ok(Vec::new()),
                })
                .collect::<Result<Vec<_>, _>>()?;

            resolved.push((bind, slots));
        }

        // Unbind slots that are about to change first, so combos can move
        // between binds within one load. Unchanged slots keep their state.
        for (bind, slots) in &resolved {
            for slot in 0..self.binds[bind.0].combos.len() {
                let target = slots.get(slot).map(Vec::as_slice).unwrap_or(&[]);
                let current = self.combos[self.binds[bind.0].combos[slot].0].controls();
                let unchanged = validate_combo(target).is_ok_and(|t| current == t.as_slice());
                if !unchanged {
                    self.set_combo(*bind, slot, &[], false)?;
                }
            }
        }

        for (bind, slots) in resolved {
            for (slot, ids) in slots.iter().enumerate() {
                self.set_combo(bind, slot, ids, strict)?;
            }
        }

        Ok(())
    }

    /// Current binds as definitions, using canonical control names.
    pub fn export(&self, controls: &ControlRegistry) -> Vec<BindDefinition> {
        self.binds
            .iter()
            .map(|bind| {
                let mut slots = bind.combos.iter().map(|id| {
                    let combo = &self.combos[id.0];
                    (!combo.is_empty()).then(|| {
                        combo
                            .controls()
                            .iter()
                            .map(|c| controls.name(*c).to_string())
                            .collect::<Vec<_>>()
                    })
                });

                let primary = slots.next().flatten();
                if bind.alias_count() == 0 {
                    BindDefinition::simple(bind.name(), primary.unwrap_or_default())
                } else {
                    let aliases = slots
                        .map(|control_names| AliasDefinition { control_names })
                        .collect();
                    BindDefinition::extended(bind.name(), primary, aliases)
                }
            })
            .collect()
    }

    /// Drops every bind and combo. Group subscribers are kept.
    pub fn clear(&mut self) {
        self.binds.clear();
        self.names.clear();
        self.combos.clear();
        self.index.clear();
        self.events.clear();
        self.binds_changed = true;
        debug!(group = %self.name, "cleared group");
    }

    // ---- notifications ---------------------------------------------------

    pub fn subscribe_binds_changed(
        &mut self,
        callback: impl FnMut(&BindsChanged) + 'static,
    ) -> SubscriptionId {
        self.on_binds_changed.subscribe(callback)
    }

    pub fn unsubscribe_binds_changed(&mut self, id: SubscriptionId) -> bool {
        self.on_binds_changed.unsubscribe(id)
    }

    /// Transitions raised during the last `update`, in bind order.
    pub fn events(&self) -> &[BindEvent] {
        &self.events
    }

    // ---- evaluation ------------------------------------------------------

    /// Runs one tick of evaluation against the registry's current values.
    pub fn update(&mut self, controls: &ControlRegistry, tick: Tick) {
        self.events.clear();

        if self.combos.iter().any(|c| !c.is_empty()) {
            self.evaluate_combos(controls, tick.elapsed);
            self.finalize_binds(tick.frame);
        }

        if std::mem::take(&mut self.binds_changed) {
            let event = BindsChanged {
                group: self.name.clone(),
                frame: tick.frame,
            };
            self.on_binds_changed.notify(&event);
        }
    }

    fn evaluate_combos(&mut self, controls: &ControlRegistry, now: Duration) {
        // 1. Hit accumulation
        let new_press = self
            .index
            .used_controls()
            .any(|c| controls.control(c).is_new_press());

        for combo in &mut self.combos {
            combo.hits = 0;
            combo.analog_value = 0.0;
            if new_press {
                combo.being_released = false;
            }
        }

        let mut controls_pressed = 0;
        for (control, claimants) in self.index.iter() {
            let control = controls.control(control);
            if !control.is_pressed() {
                continue;
            }
            controls_pressed += 1;
            for id in claimants {
                let combo = &mut self.combos[id.0];
                combo.hits += 1;
                if control.is_analog() {
                    combo.analog_value += control.magnitude();
                }
            }
        }

        // 2. Graceful continuation and pressed-combo count
        let mut combos_pressed = 0;
        if controls_pressed > 0 {
            for combo in &mut self.combos {
                let len = combo.len();
                let lingering = combo.is_pressed() || combo.being_released;
                if !new_press && lingering && combo.hits > 0 && combo.hits < len {
                    combo.hits = len;
                    combo.being_released = true;
                }

                if combo.is_fully_hit() {
                    combos_pressed += 1;
                } else {
                    combo.hits = 0;
                }
            }
        }

        // 3. Disambiguation: longest combo owns shared controls
        if combos_pressed > 1 {
            for (_, claimants) in self.index.iter() {
                let Some(winner) = self.longest_claimant(claimants) else {
                    continue;
                };
                for id in claimants {
                    let combo = &mut self.combos[id.0];
                    if *id != winner && combo.hits > 0 {
                        combo.hits -= 1;
                    }
                }
            }
        }

        // 4. Finalise combos
        let can_update = controls_pressed > 0;
        for combo in &mut self.combos {
            combo.being_released = combo.being_released && combo.hits > 0;
            let pressed = can_update
                && combo.is_fully_hit()
                && (!combo.being_released || combo.is_pressed());
            combo.update(pressed, now, self.hold_threshold);
        }
    }

    /// Longest fully-hit combo among `claimants`. Between equal lengths an
    /// actively pressed combo beats one being released; otherwise the later
    /// claim wins.
    fn longest_claimant(&self, claimants: &[ComboId]) -> Option<ComboId> {
        let mut best: Option<ComboId> = None;
        for id in claimants {
            let combo = &self.combos[id.0];
            if !combo.is_fully_hit() {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let current = &self.combos[current.0];
                    combo.len() > current.len()
                        || (combo.len() == current.len()
                            && (!combo.being_released || current.being_released))
                }
            };
            if better {
                best = Some(*id);
            }
        }
        best
    }

    fn finalize_binds(&mut self, frame: u64) {
        for bind in &mut self.binds {
            bind.begin_tick();

            let changed = bind
                .combos
                .iter()
                .map(|id| &self.combos[id.0])
                .find(|combo| combo.has_transition());

            if let Some(combo) = changed {
                let events = bind.apply(combo, frame);
                for event in &events {
                    trace!(group = %self.name, bind = %bind, kind = %event.kind, frame, "bind transition");
                }
                self.events.extend(events);
            }

            let analog = bind
                .combos
                .iter()
                .map(|id| &self.combos[id.0])
                .find(|combo| combo.is_pressed())
                .map(Combo::analog_value)
                .unwrap_or(0.0);
            bind.set_analog_value(analog);
        }
    }
}
