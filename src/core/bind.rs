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

//! Named binds
//!
//! A `Bind` is the user-facing handle: a name plus an ordered list of combo
//! slots. Slot 0 is the primary combo, later slots are aliases. Each tick the
//! group hands the bind the first of its combos that changed state, and the
//! bind turns that into press/held/release transitions and notifications.
//!
//! Consumers read state through the `is_*` accessors or subscribe to
//! transitions with `subscribe()`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::combo::Combo;
use crate::core::observer::{Observers, SubscriptionId};
use crate::core::types::{BindId, ComboId};

/// Kind of bind transition.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum BindEventKind {
    /// Bind went from released to pressed.
    NewPress,
    /// Bind has been pressed for at least the hold threshold.
    Held,
    /// Bind went from pressed to released.
    Released,
}

impl fmt::Display for BindEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindEventKind::NewPress => write!(f, "press"),
            BindEventKind::Held => write!(f, "held"),
            BindEventKind::Released => write!(f, "release"),
        }
    }
}

/// A transition raised by a bind during a group update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BindEvent {
    pub bind: BindId,
    pub kind: BindEventKind,
    /// Frame of the tick that produced the event.
    pub frame: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct BindState {
    pressed: bool,
    new_press: bool,
    held: bool,
    released: bool,
    analog_value: f32,
}

/// A named keybind backed by a primary combo and optional aliases.
#[derive(Debug)]
pub struct Bind {
    id: BindId,
    name: String,
    pub(crate) combos: Vec<ComboId>,
    pub(crate) state: BindState,
    on_new_press: Observers<BindEvent>,
    on_held: Observers<BindEvent>,
    on_released: Observers<BindEvent>,
}

impl Bind {
    pub(crate) fn new(id: BindId, name: &str, primary: ComboId) -> Self {
        Self {
            id,
            name: name.to_string(),
            combos: vec![primary],
            state: BindState::default(),
            on_new_press: Observers::new(),
            on_held: Observers::new(),
            on_released: Observers::new(),
        }
    }

    pub fn id(&self) -> BindId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Combo slots in priority order; index 0 is the primary combo.
    pub fn combo_ids(&self) -> &[ComboId] {
        &self.combos
    }

    pub fn primary_combo(&self) -> ComboId {
        self.combos[0]
    }

    /// Number of alias slots (excluding the primary).
    pub fn alias_count(&self) -> usize {
        self.combos.len() - 1
    }

    pub fn is_pressed(&self) -> bool {
        self.state.pressed
    }

    pub fn is_new_press(&self) -> bool {
        self.state.new_press
    }

    pub fn is_held(&self) -> bool {
        self.state.held
    }

    pub fn is_released(&self) -> bool {
        self.state.released
    }

    /// Analog sum of the first pressed combo, zero otherwise.
    pub fn analog_value(&self) -> f32 {
        self.state.analog_value
    }

    /// Registers a callback for one kind of transition.
    pub fn subscribe(
        &mut self,
        kind: BindEventKind,
        callback: impl FnMut(&BindEvent) + 'static,
    ) -> SubscriptionId {
        self.observers_mut(kind).subscribe(callback)
    }

    /// Removes a subscription made with `subscribe`. Returns false if the
    /// handle is unknown to this bind.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_new_press.unsubscribe(id)
            || self.on_held.unsubscribe(id)
            || self.on_released.unsubscribe(id)
    }

    pub fn clear_subscribers(&mut self) {
        self.on_new_press.clear();
        self.on_held.clear();
        self.on_released.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.on_new_press.len() + self.on_held.len() + self.on_released.len()
    }

    fn observers_mut(&mut self, kind: BindEventKind) -> &mut Observers<BindEvent> {
        match kind {
            BindEventKind::NewPress => &mut self.on_new_press,
            BindEventKind::Held => &mut self.on_held,
            BindEventKind::Released => &mut self.on_released,
        }
    }

    /// Clears the one-tick flags before the group samples combos.
    pub(crate) fn begin_tick(&mut self) {
        self.state.new_press = false;
        self.state.released = false;
    }

    pub(crate) fn reset_state(&mut self) {
        self.state = BindState::default();
    }

    pub(crate) fn set_analog_value(&mut self, value: f32) {
        self.state.analog_value = value;
    }

    /// Takes over the state of the combo that transitioned this tick and
    /// notifies subscribers. Returns the raised events in order.
    pub(crate) fn apply(&mut self, combo: &Combo, frame: u64) -> Vec<BindEvent> {
        let was_pressed = self.state.pressed;
        let was_held = self.state.held;

        self.state.pressed = combo.is_pressed();
        self.state.held = combo.is_held();
        self.state.new_press = self.state.pressed && !was_pressed;
        self.state.released = !self.state.pressed && was_pressed;

        let mut events = Vec::new();
        if self.state.new_press {
            events.push(BindEventKind::NewPress);
        }
        if self.state.held && !was_held {
            events.push(BindEventKind::Held);
        }
        if self.state.released {
            events.push(BindEventKind::Released);
        }

        events
            .into_iter()
            .map(|kind| {
                let event = BindEvent {
                    bind: self.id,
                    kind,
                    frame,
                };
                self.observers_mut(kind).notify(&event);
                event
            })
            .collect()
    }
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
