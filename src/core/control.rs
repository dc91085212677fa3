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

//! Control table and per-tick input state
//!
//! The `ControlRegistry` owns the fixed universe of bindable controls. It is
//! built once from a `ControlSource` and afterwards only the pressed/analog
//! fields change, refreshed by the host through an `InputSource` before each
//! engine update.
//!
//! # Layout
//! - Indices `0..=255`: raw platform codes (reserved codes are inert slots)
//! - Index `256`: scroll-up pseudo-control (analog)
//! - Index `257`: scroll-down pseudo-control (analog)
//!
//! # Lookup
//! Name lookup is case-insensitive. The canonical name table is checked
//! first, then the short display names.

use std::collections::HashMap;
use tracing::debug;

use crate::core::keys::{ControlSource, VirtualKeySource, RAW_CODE_COUNT, RESERVED_CODES};
use crate::core::types::ControlId;

/// Index of the synthetic scroll-up control.
pub const SCROLL_UP_INDEX: usize = RAW_CODE_COUNT;
/// Index of the synthetic scroll-down control.
pub const SCROLL_DOWN_INDEX: usize = RAW_CODE_COUNT + 1;
/// Total number of slots in the control table.
pub const CONTROL_COUNT: usize = RAW_CODE_COUNT + 2;

/// A single input source: key, mouse button or scroll direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Control {
    index: usize,
    name: String,
    display_name: String,
    is_analog: bool,
    bindable: bool,
    pressed: bool,
    was_pressed: bool,
    magnitude: f32,
}

impl Control {
    fn placeholder(index: usize) -> Self {
        Self {
            index,
            name: String::new(),
            display_name: String::new(),
            is_analog: false,
            bindable: false,
            pressed: false,
            was_pressed: false,
            magnitude: 0.0,
        }
    }

    fn analog(index: usize, name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_analog: true,
            bindable: true,
            ..Self::placeholder(index)
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Canonical name, used when exporting binds.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_analog(&self) -> bool {
        self.is_analog
    }

    /// False for reserved and unassigned slots.
    pub fn is_bindable(&self) -> bool {
        self.bindable
    }

    /// Id usable in combos, or `None` for inert slots.
    pub fn id(&self) -> Option<ControlId> {
        self.bindable.then(|| ControlId::new(self.index))
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Pressed this tick but not on the previous one.
    pub fn is_new_press(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    /// Analog magnitude this tick, zero for digital or released controls.
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    fn apply(&mut self, sample: ControlSample) {
        self.was_pressed = self.pressed;
        self.pressed = self.bindable && sample.pressed;
        self.magnitude = if self.pressed && self.is_analog {
            sample.magnitude
        } else {
            0.0
        };
    }
}

/// Raw state of one control for one tick, as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSample {
    pub pressed: bool,
    pub magnitude: f32,
}

impl ControlSample {
    pub fn pressed() -> Self {
        Self {
            pressed: true,
            magnitude: 1.0,
        }
    }

    pub fn released() -> Self {
        Self::default()
    }

    /// Analog sample; counts as pressed while the magnitude is positive.
    pub fn analog(magnitude: f32) -> Self {
        Self {
            pressed: magnitude > 0.0,
            magnitude,
        }
    }
}

/// Per-tick poll of the host's raw input.
pub trait InputSource {
    fn sample(&mut self, control: &Control) -> ControlSample;
}

impl<F> InputSource for F
where
    F: FnMut(&Control) -> ControlSample,
{
    fn sample(&mut self, control: &Control) -> ControlSample {
        self(control)
    }
}

/// The fixed table of controls plus case-insensitive name indices.
#[derive(Clone, Debug)]
pub struct ControlRegistry {
    controls: Vec<Control>,
    by_name: HashMap<String, ControlId>,
    by_display_name: HashMap<String, ControlId>,
}

impl ControlRegistry {
    /// Builds the table from the built-in virtual-key enumeration.
    pub fn new() -> Self {
        Self::build(&VirtualKeySource)
    }

    /// Builds the table from a host enumeration.
    ///
    /// Every raw code keeps its numeric slot. Reserved codes and codes the
    /// source never reports stay as inert placeholders that cannot be looked
    /// up. The two scroll pseudo-controls are appended after the raw range.
    pub fn build(source: &impl ControlSource) -> Self {
        let mut controls: Vec<Control> = (0..CONTROL_COUNT).map(Control::placeholder).collect();
        let mut by_name = HashMap::new();
        let mut by_display_name = HashMap::new();

        for raw in source.raw_controls() {
            let index = raw.code as usize;
            let reserved = RESERVED_CODES.contains(&raw.code);
            let display_name = raw.display_name.unwrap_or_else(|| raw.name.clone());

            let control = &mut controls[index];
            control.bindable = !reserved;
            control.name = raw.name;
            control.display_name = display_name;

            if reserved {
                continue;
            }

            let id = ControlId::new(index);
            by_name.entry(control.name.to_lowercase()).or_insert(id);
            by_display_name
                .entry(control.display_name.to_lowercase())
                .or_insert(id);
        }

        controls[SCROLL_UP_INDEX] = Control::analog(SCROLL_UP_INDEX, "ScrollUp", "Scroll Up");
        controls[SCROLL_DOWN_INDEX] =
            Control::analog(SCROLL_DOWN_INDEX, "ScrollDown", "Scroll Down");

        for index in [SCROLL_UP_INDEX, SCROLL_DOWN_INDEX] {
            let id = ControlId::new(index);
            let control = &controls[index];
            by_name.insert(control.name.to_lowercase(), id);
            by_display_name.insert(control.display_name.to_lowercase(), id);
        }

        debug!(
            bindable = by_name.len(),
            slots = controls.len(),
            "built control registry"
        );

        Self {
            controls,
            by_name,
            by_display_name,
        }
    }

    /// Case-insensitive lookup by canonical name, then by display name.
    pub fn lookup_by_name(&self, name: &str) -> Option<ControlId> {
        let key = name.trim().to_lowercase();
        self.by_name
            .get(&key)
            .or_else(|| self.by_display_name.get(&key))
            .copied()
    }

    /// Direct table access.
    ///
    /// # Panics
    /// Panics if `index >= CONTROL_COUNT`.
    pub fn lookup_by_index(&self, index: usize) -> &Control {
        &self.controls[index]
    }

    /// Id of the control at `index` if that slot is bindable.
    pub fn bindable(&self, index: usize) -> Option<ControlId> {
        self.controls.get(index).and_then(Control::id)
    }

    pub fn control(&self, id: ControlId) -> &Control {
        &self.controls[id.index()]
    }

    pub fn name(&self, id: ControlId) -> &str {
        self.control(id).name()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// All slots, including inert placeholders.
    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub fn bindable_controls(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(|c| c.bindable)
    }

    /// Polls every control once. Call exactly once per tick, before the
    /// engine update.
    pub fn refresh(&mut self, source: &mut impl InputSource) {
        for control in &mut self.controls {
            let sample = source.sample(control);
            control.apply(sample);
        }
    }

    /// Refresh where exactly the given controls are held down.
    pub fn refresh_pressed(&mut self, pressed: &[ControlId]) {
        self.refresh(&mut |control: &Control| {
            if pressed.iter().any(|id| id.index() == control.index()) {
                ControlSample::pressed()
            } else {
                ControlSample::released()
            }
        });
    }
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_fixed_size() {
        let registry = ControlRegistry::new();
        assert_eq!(registry.len(), CONTROL_COUNT);
        assert_eq!(registry.lookup_by_index(SCROLL_UP_INDEX).name(), "ScrollUp");
        assert!(registry.lookup_by_index(SCROLL_DOWN_INDEX).is_analog());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ControlRegistry::new();
        let upper = registry.lookup_by_name("W");
        assert!(upper.is_some());
        assert_eq!(registry.lookup_by_name("w"), upper);
        assert_eq!(registry.lookup_by_name("return"), registry.lookup_by_name("ENTER"));
    }

    #[test]
    fn test_new_press_only_on_first_tick() {
        let mut registry = ControlRegistry::new();
        let w = registry.lookup_by_name("W").unwrap();

        registry.refresh_pressed(&[w]);
        assert!(registry.control(w).is_new_press());

        registry.refresh_pressed(&[w]);
        assert!(registry.control(w).is_pressed());
        assert!(!registry.control(w).is_new_press());
    }
}
