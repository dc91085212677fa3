//! Combo state machine
//!
//! A combo is an unordered set of up to `MAX_COMBO_LENGTH` controls that
//! must be held together. The owning `BindGroup` computes the hit count every
//! tick and drives `update()`; the combo itself only tracks the resulting
//! pressed/held transitions, the hold timer and the analog sum.
//!
//! An empty combo is the canonical "unbound" state and never presses.

use std::fmt;
use std::time::Duration;

use crate::core::types::{BindId, ControlId};

/// State of one key combination inside a group.
#[derive(Clone, Debug, PartialEq)]
pub struct Combo {
    controls: Vec<ControlId>,
    owner: BindId,

    /// Controls satisfied this tick, after disambiguation.
    pub(crate) hits: usize,
    /// Partially released but still counted as pressed.
    pub(crate) being_released: bool,
    /// Sum of analog magnitudes of the pressed controls.
    pub(crate) analog_value: f32,

    pressed: bool,
    was_pressed: bool,
    held: bool,
    was_held: bool,
    pressed_at: Duration,
}

impl Combo {
    pub(crate) fn new(owner: BindId) -> Self {
        Self {
            controls: Vec::new(),
            owner,
            hits: 0,
            being_released: false,
            analog_value: 0.0,
            pressed: false,
            was_pressed: false,
            held: false,
            was_held: false,
            pressed_at: Duration::ZERO,
        }
    }

    /// Controls in assignment order.
    pub fn controls(&self) -> &[ControlId] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Bind whose slot holds this combo.
    pub fn owner(&self) -> BindId {
        self.owner
    }

    pub fn contains(&self, control: ControlId) -> bool {
        self.controls.contains(&control)
    }

    /// Exact set equality, ignoring order.
    pub fn matches(&self, controls: &[ControlId]) -> bool {
        self.controls.len() == controls.len() && controls.iter().all(|c| self.contains(*c))
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Pressed this tick and not on the previous evaluation.
    pub fn is_new_press(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_released(&self) -> bool {
        !self.pressed && self.was_pressed
    }

    pub fn is_being_released(&self) -> bool {
        self.being_released
    }

    pub fn analog_value(&self) -> f32 {
        self.analog_value
    }

    /// Pressed or held state changed during the last update.
    pub fn has_transition(&self) -> bool {
        self.pressed != self.was_pressed || self.held != self.was_held
    }

    pub(crate) fn is_fully_hit(&self) -> bool {
        !self.controls.is_empty() && self.hits == self.controls.len()
    }

    /// Replaces the key set and drops all runtime state.
    pub(crate) fn set_controls(&mut self, controls: Vec<ControlId>) {
        let owner = self.owner;
        *self = Self::new(owner);
        self.controls = controls;
    }

    /// Applies the group's verdict for this tick.
    pub(crate) fn update(&mut self, pressed: bool, now: Duration, hold_threshold: Duration) {
        self.was_pressed = self.pressed;
        self.was_held = self.held;
        self.pressed = pressed;

        if pressed && !self.was_pressed {
            self.pressed_at = now;
        }

        self.held = pressed && now.saturating_sub(self.pressed_at) >= hold_threshold;

        if !pressed {
            self.analog_value = 0.0;
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.controls.is_empty() {
            return write!(f, "<unbound>");
        }
        let parts = self
            .controls
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("+");
        write!(f, "{}", parts)
    }
}
