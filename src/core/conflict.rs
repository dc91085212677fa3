//! Exact-match conflict reporting
//!
//! Strict assignment keeps identical combos out of a group, but non-strict
//! assignment and bulk loads with `strict = false` may let them in. This
//! module finds them after the fact using HashMap-based indexing on the
//! sorted control set.
//!
//! # Performance
//! - Add combo: O(k log k) for k <= 3 controls, effectively O(1)
//! - List all conflicts: O(n) where n = number of distinct control sets

use std::collections::HashMap;

use crate::core::combo::Combo;
use crate::core::types::{BindId, ComboId, ControlId};

/// Groups live combos by their (order-independent) control set.
pub struct ConflictDetector {
    /// Sorted control set -> combos using it, in insertion order.
    combos: HashMap<Vec<ControlId>, Vec<(ComboId, BindId)>>,
}

/// A control set shared by two or more live combos.
#[derive(Clone, Debug, PartialEq)]
pub struct ComboConflict {
    /// The shared controls, sorted by index.
    pub controls: Vec<ControlId>,

    /// Every combo using the set (always 2 or more).
    pub combos: Vec<ComboId>,

    /// Owning bind of each entry in `combos`.
    pub binds: Vec<BindId>,
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self {
            combos: HashMap::new(),
        }
    }

    /// Tracks a combo. Unbound combos are ignored.
    pub fn add_combo(&mut self, id: ComboId, combo: &Combo) {
        if combo.is_empty() {
            return;
        }
        let mut key = combo.controls().to_vec();
        key.sort();
        self.combos.entry(key).or_default().push((id, combo.owner()));
    }

    /// Finds all control sets with 2 or more combos, ordered by control set.
    pub fn find_conflicts(&self) -> Vec<ComboConflict> {
        let mut conflicts: Vec<ComboConflict> = self
            .combos
            .iter()
            .filter(|(_, entries)| entries.len() > 1)
            .map(|(controls, entries)| ComboConflict {
                controls: controls.clone(),
                combos: entries.iter().map(|(combo, _)| *combo).collect(),
                binds: entries.iter().map(|(_, bind)| *bind).collect(),
            })
            .collect();
        conflicts.sort_by(|a, b| a.controls.cmp(&b.controls));
        conflicts
    }

    /// Checks whether a control set is used by 2 or more combos.
    pub fn has_conflict(&self, controls: &[ControlId]) -> bool {
        let mut key = controls.to_vec();
        key.sort();
        self.combos
            .get(&key)
            .map(|entries| entries.len() > 1)
            .unwrap_or(false)
    }

    /// Total number of live combos tracked.
    pub fn total_combos(&self) -> usize {
        self.combos.values().map(|v| v.len()).sum()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}
