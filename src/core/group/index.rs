//! Inverted index from controls to the combos that claim them
//!
//! A control is "used" exactly when at least one combo claims it. The map
//! only ever holds non-empty claim lists, so the set of keys *is* the used
//! control list and the two can never drift apart.

use std::collections::BTreeMap;

use crate::core::types::{ComboId, ControlId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlIndex {
    claims: BTreeMap<ControlId, Vec<ComboId>>,
}

impl ControlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `combo` uses `control`. Claims are kept in arrival order.
    pub fn claim(&mut self, control: ControlId, combo: ComboId) {
        let claimants = self.claims.entry(control).or_default();
        if !claimants.contains(&combo) {
            claimants.push(combo);
        }
    }

    /// Drops `combo`'s claim on `control`; forgets the control if that was
    /// the last claim.
    pub fn release(&mut self, control: ControlId, combo: ComboId) {
        if let Some(claimants) = self.claims.get_mut(&control) {
            claimants.retain(|c| *c != combo);
            if claimants.is_empty() {
                self.claims.remove(&control);
            }
        }
    }

    pub fn claimants(&self, control: ControlId) -> &[ComboId] {
        self.claims.get(&control).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_used(&self, control: ControlId) -> bool {
        self.claims.contains_key(&control)
    }

    pub fn used_controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.claims.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlId, &[ComboId])> + '_ {
        self.claims.iter().map(|(c, combos)| (*c, combos.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }
}
