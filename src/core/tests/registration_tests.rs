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

//! Bind registration and combo assignment tests
//!
//! Covers name rules, combo length limits, strict and non-strict conflict
//! checks, alias slots and the index of claimed controls.

use super::support::Harness;
use crate::core::BindError;

#[test]
fn test_register_rejects_blank_and_duplicate_names() {
    let mut h = Harness::new();
    assert!(matches!(
        h.group.register_bind("   "),
        Err(BindError::InvalidBindName(_))
    ));

    h.group.register_bind("Jump").unwrap();
    assert!(matches!(
        h.group.register_bind("JUMP"),
        Err(BindError::DuplicateBindName(_))
    ));
    assert_eq!(h.group.bind_count(), 1);
}

#[test]
fn test_find_bind_is_case_insensitive() {
    let mut h = Harness::new();
    let jump = h.group.register_bind("Jump").unwrap();

    assert_eq!(h.group.find_bind("jump"), Some(jump));
    assert_eq!(h.group.find_bind(" JUMP "), Some(jump));
    assert_eq!(h.group.bind_by_name("jUmP").unwrap().name(), "Jump");
    assert!(h.group.find_bind("Duck").is_none());
}

#[test]
fn test_new_bind_starts_unbound() {
    let mut h = Harness::new();
    let jump = h.group.register_bind("Jump").unwrap();

    assert_eq!(h.group.bind(jump).alias_count(), 0);
    assert!(h.group.combo_controls(jump, 0).unwrap().is_empty());
    assert!(h.group.combo_controls(jump, 1).is_none());
}

#[test]
fn test_combo_longer_than_three_rejected() {
    let mut h = Harness::new();
    let bind = h.group.register_bind("Macro").unwrap();
    let ids = h.ids(&["A", "B", "C", "D"]);

    let result = h.group.set_combo(bind, 0, &ids, true);
    assert_eq!(result, Err(BindError::ComboTooLong { len: 4, max: 3 }));
    assert!(h.group.combo_controls(bind, 0).unwrap().is_empty());
}

#[test]
fn test_three_control_combo_accepted() {
    let mut h = Harness::new();
    let bind = h.bind("SaveAll", &["ControlKey", "ShiftKey", "S"]);
    assert_eq!(h.group.combo_controls(bind, 0).unwrap().len(), 3);
}

#[test]
fn test_duplicate_controls_collapse() {
    let mut h = Harness::new();
    let bind = h.group.register_bind("Jump").unwrap();
    let ids = h.ids(&["Space", "Space", "Space", "Space"]);

    h.group.set_combo(bind, 0, &ids, true).unwrap();
    assert_eq!(h.group.combo_controls(bind, 0).unwrap(), h.ids(&["Space"]).as_slice());
}

#[test]
fn test_strict_conflict_rejected_and_unchanged() {
    let mut h = Harness::new();
    h.bind("Sprint", &["W", "X"]);
    let dash = h.bind("Dash", &["D"]);

    let ids = h.ids(&["X", "W"]);
    let result = h.group.set_combo(dash, 0, &ids, true);
    assert_eq!(
        result,
        Err(BindError::ComboConflict {
            bind: "Dash".to_string(),
            existing: "Sprint".to_string(),
        })
    );
    assert_eq!(h.group.combo_controls(dash, 0).unwrap(), h.ids(&["D"]).as_slice());
}

#[test]
fn test_non_strict_allows_duplicate_set() {
    let mut h = Harness::new();
    h.bind("Sprint", &["W", "X"]);
    let dash = h.group.register_bind("Dash").unwrap();

    let ids = h.ids(&["W", "X"]);
    assert!(h.group.set_combo(dash, 0, &ids, false).is_ok());
    assert_eq!(h.group.find_conflicts().len(), 1);
}

#[test]
fn test_subset_is_not_a_conflict() {
    let mut h = Harness::new();
    h.bind("Sprint", &["W", "X"]);
    let walk = h.group.register_bind("Walk").unwrap();

    let ids = h.ids(&["W"]);
    assert!(h.group.set_combo(walk, 0, &ids, true).is_ok());
}

#[test]
fn test_reassigning_same_set_to_own_slot_is_allowed() {
    let mut h = Harness::new();
    let sprint = h.bind("Sprint", &["W", "X"]);

    let ids = h.ids(&["X", "W"]);
    assert!(h.group.set_combo(sprint, 0, &ids, true).is_ok());
}

#[test]
fn test_empty_combo_always_accepted() {
    let mut h = Harness::new();
    let a = h.group.register_bind("A").unwrap();
    let b = h.group.register_bind("B").unwrap();

    assert!(h.group.set_combo(a, 0, &[], true).is_ok());
    assert!(h.group.set_combo(b, 0, &[], true).is_ok());
    assert!(h.group.find_conflicts().is_empty());
}

#[test]
fn test_does_combo_conflict_respects_exclusion() {
    let mut h = Harness::new();
    let sprint = h.bind("Sprint", &["W", "X"]);
    let combo = h.group.bind(sprint).primary_combo();
    let ids = h.ids(&["X", "W"]);

    assert!(h.group.does_combo_conflict(&ids, None));
    assert!(!h.group.does_combo_conflict(&ids, Some(combo)));
    assert!(!h.group.does_combo_conflict(&h.ids(&["W"]), None));
    assert!(!h.group.does_combo_conflict(&[], None));
}

#[test]
fn test_alias_slots_append_in_order() {
    let mut h = Harness::new();
    let fire = h.bind("Fire", &["LButton"]);

    let f = h.ids(&["F"]);
    let g = h.ids(&["G"]);
    h.group.set_combo(fire, 1, &f, true).unwrap();
    h.group.set_combo(fire, 2, &g, true).unwrap();

    assert_eq!(h.group.bind(fire).alias_count(), 2);
    assert_eq!(h.group.combo_controls(fire, 2).unwrap(), g.as_slice());
}

#[test]
fn test_alias_slot_gap_rejected() {
    let mut h = Harness::new();
    let fire = h.bind("Fire", &["LButton"]);
    let f = h.ids(&["F"]);

    let result = h.group.set_combo(fire, 2, &f, true);
    assert_eq!(
        result,
        Err(BindError::InvalidAliasSlot {
            bind: "Fire".to_string(),
            slot: 2,
            slots: 1,
        })
    );
    assert_eq!(h.group.bind(fire).alias_count(), 0);
}

#[test]
fn test_index_tracks_claims() {
    let mut h = Harness::new();
    let walk = h.bind("Walk", &["W"]);
    let sprint = h.bind("Sprint", &["W", "X"]);
    let w = h.id("W");

    let walk_combo = h.group.bind(walk).primary_combo();
    let sprint_combo = h.group.bind(sprint).primary_combo();
    assert_eq!(h.group.claimants(w), &[walk_combo, sprint_combo]);

    h.group.clear_combo(walk, 0).unwrap();
    assert_eq!(h.group.claimants(w), &[sprint_combo]);

    h.group.clear_combo(sprint, 0).unwrap();
    assert!(h.group.claimants(w).is_empty());
    assert_eq!(h.group.used_controls().count(), 0);
}

#[test]
fn test_set_combo_by_names() {
    let mut h = Harness::new();
    let jump = h.group.register_bind("Jump").unwrap();

    h.group
        .set_combo_by_names(jump, 0, &["space"], &h.controls, true)
        .unwrap();
    assert_eq!(h.group.combo_controls(jump, 0).unwrap(), h.ids(&["Space"]).as_slice());

    let result = h
        .group
        .set_combo_by_names(jump, 0, &["NoSuchKey"], &h.controls, true);
    assert_eq!(result, Err(BindError::UnknownControl("NoSuchKey".to_string())));
}

#[test]
fn test_reserved_codes_cannot_be_named() {
    let h = Harness::new();
    assert!(h.controls.lookup_by_name("LWin").is_none());
    assert!(h.controls.lookup_by_name("LShiftKey").is_none());
    assert!(h.controls.lookup_by_name("ShiftKey").is_some());
}

#[test]
fn test_bindable_by_index() {
    let h = Harness::new();
    assert_eq!(h.controls.bindable(0x20), Some(h.id("Space")));
    assert!(h.controls.bindable(0x00).is_none());
    assert!(h.controls.bindable(0x5B).is_none());
    assert_eq!(h.controls.bindable(256), Some(h.id("ScrollUp")));
    assert!(h.controls.bindable(4096).is_none());
}

#[test]
fn test_clear_drops_everything() {
    let mut h = Harness::new();
    h.bind("Jump", &["Space"]);
    h.group.clear();

    assert_eq!(h.group.bind_count(), 0);
    assert_eq!(h.group.combos().count(), 0);
    assert!(h.group.find_bind("Jump").is_none());
    assert!(h.group.register_bind("Jump").is_ok());
}
