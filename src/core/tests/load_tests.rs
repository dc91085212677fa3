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

//! Bulk load, export and transaction tests
//!
//! - Loading is all-or-nothing: a rejected load leaves the group exactly
//!   as it was
//! - Exported data loads back into an identical group
//! - Transactions roll back when dropped without commit

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use proptest::prelude::*;

use super::support::Harness;
use crate::core::{AliasDefinition, BindDefinition, BindError, ControlId};

fn snapshot(h: &Harness) -> Vec<Vec<ControlId>> {
    h.group.combos().map(|c| c.controls().to_vec()).collect()
}

fn player() -> Harness {
    let mut h = Harness::new();
    h.bind("Walk", &["W"]);
    h.bind("Sprint", &["W", "X"]);
    h.bind("Jump", &["Space"]);
    h
}

#[test]
fn test_load_assigns_slots() {
    let mut h = player();
    let defs = vec![
        BindDefinition::simple("jump", vec!["C"]),
        BindDefinition::extended(
            "Walk",
            Some(vec!["Up".to_string()]),
            vec![AliasDefinition {
                control_names: Some(vec!["W".to_string()]),
            }],
        ),
    ];

    h.group.load_bind_data(&defs, &h.controls).unwrap();

    let jump = h.group.find_bind("Jump").unwrap();
    let walk = h.group.find_bind("Walk").unwrap();
    assert_eq!(h.group.combo_controls(jump, 0).unwrap(), h.ids(&["C"]).as_slice());
    assert_eq!(h.group.combo_controls(walk, 0).unwrap(), h.ids(&["Up"]).as_slice());
    assert_eq!(h.group.combo_controls(walk, 1).unwrap(), h.ids(&["W"]).as_slice());
}

#[test]
fn test_load_swaps_combos_between_binds() {
    let mut h = player();
    let defs = vec![
        BindDefinition::simple("Walk", vec!["Space"]),
        BindDefinition::simple("Jump", vec!["W"]),
    ];

    h.group.load_bind_data(&defs, &h.controls).unwrap();

    let walk = h.group.find_bind("Walk").unwrap();
    assert_eq!(h.group.combo_controls(walk, 0).unwrap(), h.ids(&["Space"]).as_slice());
}

#[test]
fn test_load_unbinds_unmentioned_aliases() {
    let mut h = player();
    let walk = h.group.find_bind("Walk").unwrap();
    let up = h.ids(&["Up"]);
    h.group.set_combo(walk, 1, &up, true).unwrap();

    h.group
        .load_bind_data(&[BindDefinition::simple("Walk", vec!["W"])], &h.controls)
        .unwrap();

    assert!(h.group.combo_controls(walk, 1).unwrap().is_empty());
    assert!(h.group.claimants(up[0]).is_empty());
}

#[test]
fn test_reload_identical_data_keeps_held_bind() {
    let mut h = player();
    let jump = h.group.find_bind("Jump").unwrap();
    h.tick(&["Space"]);
    assert!(h.pressed(jump));

    let changes = Rc::new(Cell::new(0));
    let c = changes.clone();
    h.group.subscribe_binds_changed(move |_| c.set(c.get() + 1));

    let exported = h.group.export(&h.controls);
    h.group.load_bind_data(&exported, &h.controls).unwrap();
    assert!(h.pressed(jump));

    h.tick(&["Space"]);
    assert!(h.pressed(jump));
    assert!(h.group.events().is_empty());
    assert_eq!(changes.get(), 0);
}

#[test]
fn test_reload_only_rebuilds_changed_slots() {
    let mut h = player();
    let jump = h.group.find_bind("Jump").unwrap();
    let walk = h.group.find_bind("Walk").unwrap();
    h.tick(&["Space", "W"]);

    let defs = vec![
        BindDefinition::simple("Jump", vec!["Space"]),
        BindDefinition::simple("Walk", vec!["Q"]),
    ];
    h.group.load_bind_data(&defs, &h.controls).unwrap();
    assert!(h.pressed(jump));
    assert!(!h.pressed(walk));

    h.tick(&["Space", "W"]);
    assert!(h.group.events().is_empty());
    assert!(h.pressed(jump));
}

#[test]
fn test_unknown_bind_rolls_back() {
    let mut h = player();
    let before = snapshot(&h);
    let exported = h.group.export(&h.controls);

    let defs = vec![
        BindDefinition::simple("Walk", vec!["Q"]),
        BindDefinition::simple("Fly", vec!["F"]),
    ];
    let result = h.group.load_bind_data(&defs, &h.controls);

    assert_eq!(result, Err(BindError::UnknownBind("Fly".to_string())));
    assert_eq!(snapshot(&h), before);
    assert_eq!(h.group.export(&h.controls), exported);
}

#[test]
fn test_unknown_control_rolls_back() {
    let mut h = player();
    let before = snapshot(&h);

    let defs = vec![BindDefinition::simple("Walk", vec!["Hyperspace"])];
    let result = h.group.load_bind_data(&defs, &h.controls);

    assert_eq!(result, Err(BindError::UnknownControl("Hyperspace".to_string())));
    assert_eq!(snapshot(&h), before);
}

#[test]
fn test_conflict_midway_rolls_back() {
    let mut h = player();
    let before = snapshot(&h);
    let walk = h.group.find_bind("Walk").unwrap();
    let w = h.id("W");

    // The first definition applies cleanly, the second collides with Sprint
    let defs = vec![
        BindDefinition::simple("Walk", vec!["Q"]),
        BindDefinition::simple("Jump", vec!["X", "W"]),
    ];
    let result = h.group.load_bind_data(&defs, &h.controls);

    assert!(matches!(result, Err(BindError::ComboConflict { .. })));
    assert_eq!(snapshot(&h), before);
    assert_eq!(h.group.combo_controls(walk, 0).unwrap(), &[w]);
    assert_eq!(h.group.claimants(w).len(), 2);
}

#[test]
fn test_too_long_combo_rolls_back() {
    let mut h = player();
    let before = snapshot(&h);

    let defs = vec![BindDefinition::simple("Walk", vec!["A", "B", "C", "D"])];
    let result = h.group.load_bind_data(&defs, &h.controls);

    assert_eq!(result, Err(BindError::ComboTooLong { len: 4, max: 3 }));
    assert_eq!(snapshot(&h), before);
}

#[test]
fn test_non_strict_load_keeps_conflicts() {
    let mut h = player();
    let defs = vec![BindDefinition::simple("Jump", vec!["W"])];

    h.group.load_bind_data_with(&defs, &h.controls, false).unwrap();
    assert_eq!(h.group.find_conflicts().len(), 1);
}

#[test]
fn test_export_shapes() {
    let mut h = player();
    let walk = h.group.find_bind("Walk").unwrap();
    let up = h.ids(&["Up"]);
    h.group.set_combo(walk, 1, &up, true).unwrap();

    let exported = h.group.export(&h.controls);
    assert_eq!(
        exported[0],
        BindDefinition::extended(
            "Walk",
            Some(vec!["W".to_string()]),
            vec![AliasDefinition {
                control_names: Some(vec!["Up".to_string()]),
            }],
        )
    );
    assert_eq!(exported[1], BindDefinition::simple("Sprint", vec!["W", "X"]));
}

#[test]
fn test_transaction_drop_rolls_back() {
    let mut h = player();
    let before = snapshot(&h);
    let q = h.ids(&["Q"]);

    {
        let mut tx = h.group.begin_transaction();
        let walk = tx.group().find_bind("Walk").unwrap();
        tx.group().set_combo(walk, 0, &q, true).unwrap();
        tx.group().register_bind("Fly").unwrap();
    }

    assert_eq!(snapshot(&h), before);
    assert!(h.group.find_bind("Fly").is_none());
    assert_eq!(h.group.bind_count(), 3);
}

#[test]
fn test_transaction_commit_keeps_changes() {
    let mut h = player();
    let q = h.ids(&["Q"]);

    let mut tx = h.group.begin_transaction();
    let fly = tx.group().register_bind("Fly").unwrap();
    tx.group().set_combo(fly, 0, &q, true).unwrap();
    tx.commit();

    assert_eq!(h.group.combo_controls(fly, 0).unwrap(), q.as_slice());
}

// ---- export / load round trip --------------------------------------------

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Distinct combos of 1..=3 letters, split into binds of 1..=3 slots.
fn layout() -> impl Strategy<Value = Vec<Vec<BTreeSet<usize>>>> {
    (
        prop::collection::hash_set(prop::collection::btree_set(0usize..26, 1..=3), 1..10),
        1usize..=3,
    )
        .prop_map(|(combos, per_bind)| {
            let combos: Vec<_> = combos.into_iter().collect();
            combos.chunks(per_bind).map(|c| c.to_vec()).collect()
        })
}

fn letter_names(set: &BTreeSet<usize>) -> Vec<String> {
    set.iter()
        .map(|&i| LETTERS[i..=i].to_string())
        .collect()
}

proptest! {
    #[test]
    fn prop_export_then_load_reproduces_group(binds in layout()) {
        let mut source = Harness::new();
        for (n, slots) in binds.iter().enumerate() {
            let bind = source.group.register_bind(&format!("Bind{}", n)).unwrap();
            for (slot, set) in slots.iter().enumerate() {
                let ids = source.ids(
                    &letter_names(set).iter().map(String::as_str).collect::<Vec<_>>(),
                );
                source.group.set_combo(bind, slot, &ids, true).unwrap();
            }
        }
        let exported = source.group.export(&source.controls);

        let mut target = Harness::new();
        for n in 0..binds.len() {
            target.group.register_bind(&format!("Bind{}", n)).unwrap();
        }
        target.group.load_bind_data(&exported, &target.controls).unwrap();

        prop_assert_eq!(target.group.export(&target.controls), exported);
        for bind in source.group.binds() {
            let other = target.group.find_bind(bind.name()).unwrap();
            let theirs: Vec<BTreeSet<ControlId>> = target
                .group
                .bind_combos(other)
                .map(|c| c.controls().iter().copied().collect())
                .collect();
            let ours: Vec<BTreeSet<ControlId>> = source
                .group
                .bind_combos(bind.id())
                .map(|c| c.controls().iter().copied().collect())
                .collect();
            prop_assert_eq!(ours, theirs);
        }
        prop_assert!(target.group.find_conflicts().is_empty());
    }
}
