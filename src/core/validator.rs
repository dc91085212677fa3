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

//! Input validation for binds and combos
//!
//! Validation happens before any state is touched, so a rejected request
//! never leaves a group half-modified. Control ids are already guaranteed
//! bindable by construction; what remains to check here is:
//! - Combo length against `MAX_COMBO_LENGTH` (after removing duplicates)
//! - Bind names (non-empty after trimming)
//! - Control names resolving against the registry

use crate::core::control::ControlRegistry;
use crate::core::error::BindError;
use crate::core::types::{ControlId, MAX_COMBO_LENGTH};

/// Normalises a control list into a combo key set
///
/// Duplicates are dropped while keeping first-seen order, so
/// `[W, X, W]` becomes `[W, X]`. The result may be empty (unbound).
pub fn validate_combo(controls: &[ControlId]) -> Result<Vec<ControlId>, BindError> {
    let mut unique: Vec<ControlId> = Vec::with_capacity(controls.len());
    for &control in controls {
        if !unique.contains(&control) {
            unique.push(control);
        }
    }

    if unique.len() > MAX_COMBO_LENGTH {
        return Err(BindError::ComboTooLong {
            len: unique.len(),
            max: MAX_COMBO_LENGTH,
        });
    }

    Ok(unique)
}

/// Validates a bind name and returns it trimmed.
pub fn validate_bind_name(name: &str) -> Result<&str, BindError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(BindError::InvalidBindName(name.to_string()))
    } else {
        Ok(trimmed)
    }
}

/// Resolves control names (canonical or display) to ids.
pub fn resolve_control_names<S: AsRef<str>>(
    registry: &ControlRegistry,
    names: &[S],
) -> Result<Vec<ControlId>, BindError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            registry
                .lookup_by_name(name)
                .ok_or_else(|| BindError::UnknownControl(name.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(registry: &ControlRegistry, names: &[&str]) -> Vec<ControlId> {
        resolve_control_names(registry, names).unwrap()
    }

    #[test]
    fn test_duplicates_are_removed() {
        let registry = ControlRegistry::new();
        let controls = ids(&registry, &["W", "X", "w"]);
        assert_eq!(validate_combo(&controls).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_four_controls() {
        let registry = ControlRegistry::new();
        let controls = ids(&registry, &["A", "B", "C", "D"]);
        assert_eq!(
            validate_combo(&controls),
            Err(BindError::ComboTooLong { len: 4, max: 3 })
        );
    }

    #[test]
    fn test_empty_combo_is_valid() {
        assert_eq!(validate_combo(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_bind_name() {
        assert_eq!(validate_bind_name("  Jump "), Ok("Jump"));
        assert!(validate_bind_name("   ").is_err());
    }

    #[test]
    fn test_reserved_controls_do_not_resolve() {
        let registry = ControlRegistry::new();
        assert_eq!(
            resolve_control_names(&registry, &["LShiftKey"]),
            Err(BindError::UnknownControl("LShiftKey".to_string()))
        );
        assert!(resolve_control_names(&registry, &["None"]).is_err());
    }
}
