//! Serialized bind definitions
//!
//! Two shapes are accepted:
//! - Simple: `{ "name": "Jump", "control_names": ["Space"] }`
//! - Extended: `{ "name": "Fire", "control_names": ["LButton"],
//!   "aliases": [{ "control_names": ["ControlKey"] }] }`
//!
//! In the extended shape a `null` or missing `control_names` leaves that slot
//! unbound. Control names are canonical names from the `ControlRegistry`;
//! display names are also accepted on load.

use serde::{Deserialize, Serialize};

/// One alias slot of an extended definition.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AliasDefinition {
    #[serde(default)]
    pub control_names: Option<Vec<String>>,
}

/// Persisted form of a bind's combos.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindDefinition {
    /// Primary combo plus ordered alias slots.
    Extended {
        name: String,
        #[serde(default)]
        control_names: Option<Vec<String>>,
        aliases: Vec<AliasDefinition>,
    },
    /// Single combo, no aliases.
    Simple {
        name: String,
        control_names: Vec<String>,
    },
}

impl BindDefinition {
    pub fn simple<S: Into<String>>(name: &str, control_names: Vec<S>) -> Self {
        BindDefinition::Simple {
            name: name.to_string(),
            control_names: control_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extended(
        name: &str,
        control_names: Option<Vec<String>>,
        aliases: Vec<AliasDefinition>,
    ) -> Self {
        BindDefinition::Extended {
            name: name.to_string(),
            control_names,
            aliases,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BindDefinition::Extended { name, .. } | BindDefinition::Simple { name, .. } => name,
        }
    }

    /// Control names of every slot, primary first. `None` means unbound.
    pub fn slots(&self) -> impl Iterator<Item = Option<&[String]>> + '_ {
        let (primary, aliases): (Option<&[String]>, &[AliasDefinition]) = match self {
            BindDefinition::Extended {
                control_names,
                aliases,
                ..
            } => (control_names.as_deref(), aliases.as_slice()),
            BindDefinition::Simple { control_names, .. } => (Some(control_names.as_slice()), &[][..]),
        };

        std::iter::once(primary).chain(aliases.iter().map(|a| a.control_names.as_deref()))
    }
}
