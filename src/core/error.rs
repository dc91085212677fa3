use thiserror::Error;

/// Errors raised by bind registration and combo assignment.
///
/// Every variant is a synchronous validation failure. The operation that
/// returned it has left the group untouched.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BindError {
    /// Bind name is empty or whitespace.
    #[error("Invalid bind name '{0}'")]
    InvalidBindName(String),

    /// A bind with this name (case-insensitive) already exists in the group.
    #[error("Bind '{0}' already exists in this group")]
    DuplicateBindName(String),

    /// Combo has more controls than the engine supports.
    #[error("Combo has {len} controls (max {max})")]
    ComboTooLong { len: usize, max: usize },

    /// No bind with this name is registered in the group.
    #[error("Unknown bind '{0}'")]
    UnknownBind(String),

    /// Control name could not be resolved, or names a reserved control.
    #[error("Unknown control '{0}'")]
    UnknownControl(String),

    /// Alias slot beyond the end of the bind's combo list.
    #[error("Bind '{bind}' has {slots} combo slot(s), cannot assign slot {slot}")]
    InvalidAliasSlot {
        bind: String,
        slot: usize,
        slots: usize,
    },

    /// Combo is an exact match of a live combo owned by another bind slot.
    #[error("Combo for '{bind}' conflicts with existing combo of '{existing}'")]
    ComboConflict { bind: String, existing: String },
}
