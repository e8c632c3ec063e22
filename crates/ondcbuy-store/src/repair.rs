use serde::Serialize;

/// What the cart loader had to fix in the stored array.
///
/// Repairs are applied silently and the corrected array is re-persisted;
/// this report lets the host surface them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// The stored value was not a JSON array and was replaced with `[]`.
    pub reset: bool,
    /// Entries that were not objects, lacked required fields, or had an
    /// unparseable price.
    pub dropped: usize,
    /// Entries whose `available_on_cod` was missing or not a boolean.
    pub defaulted_cod: usize,
    /// Entries whose quantity was outside `1..=99`.
    pub clamped: usize,
    /// Later entries sharing an id with an earlier one, folded into it.
    pub merged_duplicates: usize,
}

impl RepairReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}
