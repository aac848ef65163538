//! Comparison of a freshly rendered diagram against the persisted one.
//!
//! Exact byte equality only; whitespace and ordering differences count as
//! changes. The outcome is informational and never blocks the write.

/// Result of comparing the existing diagram text with the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReport {
    Unchanged,
    Changed,
}

/// Compare previously persisted diagram text against newly rendered text.
pub fn compare(existing: &str, fresh: &str) -> ChangeReport {
    if existing == fresh {
        ChangeReport::Unchanged
    } else {
        ChangeReport::Changed
    }
}
