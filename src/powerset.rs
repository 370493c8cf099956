//! Power set enumeration
//!
//! Subsets are produced by binary counting over input positions: subset `k`
//! (for `k` in `1..2^n`) holds input element `i` iff bit `i` of `k` is set.
//! For `[A, B, C]`:
//!
//! ```text
//! k=1 {A}   k=2 {B}   k=3 {A,B}   k=4 {C}   k=5 {A,C}   k=6 {B,C}   k=7 {A,B,C}
//! ```
//!
//! Members keep their relative input order, so the same input always yields
//! the same sequence.

use crate::capability::CapabilityTable;
use crate::error::{Error, Result};

/// Inputs above this size are refused outright.
pub const MAX_CAPABILITIES: usize = 16;

/// Inputs above this size generate, but a warning is logged.
pub const WARN_CAPABILITIES: usize = 8;

/// All non-empty subsets of `items`, in binary counting order.
pub fn non_empty_subsets<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    subset_masks(items.len())
        .map(|mask| {
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u64 << i) != 0)
                .map(|(_, item)| item.clone())
                .collect()
        })
        .collect()
}

fn subset_masks(n: usize) -> impl Iterator<Item = u64> {
    1..(1u64 << n)
}

// =============================================================================
// Combination
// =============================================================================

/// A non-empty subset of the capability table, by table index.
///
/// Indices are strictly increasing, so member order is input order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    members: Vec<usize>,
}

impl Combination {
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }

    /// Bit `i` set iff table entry `i` is a member. Also the combination's
    /// position in enumeration order, counting from 1.
    pub fn mask(&self) -> u64 {
        self.members.iter().fold(0, |mask, &i| mask | (1u64 << i))
    }

    /// Membership by capability name.
    pub fn contains_name(&self, table: &CapabilityTable, name: &str) -> bool {
        self.members
            .iter()
            .filter_map(|&i| table.get(i))
            .any(|def| def.name() == name)
    }

    /// Member names in input order.
    pub fn names<'a>(&self, table: &'a CapabilityTable) -> Vec<&'a str> {
        self.members
            .iter()
            .filter_map(|&i| table.get(i))
            .map(|def| def.name())
            .collect()
    }
}

/// Enumerate every combination of `table`, refusing oversized inputs.
pub fn combinations(table: &CapabilityTable) -> Result<Vec<Combination>> {
    let n = table.len();
    if n > MAX_CAPABILITIES {
        return Err(Error::config(format!(
            "{} capabilities would generate {} composites, at most {} capabilities are supported",
            n,
            (1u64 << n) - 1,
            MAX_CAPABILITIES
        )));
    }
    if n > WARN_CAPABILITIES {
        tracing::warn!(
            capabilities = n,
            composites = (1u64 << n) - 1,
            "large capability set, generated code grows exponentially"
        );
    }

    let indices: Vec<usize> = (0..n).collect();
    Ok(non_empty_subsets(&indices)
        .into_iter()
        .map(|members| Combination { members })
        .collect())
}

// =============================================================================
// PresencePattern
// =============================================================================

/// Runtime presence of every capability accessor for one dispatch call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresencePattern {
    present: Vec<bool>,
}

impl PresencePattern {
    pub fn new(present: Vec<bool>) -> Self {
        PresencePattern { present }
    }

    /// Pattern `k` over `n` capabilities: capability `i` is present iff bit
    /// `i` of `k` is set.
    pub fn from_mask(n: usize, mask: u64) -> Self {
        PresencePattern {
            present: (0..n).map(|i| mask & (1u64 << i) != 0).collect(),
        }
    }

    /// All `2^n` patterns, the all-absent pattern first.
    pub fn all(n: usize) -> impl Iterator<Item = PresencePattern> {
        (0..(1u64 << n)).map(move |mask| PresencePattern::from_mask(n, mask))
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.present.get(index).copied().unwrap_or(false)
    }

    pub fn none_present(&self) -> bool {
        !self.present.iter().any(|&p| p)
    }

    /// Indices of present capabilities, ascending.
    pub fn present_indices(&self) -> Vec<usize> {
        self.present
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(|(i, _)| i)
            .collect()
    }
}
