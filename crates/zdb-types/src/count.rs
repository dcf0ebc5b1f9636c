//! Label -> count mapping produced by every aggregate.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

/// Counts keyed by label (family name or error message).
///
/// Only labels that were seen at least once are present; there is no way to
/// store a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateCount {
    counts: BTreeMap<String, u64>,
}

impl AggregateCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `label`.
    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    /// Add `n` occurrences of `label`. `n == 0` is a no-op.
    pub fn add(&mut self, label: &str, n: u64) {
        if n == 0 {
            return;
        }
        match self.counts.get_mut(label) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(label.to_string(), n);
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.counts.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate in label order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.counts.iter()
    }
}

impl<'a> IntoIterator for &'a AggregateCount {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
