use crate::common::data_structures::saturating_sum;
use indexmap::IndexMap;

/// Per-label tallies in display order.
///
/// Starts from a canonical order (zero-filled) and appends labels outside of it
/// in first-seen order, so unknown tags are never dropped and the position of a
/// label doubles as its tie-break rank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounts {
    counts: IndexMap<String, u64>,
}

impl LabelCounts {
    /// Creates zero counts for every label of `order`.
    pub fn with_order(order: &[String]) -> Self {
        Self {
            counts: order.iter().map(|label| (label.clone(), 0)).collect(),
        }
    }

    /// Adds `amount` to `label`, appending the label if it is not present yet.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, label: &str, amount: u64) {
        match self.counts.get_mut(label) {
            Some(count) => *count = count.saturating_add(amount),
            None => {
                self.counts.insert(label.to_string(), amount);
            }
        }
    }

    /// Ensures `label` is present without changing its count.
    pub fn touch(&mut self, label: &str) {
        self.add(label, 0);
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Display position of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.counts.get_index_of(label)
    }

    /// Label at display position `index`.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.counts.get_index(index).map(|(label, _)| label.as_str())
    }

    /// Sum over all labels, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        saturating_sum(self.counts.values().copied())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// `(label, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }

    /// Labels in display order, owned.
    pub fn to_order(&self) -> Vec<String> {
        self.counts.keys().cloned().collect()
    }
}
