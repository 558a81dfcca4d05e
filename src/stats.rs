//! Collision outcome accounting, keyed by unordered pairs of agent tags.

use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulated collision credit per unordered tag pair. Each member of a
/// colliding pair reports the same event once, worth 0.5, so a physical
/// collision credits exactly 1.0. Counts only grow; a fresh run starts from
/// a fresh value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionStats {
    counts: BTreeMap<(String, String), f64>,
}

/// One exported row of the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionRow {
    pub tag_a: String,
    pub tag_b: String,
    pub count: f64,
}

impl CollisionStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(tag_a: &str, tag_b: &str) -> (String, String) {
        if tag_a <= tag_b {
            (tag_a.to_owned(), tag_b.to_owned())
        } else {
            (tag_b.to_owned(), tag_a.to_owned())
        }
    }

    /// Record one side's detection of a collision between `tag_a` and
    /// `tag_b` (order irrelevant): half a credit.
    pub fn record(&mut self, tag_a: &str, tag_b: &str) {
        *self.counts.entry(Self::key(tag_a, tag_b)).or_insert(0.0) += 0.5;
    }

    pub fn count(&self, tag_a: &str, tag_b: &str) -> f64 {
        self.counts
            .get(&Self::key(tag_a, tag_b))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Read-only view of the full mapping, ordered by tag pair.
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), f64)> + '_ {
        self.counts.iter().map(|(pair, count)| (pair, *count))
    }

    /// Serializable rows for reporting collaborators.
    pub fn rows(&self) -> Vec<CollisionRow> {
        self.counts
            .iter()
            .map(|((tag_a, tag_b), count)| CollisionRow {
                tag_a: tag_a.clone(),
                tag_b: tag_b.clone(),
                count: *count,
            })
            .collect()
    }
}
