//! Sparse symmetric co-occurrence matrix over the tag vocabulary.
//!
//! Explicit abstraction instead of ad hoc nested maps: updates go
//! through [`CooccurrenceMatrix::bump`], which maintains symmetry and
//! never stores the diagonal. Iteration order is insertion order on
//! both levels, so a rebuild from the same document order reproduces
//! identical reports.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CooccurrenceMatrix {
    edges: IndexMap<String, IndexMap<String, u32>>,
}

impl CooccurrenceMatrix {
    pub fn new() -> Self {
        CooccurrenceMatrix::default()
    }

    /// Record one document containing both `a` and `b`. Symmetric;
    /// the diagonal is ignored.
    pub fn bump(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.bump_one(a, b);
        self.bump_one(b, a);
    }

    fn bump_one(&mut self, from: &str, to: &str) {
        let row = self.edges.entry(from.to_string()).or_default();
        *row.entry(to.to_string()).or_insert(0) += 1;
    }

    /// Number of documents containing both tags.
    pub fn count(&self, a: &str, b: &str) -> u32 {
        self.edges
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Partners of a tag with their co-occurrence counts, in first-seen
    /// order. Empty iterator for unknown tags.
    pub fn partners(&self, tag: &str) -> impl Iterator<Item = (&str, u32)> {
        self.edges
            .get(tag)
            .into_iter()
            .flat_map(|row| row.iter().map(|(t, &c)| (t.as_str(), c)))
    }

    /// Number of distinct co-occurring partners.
    pub fn partner_count(&self, tag: &str) -> usize {
        self.edges.get(tag).map_or(0, |row| row.len())
    }

    /// All tags that appear in at least one co-occurrence pair.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(|t| t.as_str())
    }

    /// Fold another matrix into this one. Used by the merge-after-map
    /// parallel build; counts add, symmetry is preserved because both
    /// inputs are symmetric.
    pub fn merge(&mut self, other: CooccurrenceMatrix) {
        for (from, row) in other.edges {
            let target = self.edges.entry(from).or_default();
            for (to, count) in row {
                *target.entry(to).or_insert(0) += count;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
