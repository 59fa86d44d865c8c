//! Per-submitter causal ordering of submissions.
//!
//! The transport guarantees at-least-once delivery with no ordering across
//! participants, so each envelope carries its submitter's own sequence
//! number. Submissions apply in sequence order per submitter; an envelope
//! that arrives ahead of its predecessor is parked until the gap fills,
//! and anything at an already-applied sequence is dropped as a duplicate.

use ivs_types::ParticipantId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Reorder buffer keyed by submitter.
pub struct SequenceBuffer<T> {
    next: HashMap<ParticipantId, u64>,
    parked: HashMap<ParticipantId, BTreeMap<u64, T>>,
    parked_count: usize,
    max_parked: usize,
}

impl<T> SequenceBuffer<T> {
    pub fn new(max_parked: usize) -> Self {
        Self {
            next: HashMap::new(),
            parked: HashMap::new(),
            parked_count: 0,
            max_parked,
        }
    }

    /// Accept one item and return everything now ready, in order.
    ///
    /// Ready means: this item is at the submitter's expected sequence,
    /// followed by any parked successors it unblocks. A duplicate (or an
    /// item behind the expected sequence) returns empty. When the park
    /// space is exhausted the item is dropped; at-least-once delivery
    /// means the submitter's retry will find room later.
    pub fn accept(&mut self, submitter: &ParticipantId, sequence: u64, item: T) -> Vec<T> {
        let next = self.next.entry(submitter.clone()).or_insert(0);

        if sequence < *next {
            debug!(submitter = %submitter, sequence, expected = *next, "duplicate submission dropped");
            return Vec::new();
        }

        if sequence > *next {
            if self.parked_count >= self.max_parked {
                warn!(submitter = %submitter, sequence, "park space exhausted, submission dropped");
                return Vec::new();
            }
            let slot = self.parked.entry(submitter.clone()).or_default();
            if slot.insert(sequence, item).is_none() {
                self.parked_count += 1;
            }
            debug!(submitter = %submitter, sequence, expected = *next, "submission parked");
            return Vec::new();
        }

        // At the expected sequence: release it plus any parked successors.
        let mut ready = vec![item];
        *next += 1;
        if let Some(slot) = self.parked.get_mut(submitter) {
            while let Some(successor) = slot.remove(next) {
                ready.push(successor);
                self.parked_count -= 1;
                *next += 1;
            }
            if slot.is_empty() {
                self.parked.remove(submitter);
            }
        }
        ready
    }

    /// Items currently parked across all submitters.
    pub fn parked_count(&self) -> usize {
        self.parked_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        ParticipantId::from(s)
    }

    #[test]
    fn in_order_items_flow_through() {
        let mut buf = SequenceBuffer::new(16);
        assert_eq!(buf.accept(&id("a"), 0, "x"), vec!["x"]);
        assert_eq!(buf.accept(&id("a"), 1, "y"), vec!["y"]);
        assert_eq!(buf.parked_count(), 0);
    }

    #[test]
    fn gap_parks_until_filled() {
        let mut buf = SequenceBuffer::new(16);
        assert!(buf.accept(&id("a"), 2, "z").is_empty());
        assert!(buf.accept(&id("a"), 1, "y").is_empty());
        assert_eq!(buf.parked_count(), 2);

        // Filling the gap releases the whole run in order.
        assert_eq!(buf.accept(&id("a"), 0, "x"), vec!["x", "y", "z"]);
        assert_eq!(buf.parked_count(), 0);
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut buf = SequenceBuffer::new(16);
        assert_eq!(buf.accept(&id("a"), 0, "x"), vec!["x"]);
        assert!(buf.accept(&id("a"), 0, "x-again").is_empty());
    }

    #[test]
    fn parked_duplicate_replaces_without_leaking_count() {
        let mut buf = SequenceBuffer::new(16);
        assert!(buf.accept(&id("a"), 1, "first").is_empty());
        assert!(buf.accept(&id("a"), 1, "retry").is_empty());
        assert_eq!(buf.parked_count(), 1);
        // At-least-once delivery: the retry wins the slot.
        assert_eq!(buf.accept(&id("a"), 0, "x"), vec!["x", "retry"]);
    }

    #[test]
    fn submitters_are_independent() {
        let mut buf = SequenceBuffer::new(16);
        assert!(buf.accept(&id("a"), 1, "a1").is_empty());
        assert_eq!(buf.accept(&id("b"), 0, "b0"), vec!["b0"]);
        assert_eq!(buf.accept(&id("a"), 0, "a0"), vec!["a0", "a1"]);
    }

    #[test]
    fn park_space_is_bounded() {
        let mut buf = SequenceBuffer::new(2);
        assert!(buf.accept(&id("a"), 1, 1).is_empty());
        assert!(buf.accept(&id("a"), 2, 2).is_empty());
        // Third out-of-order item has nowhere to go.
        assert!(buf.accept(&id("a"), 3, 3).is_empty());
        assert_eq!(buf.parked_count(), 2);
        assert_eq!(buf.accept(&id("a"), 0, 0), vec![0, 1, 2]);
    }
}
