use std::collections::VecDeque;

/// FIFO queue of ledger addresses awaiting submission.
///
/// Grows by loading from the store, shrinks by batch submission, and is never
/// reordered. No deduplication: the store's own filter is trusted to not hand
/// out an address twice.
#[derive(Debug, Default)]
pub struct BatchQueue {
    addresses: VecDeque<String>,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append addresses preserving the given order.
    pub fn enqueue_all(&mut self, addresses: Vec<String>) {
        self.addresses.extend(addresses);
    }

    /// Remove and return the first `min(n, len)` addresses. The remainder
    /// keeps its relative order.
    pub fn dequeue_up_to(&mut self, n: usize) -> Vec<String> {
        let take = n.min(self.addresses.len());
        self.addresses.drain(..take).collect()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
