//=========================================================================
// Deferred Queue
//=========================================================================
//
// One-tick deferral for work requested during a tick.
//
// Work pushed while tick N is running is taken as a batch at the start of
// tick N+1. Entries are never cancelled or coalesced: every push is run,
// in push order.
//
//=========================================================================

//=== Deferred Queue ======================================================

/// FIFO of work items waiting for the next tick boundary.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    queue: Vec<T>,
}

impl<T> DeferredQueue<T> {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues an item for the next tick boundary.
    pub fn push(&mut self, item: T) {
        self.queue.push(item);
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued items.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all items from the queue, leaving it empty.
    ///
    /// Items pushed after this call belong to the following batch.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.queue)
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_returns_items_in_push_order() {
        let mut queue = DeferredQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.take(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn push_after_take_starts_next_batch() {
        let mut queue = DeferredQueue::new();
        queue.push("a");
        let batch = queue.take();
        queue.push("b");

        assert_eq!(batch, vec!["a"]);
        assert_eq!(queue.take(), vec!["b"]);
    }
}
