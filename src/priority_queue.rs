//! Binary Heap Priority Queue
//!
//! A priority queue backed by an implicit binary heap. The ordering direction
//! is chosen once at construction: [`HeapOrder::Min`] returns the lowest
//! priority first, [`HeapOrder::Max`] the highest.
//!
//! # Layout
//!
//! Items live in a dense `Vec` in level order. For index `i`:
//!
//! ```text
//!   parent(i) = (i - 1) / 2
//!   left(i)   = 2i + 1
//!   right(i)  = 2i + 2
//!
//!   Min order, priorities:      [1, 3, 2, 7, 4]
//!
//!                 1
//!               /   \
//!              3     2
//!             / \
//!            7   4
//! ```
//!
//! Every parent is at least as extreme as its children (`<=` for `Min`, `>=`
//! for `Max`), so the root is always the next item to pop.
//!
//! # Performance Characteristics
//!
//! - Push: O(log n), one iterative sift-up
//! - Pop: O(log n), one iterative sift-down
//! - Peek: O(1)
//! - Space: O(n), no per-item allocation beyond the `Vec`
//!
//! Equal priorities are returned in an unspecified order.

extern crate alloc;

use crate::config::PriorityQueueConfig;
use crate::error::EmptyQueueError;
use crate::metrics::{Metrics, PriorityQueueMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::slice;

/// Which end of the priority range a [`PriorityQueue`] yields first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeapOrder {
    /// Lowest priority first.
    #[default]
    Min,
    /// Highest priority first.
    Max,
}

impl HeapOrder {
    /// Returns true if `a` must sit strictly above `b` in the heap.
    #[inline]
    fn precedes<P: Ord>(self, a: &P, b: &P) -> bool {
        match self {
            HeapOrder::Min => a < b,
            HeapOrder::Max => a > b,
        }
    }
}

#[derive(Debug, Clone)]
struct Item<T, P> {
    priority: P,
    payload: T,
}

/// A binary-heap priority queue holding payloads of type `T` ranked by
/// priorities of type `P`.
///
/// # Examples
///
/// ```
/// use algokit::PriorityQueue;
///
/// let mut jobs = PriorityQueue::min();
/// jobs.push("compact", 30);
/// jobs.push("flush", 10);
/// jobs.push("rotate", 20);
///
/// assert_eq!(jobs.peek(), Ok(&"flush"));
/// assert_eq!(jobs.pop(), Ok("flush"));
/// assert_eq!(jobs.pop_with_priority(), Ok(("rotate", 20)));
/// assert_eq!(jobs.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, P> {
    items: Vec<Item<T, P>>,
    order: HeapOrder,
    metrics: PriorityQueueMetrics,
}

impl<T, P: Ord> PriorityQueue<T, P> {
    /// Creates an empty queue with the given ordering.
    pub fn new(order: HeapOrder) -> Self {
        Self::with_capacity(order, 0)
    }

    /// Creates an empty queue that pops the lowest priority first.
    pub fn min() -> Self {
        Self::new(HeapOrder::Min)
    }

    /// Creates an empty queue that pops the highest priority first.
    pub fn max() -> Self {
        Self::new(HeapOrder::Max)
    }

    /// Creates an empty queue with room for `capacity_hint` items before
    /// reallocating.
    pub fn with_capacity(order: HeapOrder, capacity_hint: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity_hint),
            order,
            metrics: PriorityQueueMetrics::new(order == HeapOrder::Max),
        }
    }

    /// Creates an empty queue from a configuration.
    pub fn init(config: PriorityQueueConfig) -> Self {
        Self::with_capacity(config.order, config.capacity_hint)
    }

    /// Returns the ordering fixed at construction.
    #[inline]
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    /// Returns the number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns how many items the queue can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Adds `payload` with the given `priority`.
    pub fn push(&mut self, payload: T, priority: P) {
        self.items.push(Item { priority, payload });
        self.metrics.record_push();
        let swaps = self.sift_up(self.items.len() - 1);
        self.metrics.record_sift(swaps);
    }

    /// Returns the payload that [`pop`](Self::pop) would return next.
    pub fn peek(&self) -> Result<&T, EmptyQueueError> {
        self.items
            .first()
            .map(|item| &item.payload)
            .ok_or(EmptyQueueError)
    }

    /// Like [`peek`](Self::peek), but also returns the priority.
    pub fn peek_with_priority(&self) -> Result<(&T, &P), EmptyQueueError> {
        self.items
            .first()
            .map(|item| (&item.payload, &item.priority))
            .ok_or(EmptyQueueError)
    }

    /// Removes and returns the payload with the most extreme priority.
    pub fn pop(&mut self) -> Result<T, EmptyQueueError> {
        self.pop_with_priority().map(|(payload, _)| payload)
    }

    /// Like [`pop`](Self::pop), but also returns the priority.
    pub fn pop_with_priority(&mut self) -> Result<(T, P), EmptyQueueError> {
        match self.take_root() {
            Some(item) => Ok((item.payload, item.priority)),
            None => {
                self.metrics.record_empty_access();
                Err(EmptyQueueError)
            }
        }
    }

    /// Removes every item. Allocated storage is kept.
    pub fn clear(&mut self) {
        self.items.clear();
        self.metrics.record_clear();
    }

    /// Iterates `(payload, priority)` pairs in storage order, which is not
    /// priority order.
    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter {
            inner: self.items.iter(),
        }
    }

    /// Pops every item and returns the payloads in pop order.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Some(item) = self.take_root() {
            out.push(item.payload);
        }
        out
    }

    fn take_root(&mut self) -> Option<Item<T, P>> {
        if self.items.is_empty() {
            return None;
        }
        // The last item takes the root's place and sinks back into position.
        let root = self.items.swap_remove(0);
        self.metrics.record_pop();
        if self.items.len() > 1 {
            let swaps = self.sift_down(0);
            self.metrics.record_sift(swaps);
        }
        Some(root)
    }

    fn sift_up(&mut self, mut idx: usize) -> u64 {
        let mut swaps = 0;
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self
                .order
                .precedes(&self.items[idx].priority, &self.items[parent].priority)
            {
                break;
            }
            self.items.swap(idx, parent);
            idx = parent;
            swaps += 1;
        }
        swaps
    }

    // Picks the more extreme child (left on ties) and swaps only while that
    // child is strictly more extreme than the current node.
    fn sift_down(&mut self, mut idx: usize) -> u64 {
        let len = self.items.len();
        let mut swaps = 0;
        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len
                && self
                    .order
                    .precedes(&self.items[right].priority, &self.items[left].priority)
            {
                child = right;
            }
            if !self
                .order
                .precedes(&self.items[child].priority, &self.items[idx].priority)
            {
                break;
            }
            self.items.swap(idx, child);
            idx = child;
            swaps += 1;
        }
        swaps
    }
}

impl<T, P: Ord> Default for PriorityQueue<T, P> {
    fn default() -> Self {
        Self::min()
    }
}

impl<T, P: Ord> Extend<(T, P)> for PriorityQueue<T, P> {
    fn extend<I: IntoIterator<Item = (T, P)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.items.reserve(iter.size_hint().0);
        for (payload, priority) in iter {
            self.push(payload, priority);
        }
    }
}

/// Renders `PriorityQueue{priority:payload,...}` in storage order.
impl<T: fmt::Display, P: fmt::Display> fmt::Display for PriorityQueue<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PriorityQueue{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", item.priority, item.payload)?;
        }
        f.write_str("}")
    }
}

impl<T, P: Ord> Metrics for PriorityQueue<T, P> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<'a, T, P: Ord> IntoIterator for &'a PriorityQueue<T, P> {
    type Item = (&'a T, &'a P);
    type IntoIter = Iter<'a, T, P>;

    fn into_iter(self) -> Iter<'a, T, P> {
        self.iter()
    }
}

/// Iterator over queued `(payload, priority)` pairs in storage order.
///
/// Created by [`PriorityQueue::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T, P> {
    inner: slice::Iter<'a, Item<T, P>>,
}

impl<'a, T, P> Iterator for Iter<'a, T, P> {
    type Item = (&'a T, &'a P);

    fn next(&mut self) -> Option<(&'a T, &'a P)> {
        self.inner.next().map(|item| (&item.payload, &item.priority))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, P> ExactSizeIterator for Iter<'_, T, P> {}

impl<T, P> FusedIterator for Iter<'_, T, P> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_heap_ordered<T, P: Ord + fmt::Debug>(queue: &PriorityQueue<T, P>) {
        for i in 1..queue.items.len() {
            let parent = (i - 1) / 2;
            assert!(
                !queue
                    .order
                    .precedes(&queue.items[i].priority, &queue.items[parent].priority),
                "child {i} ({:?}) outranks parent {parent} ({:?})",
                queue.items[i].priority,
                queue.items[parent].priority
            );
        }
    }

    #[test]
    fn test_push_in_order() {
        let mut queue = PriorityQueue::min();
        for i in 0..10 {
            queue.push(i, i);
            assert_heap_ordered(&queue);
        }
        for i in 0..10 {
            assert_eq!(queue.pop(), Ok(i));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_reversed() {
        let mut queue = PriorityQueue::min();
        for i in (0..10).rev() {
            queue.push(i, i);
        }
        assert_heap_ordered(&queue);
        for i in 0..10 {
            assert_eq!(queue.pop(), Ok(i));
        }
    }

    #[test]
    fn test_max_order() {
        let mut queue = PriorityQueue::max();
        for p in [5, 1, 9, 3, 7] {
            queue.push(p * 10, p);
        }
        assert_heap_ordered(&queue);
        assert_eq!(queue.drain_sorted(), vec![90, 70, 50, 30, 10]);
        assert_eq!(queue.algorithm_name(), "MaxHeap");
    }

    #[test]
    fn test_random_values_pop_sorted() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut queue = PriorityQueue::min();
        let mut expected = Vec::new();
        for _ in 0..100 {
            let value: u32 = rng.gen_range(0..1000);
            queue.push(value, value);
            expected.push(value);
        }
        assert_heap_ordered(&queue);
        expected.sort_unstable();
        assert_eq!(queue.drain_sorted(), expected);
    }

    #[test]
    fn test_random_oracle_interleaved() {
        let mut rng = StdRng::seed_from_u64(0xA160);
        for order in [HeapOrder::Min, HeapOrder::Max] {
            let mut queue = PriorityQueue::new(order);
            let mut shadow: Vec<i64> = Vec::new();
            for _ in 0..2_000 {
                if rng.gen_bool(0.6) {
                    let p = rng.gen_range(-50..50);
                    queue.push(p, p);
                    shadow.push(p);
                } else {
                    let expected = match order {
                        HeapOrder::Min => shadow.iter().copied().min(),
                        HeapOrder::Max => shadow.iter().copied().max(),
                    };
                    match expected {
                        Some(best) => {
                            assert_eq!(queue.pop(), Ok(best));
                            let pos = shadow.iter().position(|&v| v == best).unwrap();
                            shadow.swap_remove(pos);
                        }
                        None => assert_eq!(queue.pop(), Err(EmptyQueueError)),
                    }
                }
                assert_eq!(queue.len(), shadow.len());
            }
            assert_heap_ordered(&queue);
        }
    }

    #[test]
    fn test_peek_matches_pop() {
        let mut queue = PriorityQueue::min();
        queue.push("b", 2);
        queue.push("a", 1);
        queue.push("c", 3);
        while !queue.is_empty() {
            let peeked = *queue.peek().unwrap();
            let (peeked_with, _) = queue.peek_with_priority().unwrap();
            assert_eq!(*peeked_with, peeked);
            assert_eq!(queue.pop(), Ok(peeked));
        }
    }

    #[test]
    fn test_empty_queue_errors() {
        let mut queue: PriorityQueue<&str, u8> = PriorityQueue::default();
        assert_eq!(queue.peek(), Err(EmptyQueueError));
        assert_eq!(queue.peek_with_priority(), Err(EmptyQueueError));
        assert_eq!(queue.pop(), Err(EmptyQueueError));
        assert_eq!(queue.pop_with_priority(), Err(EmptyQueueError));
        assert_eq!(queue.metrics().get("empty_accesses"), Some(&2.0));
    }

    #[test]
    fn test_single_item_and_left_only_child() {
        let mut queue = PriorityQueue::min();
        queue.push('x', 1);
        assert_eq!(queue.pop(), Ok('x'));
        assert!(queue.is_empty());

        // Three items: after one pop the root has only a left child.
        queue.push('a', 1);
        queue.push('c', 3);
        queue.push('b', 2);
        assert_eq!(queue.pop(), Ok('a'));
        assert_eq!(queue.items.len(), 2);
        assert_heap_ordered(&queue);
        assert_eq!(queue.pop(), Ok('b'));
        assert_eq!(queue.pop(), Ok('c'));
        assert_eq!(queue.pop(), Err(EmptyQueueError));
    }

    #[test]
    fn test_equal_priorities_all_returned() {
        let mut queue = PriorityQueue::max();
        for payload in ["a", "b", "c", "d"] {
            queue.push(payload, 5);
        }
        queue.push("top", 6);
        assert_eq!(queue.pop(), Ok("top"));
        let mut rest = queue.drain_sorted();
        rest.sort_unstable();
        assert_eq!(rest, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_display_storage_order() {
        let mut queue = PriorityQueue::min();
        assert_eq!(queue.to_string(), "PriorityQueue{}");
        queue.push("low", 1);
        queue.push("high", 2);
        assert_eq!(queue.to_string(), "PriorityQueue{1:low,2:high}");
    }

    #[test]
    fn test_clear_and_capacity() {
        let mut queue = PriorityQueue::with_capacity(HeapOrder::Max, 64);
        assert!(queue.capacity() >= 64);
        queue.extend([(1, 1), (2, 2), (3, 3)]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().len(), 3);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.capacity() >= 64);
        assert_eq!(queue.order(), HeapOrder::Max);
        assert_eq!(queue.metrics().get("len"), Some(&0.0));
    }

    #[test]
    fn test_iter_sees_every_item() {
        let mut queue = PriorityQueue::min();
        queue.extend((0..20).map(|i| (i, 20 - i)));
        let mut payloads: Vec<i32> = queue.iter().map(|(payload, _)| *payload).collect();
        payloads.sort_unstable();
        assert_eq!(payloads, (0..20).collect::<Vec<_>>());
        assert!((&queue).into_iter().all(|(payload, priority)| payload + priority == 20));
    }

    #[test]
    fn test_metrics_track_pushes_and_pops() {
        let mut queue = PriorityQueue::min();
        for i in 0..8 {
            queue.push(i, 8 - i);
        }
        queue.pop().unwrap();
        let metrics = queue.metrics();
        assert_eq!(metrics.get("pushes"), Some(&8.0));
        assert_eq!(metrics.get("pops"), Some(&1.0));
        assert_eq!(metrics.get("peak_len"), Some(&8.0));
        assert_eq!(metrics.get("len"), Some(&7.0));
        assert!(metrics["sift_swaps"] > 0.0);
        assert_eq!(queue.algorithm_name(), "MinHeap");
    }

    #[test]
    fn test_drain_sorted_is_not_an_empty_access() {
        let mut queue = PriorityQueue::max();
        queue.push("rebuild-index", 2);
        queue.push("rotate-logs", 9);
        assert_eq!(queue.drain_sorted(), vec!["rotate-logs", "rebuild-index"]);

        let metrics = queue.metrics();
        assert_eq!(metrics["pops"], 2.0);
        assert_eq!(metrics["empty_accesses"], 0.0);

        // Draining an already empty queue is not a failed pop either
        assert!(queue.drain_sorted().is_empty());
        assert_eq!(queue.metrics()["empty_accesses"], 0.0);

        assert_eq!(queue.pop(), Err(EmptyQueueError));
        assert_eq!(queue.metrics()["empty_accesses"], 1.0);
    }
}
