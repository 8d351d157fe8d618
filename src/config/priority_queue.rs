//! Configuration for the binary-heap priority queue.
//!
//! A queue is configured with its ordering direction and an optional capacity
//! hint. The hint only pre-sizes the backing storage; the queue grows without
//! bound past it.
//!
//! # Examples
//!
//! ```
//! use algokit::config::PriorityQueueConfig;
//! use algokit::{HeapOrder, PriorityQueue};
//!
//! let config = PriorityQueueConfig {
//!     order: HeapOrder::Max,
//!     capacity_hint: 1024,
//! };
//! let mut queue: PriorityQueue<&str, u32> = PriorityQueue::init(config);
//! queue.push("low", 1);
//! queue.push("high", 9);
//! assert_eq!(queue.pop(), Ok("high"));
//! ```

use crate::priority_queue::HeapOrder;
use core::fmt;

/// Configuration for a [`PriorityQueue`](crate::PriorityQueue).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PriorityQueueConfig {
    /// Which end of the priority range is popped first. Fixed for the queue's lifetime.
    pub order: HeapOrder,
    /// Number of items to pre-allocate room for. Zero allocates lazily.
    pub capacity_hint: usize,
}

impl PriorityQueueConfig {
    /// Creates a configuration with no capacity hint.
    pub fn new(order: HeapOrder) -> Self {
        Self {
            order,
            capacity_hint: 0,
        }
    }
}

impl Default for PriorityQueueConfig {
    fn default() -> Self {
        Self::new(HeapOrder::Min)
    }
}

impl fmt::Debug for PriorityQueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueueConfig")
            .field("order", &self.order)
            .field("capacity_hint", &self.capacity_hint)
            .finish()
    }
}
