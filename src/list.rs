//! Arena-backed doubly linked list with sentinel nodes.
//!
//! Nodes live in a single `Vec` and link to each other by slot index instead of
//! by pointer. Two permanent sentinel slots bound the list, so splicing never
//! has to special-case an empty neighbour:
//!
//! ```text
//!   slot 0 (HEAD)        slot k            slot j           slot 1 (TAIL)
//!  ┌──────────┐       ┌──────────┐      ┌──────────┐      ┌──────────┐
//!  │ sentinel │ ────▶ │  front   │ ───▶ │   back   │ ───▶ │ sentinel │
//!  │          │ ◀──── │          │ ◀─── │          │ ◀─── │          │
//!  └──────────┘       └──────────┘      └──────────┘      └──────────┘
//! ```
//!
//! Removed slots are pushed on a free list and reused by the next `add`, so an
//! [`EntryId`] stays valid until its node is removed and may be recycled after.
//! The list owns every value; callers only ever hold indices.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;

const HEAD: usize = 0;
const TAIL: usize = 1;
const SENTINELS: usize = 2;

/// Stable handle to a node in a [`List`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId(usize);

/// A node in the list. Sentinels and free slots carry `None`.
struct Entry<T> {
    val: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Entry<T> {
    fn sentinel() -> Self {
        Entry {
            val: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// A doubly linked list with a fixed capacity.
///
/// New values are added at the front. `remove_last` takes from the back, which
/// is how the LRU cache finds its eviction victim.
pub(crate) struct List<T> {
    /// Maximum number of items the list can hold.
    cap: NonZeroUsize,
    /// Current number of items in the list.
    len: usize,
    /// Slot storage. Slots 0 and 1 are the head and tail sentinels.
    nodes: Vec<Entry<T>>,
    /// Indices of vacated slots, reused before growing `nodes`.
    free: Vec<usize>,
}

impl<T> List<T> {
    /// Creates a new list that holds at most `cap` items.
    pub(crate) fn new(cap: NonZeroUsize) -> List<T> {
        let mut nodes = Vec::with_capacity(cap.get() + SENTINELS);
        nodes.push(Entry::sentinel());
        nodes.push(Entry::sentinel());
        List {
            cap,
            len: 0,
            nodes,
            free: Vec::new(),
        }
    }

    /// Returns the maximum number of items the list can hold.
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    /// Returns the current number of items in the list.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the list is at capacity.
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap.get()
    }

    /// Unlinks `idx` from its neighbours. The slot keeps its value.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Links `idx` directly after the head sentinel.
    fn attach(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    /// Returns true if `id` names a live (non-sentinel, occupied) node.
    fn is_live(&self, id: EntryId) -> bool {
        id.0 >= SENTINELS
            && self
                .nodes
                .get(id.0)
                .map(|node| node.val.is_some())
                .unwrap_or(false)
    }

    /// Detaches a live node and vacates its slot.
    fn take(&mut self, idx: usize) -> Option<T> {
        self.detach(idx);
        let val = self.nodes[idx].val.take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(val)
    }

    /// Adds a value to the front of the list.
    ///
    /// Returns the new node's handle, or `None` if the list is full.
    pub(crate) fn add(&mut self, v: T) -> Option<EntryId> {
        if self.is_full() {
            return None;
        }
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].val = Some(v);
                idx
            }
            None => {
                self.nodes.push(Entry {
                    val: Some(v),
                    prev: HEAD,
                    next: TAIL,
                });
                self.nodes.len() - 1
            }
        };
        self.attach(idx);
        self.len += 1;
        Some(EntryId(idx))
    }

    /// Returns true if `id` is the front node.
    pub(crate) fn is_front(&self, id: EntryId) -> bool {
        self.len > 0 && self.nodes[HEAD].next == id.0
    }

    /// Moves a node to the front of the list. No-op for stale handles.
    pub(crate) fn move_to_front(&mut self, id: EntryId) {
        if !self.is_live(id) || self.nodes[HEAD].next == id.0 {
            return;
        }
        self.detach(id.0);
        self.attach(id.0);
    }

    /// Removes the node `id` and returns its value.
    pub(crate) fn remove(&mut self, id: EntryId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        self.take(id.0)
    }

    /// Removes the first (most recently added) item from the list.
    pub(crate) fn remove_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let first = self.nodes[HEAD].next;
        self.take(first)
    }

    /// Removes the last (least recently added) item from the list.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let last = self.nodes[TAIL].prev;
        self.take(last)
    }

    /// Replaces the value at `id`, returning the previous one.
    pub(crate) fn update(&mut self, id: EntryId, v: T) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        self.nodes[id.0].val.replace(v)
    }

    /// Returns a reference to the value at `id`.
    pub(crate) fn get_value(&self, id: EntryId) -> Option<&T> {
        if id.0 < SENTINELS {
            return None;
        }
        self.nodes.get(id.0).and_then(|node| node.val.as_ref())
    }

    /// Returns a mutable reference to the value at `id`.
    pub(crate) fn get_value_mut(&mut self, id: EntryId) -> Option<&mut T> {
        if id.0 < SENTINELS {
            return None;
        }
        self.nodes.get_mut(id.0).and_then(|node| node.val.as_mut())
    }

    /// Returns the value at the front of the list.
    pub(crate) fn front(&self) -> Option<&T> {
        self.get_value(EntryId(self.nodes[HEAD].next))
    }

    /// Returns the value at the back of the list.
    pub(crate) fn back(&self) -> Option<&T> {
        self.get_value(EntryId(self.nodes[TAIL].prev))
    }

    /// Removes all items, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(SENTINELS);
        self.nodes[HEAD] = Entry::sentinel();
        self.nodes[TAIL] = Entry::sentinel();
        self.free.clear();
        self.len = 0;
    }

    /// Iterates values from front to back.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.nodes[HEAD].next,
            back: self.nodes[TAIL].prev,
            remaining: self.len,
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("cap", &self.cap)
            .field("len", &self.len)
            .field("slots", &self.nodes.len())
            .finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub(crate) struct Iter<'a, T> {
    nodes: &'a [Entry<T>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.val.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.val.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn list(cap: usize) -> List<u32> {
        List::new(NonZeroUsize::new(cap).unwrap())
    }

    fn contents(list: &List<u32>) -> Vec<u32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_construct_and_cap() {
        let list = list(5);
        assert_eq!(list.cap().get(), 5);
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
    }

    #[test]
    fn test_add_items() {
        let mut list = list(3);
        assert!(list.add(10).is_some());
        assert!(list.add(20).is_some());
        assert!(list.add(30).is_some());
        assert!(list.add(40).is_none());
        assert_eq!(list.len(), 3);
        assert_eq!(contents(&list), [30, 20, 10]);
    }

    #[test]
    fn test_update_item() {
        let mut list = list(2);
        let node = list.add(10).unwrap();
        assert_eq!(list.update(node, 15), Some(10));
        assert_eq!(list.get_value(node), Some(&15));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_get_value_mut() {
        let mut list = list(2);
        let node = list.add(1).unwrap();
        *list.get_value_mut(node).unwrap() += 41;
        assert_eq!(list.get_value(node), Some(&42));
    }

    #[test]
    fn test_remove_first_and_last() {
        let mut list = list(3);
        list.add(10);
        list.add(20);
        list.add(30);

        assert_eq!(list.remove_first(), Some(30));
        assert_eq!(list.remove_last(), Some(10));
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove_first(), Some(20));
        assert_eq!(list.remove_first(), None);
        assert_eq!(list.remove_last(), None);
    }

    #[test]
    fn test_move_to_front() {
        let mut list = list(3);
        let node1 = list.add(10).unwrap();
        list.add(20);
        list.add(30);

        list.move_to_front(node1);
        assert_eq!(contents(&list), [10, 30, 20]);

        // already at the front
        list.move_to_front(node1);
        assert_eq!(contents(&list), [10, 30, 20]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_remove_middle_relinks_neighbours() {
        let mut list = list(3);
        list.add(10);
        let middle = list.add(20).unwrap();
        list.add(30);

        assert_eq!(list.remove(middle), Some(20));
        assert_eq!(contents(&list), [30, 10]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [10, 30]);
        // stale handle
        assert_eq!(list.remove(middle), None);
        assert_eq!(list.get_value(middle), None);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = list(2);
        let first = list.add(1).unwrap();
        list.add(2);
        list.remove(first);
        let reused = list.add(3).unwrap();
        assert_eq!(reused, first);
        assert_eq!(list.nodes.len(), 4);
        assert_eq!(contents(&list), [3, 2]);
    }

    #[test]
    fn test_sentinels_are_not_addressable() {
        let mut list = list(1);
        list.add(1);
        assert_eq!(list.remove(EntryId(HEAD)), None);
        assert_eq!(list.remove(EntryId(TAIL)), None);
        assert_eq!(list.update(EntryId(HEAD), 9), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut list = list(3);
        list.add(10);
        list.add(20);
        list.add(30);
        list.clear();
        assert!(list.is_empty());
        assert!(contents(&list).is_empty());

        list.add(40);
        assert_eq!(list.len(), 1);
        assert_eq!(list.front(), Some(&40));
        assert_eq!(list.back(), Some(&40));
    }

    #[test]
    fn test_is_empty_and_is_full() {
        let mut list = list(2);
        assert!(list.is_empty());
        assert!(!list.is_full());

        list.add(10);
        list.add(20);
        assert!(list.is_full());

        list.remove_first();
        assert!(!list.is_empty());
        assert!(!list.is_full());

        list.remove_first();
        assert!(list.is_empty());
    }

    #[test]
    fn test_list_complex_values() {
        let mut list = List::<(u32, String)>::new(NonZeroUsize::new(2).unwrap());
        let node = list.add((1, String::from("one"))).unwrap();
        list.add((2, String::from("two")));
        list.move_to_front(node);
        assert_eq!(list.front().map(|(n, _)| *n), Some(1));
        assert_eq!(list.back().map(|(_, s)| s.as_str()), Some("two"));
    }

    #[test]
    fn test_length_consistency_after_complex_operations() {
        let mut list = list(4);
        let ids: Vec<_> = (0..4).map(|v| list.add(v).unwrap()).collect();
        list.move_to_front(ids[0]);
        list.remove(ids[2]);
        list.remove_last();
        list.add(9);
        list.move_to_front(ids[3]);

        assert_eq!(list.len(), list.iter().count());
        assert_eq!(list.len(), list.iter().rev().count());
        assert_eq!(contents(&list), [3, 9, 0]);
    }
}
