//! Ordered recency list
//!
//! Doubly-linked list stored in an arena. Slots 0 and 1 are the front and
//! back sentinels; every real node sits strictly between them, so no splice
//! ever has to special-case a missing neighbor.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::error::{Error, Result};

const FRONT: usize = 0;
const BACK: usize = 1;

/// Upper bound on nodes reserved up front; larger lists grow on demand
pub(crate) const MAX_PREALLOC: usize = 4096;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Stable reference to a node in a [`RecencyList`]
///
/// A handle stays valid until its node is removed. After that the slot may be
/// reused, but the generation no longer matches and the old handle is rejected.
/// A handle is only accepted by the list that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    list: u64,
    slot: usize,
    generation: u64,
}

#[derive(Debug)]
struct Node<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
    generation: u64,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: FRONT,
            next: BACK,
            generation: 0,
        }
    }
}

/// List ordered from most recently used (front) to least recently used (back)
#[derive(Debug)]
pub struct RecencyList<T> {
    id: u64,
    nodes: Vec<Node<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes before reallocating
    ///
    /// The reservation is capped at 4096 nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.min(MAX_PREALLOC) + 2);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());

        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            nodes,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of real nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list has no real nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `value` as the first real node and return its handle
    pub fn insert_at_front(&mut self, value: T) -> Handle {
        let slot = match self.free_list.pop() {
            Some(slot) => {
                self.nodes[slot].value = Some(value);
                slot
            }
            None => {
                self.nodes.push(Node {
                    value: Some(value),
                    prev: FRONT,
                    next: BACK,
                    generation: 0,
                });
                self.nodes.len() - 1
            }
        };

        self.link_front(slot);
        self.len += 1;
        self.handle(slot)
    }

    /// Splice an existing node so it becomes the first real node
    pub fn move_to_front(&mut self, handle: Handle) -> Result<()> {
        let slot = self.resolve(handle)?;
        if self.nodes[FRONT].next == slot {
            return Ok(());
        }

        self.unlink(slot);
        self.link_front(slot);
        Ok(())
    }

    /// Remove the last real node (the least recently used) and return its value
    pub fn remove_from_back(&mut self) -> Result<T> {
        let last = self.nodes[BACK].prev;
        if last == FRONT {
            warn!("remove_from_back called on an empty list");
            return Err(Error::EmptyList);
        }

        self.remove(self.handle(last))
    }

    /// Unlink an arbitrary real node and return its value
    pub fn remove(&mut self, handle: Handle) -> Result<T> {
        let slot = self.resolve(handle)?;
        let value = self.nodes[slot].value.take().ok_or(Error::InvalidHandle)?;

        self.unlink(slot);
        self.release(slot);
        self.len -= 1;
        Ok(value)
    }

    /// Handle of the first real node
    pub fn front(&self) -> Option<Handle> {
        self.real(self.nodes[FRONT].next)
    }

    /// Handle of the last real node
    pub fn back(&self) -> Option<Handle> {
        self.real(self.nodes[BACK].prev)
    }

    /// Handle of the node after `handle`, or `None` at the back sentinel
    pub fn next(&self, handle: Handle) -> Result<Option<Handle>> {
        let slot = self.resolve(handle)?;
        Ok(self.real(self.nodes[slot].next))
    }

    /// Handle of the node before `handle`, or `None` at the front sentinel
    pub fn prev(&self, handle: Handle) -> Result<Option<Handle>> {
        let slot = self.resolve(handle)?;
        Ok(self.real(self.nodes[slot].prev))
    }

    /// Borrow the value behind `handle`
    pub fn get(&self, handle: Handle) -> Result<&T> {
        let slot = self.resolve(handle)?;
        self.nodes[slot].value.as_ref().ok_or(Error::InvalidHandle)
    }

    /// Mutably borrow the value behind `handle`
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut T> {
        let slot = self.resolve(handle)?;
        self.nodes[slot].value.as_mut().ok_or(Error::InvalidHandle)
    }

    /// Remove every real node. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        for slot in 2..self.nodes.len() {
            if self.nodes[slot].value.take().is_some() {
                self.release(slot);
            }
        }

        self.nodes[FRONT].next = BACK;
        self.nodes[BACK].prev = FRONT;
        self.len = 0;
    }

    fn handle(&self, slot: usize) -> Handle {
        Handle {
            list: self.id,
            slot,
            generation: self.nodes[slot].generation,
        }
    }

    fn real(&self, slot: usize) -> Option<Handle> {
        if slot == FRONT || slot == BACK {
            None
        } else {
            Some(self.handle(slot))
        }
    }

    fn resolve(&self, handle: Handle) -> Result<usize> {
        let live = handle.list == self.id
            && handle.slot > BACK
            && self
                .nodes
                .get(handle.slot)
                .is_some_and(|node| node.generation == handle.generation && node.value.is_some());

        if live {
            Ok(handle.slot)
        } else {
            warn!(slot = handle.slot, "rejected invalid list handle");
            Err(Error::InvalidHandle)
        }
    }

    fn link_front(&mut self, slot: usize) {
        let first = self.nodes[FRONT].next;

        let node = &mut self.nodes[slot];
        node.prev = FRONT;
        node.next = first;

        self.nodes[first].prev = slot;
        self.nodes[FRONT].next = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = &self.nodes[slot];
            (node.prev, node.next)
        };

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn release(&mut self, slot: usize) {
        let node = &mut self.nodes[slot];
        node.generation = node.generation.wrapping_add(1);
        node.prev = FRONT;
        node.next = BACK;
        self.free_list.push(slot);
    }
}
