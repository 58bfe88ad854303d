// Node Arena - the work chain stored as a slab with index links
//
// head = newest, tail = oldest. Removed slots go on a free list and their
// generation is bumped, which invalidates outstanding handles.

use crate::domain::{Node, NodeHandle};
use std::sync::Arc;

struct Slot<T> {
    generation: u64,
    node: Option<Node<T>>,
}

pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.iter_oldest_first().count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tail.is_none()
    }

    /// Newest node
    #[cfg(test)]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Oldest node
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Link a new node in as head
    pub fn push_head(&mut self, payload: T) -> NodeHandle {
        let mut node = Node::new(payload);
        node.older = self.head;

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => {
                if let Some(old) = self.node_mut(old_head) {
                    old.newer = Some(index);
                }
            }
            None => self.tail = Some(index),
        }
        self.head = Some(index);

        NodeHandle::new(index, self.slots[index].generation)
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&Node<T>> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node<T>> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Handle for a live index
    pub fn handle(&self, index: usize) -> Option<NodeHandle> {
        let slot = self.slots.get(index)?;
        slot.node.as_ref()?;
        Some(NodeHandle::new(index, slot.generation))
    }

    pub fn node(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index)?.node.as_ref()
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index)?.node.as_mut()
    }

    /// Remove by handle. `None` if the handle is stale.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<Node<T>> {
        self.get(handle)?;
        self.unlink(handle.index())
    }

    /// Unlink a node, fixing neighbors and the head/tail endpoints
    pub fn unlink(&mut self, index: usize) -> Option<Node<T>> {
        let slot = self.slots.get_mut(index)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        match node.newer {
            Some(newer) => {
                if let Some(n) = self.node_mut(newer) {
                    n.older = node.older;
                }
            }
            None => self.head = node.older,
        }
        match node.older {
            Some(older) => {
                if let Some(n) = self.node_mut(older) {
                    n.newer = node.newer;
                }
            }
            None => self.tail = node.newer,
        }

        self.free.push(index);
        Some(node)
    }

    /// Walk from tail to head
    pub fn iter_oldest_first(&self) -> OldestFirst<'_, T> {
        OldestFirst {
            arena: self,
            next: self.tail,
        }
    }

    /// Mark every pending node dispatched and return them oldest first
    pub fn take_pending(&mut self) -> Vec<(NodeHandle, Arc<T>)> {
        let pending: Vec<usize> = self
            .iter_oldest_first()
            .filter(|(_, node)| node.is_pending())
            .map(|(index, _)| index)
            .collect();

        let mut batch = Vec::with_capacity(pending.len());
        for index in pending {
            let Some(handle) = self.handle(index) else {
                continue;
            };
            if let Some(node) = self.node_mut(index) {
                if node.mark_dispatched().is_ok() {
                    batch.push((handle, node.shared_payload()));
                }
            }
        }
        batch
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct OldestFirst<'a, T> {
    arena: &'a NodeArena<T>,
    next: Option<usize>,
}

impl<'a, T> Iterator for OldestFirst<'a, T> {
    type Item = (usize, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let node = self.arena.node(index)?;
        self.next = node.newer;
        Some((index, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeState, ProcessOutcome};

    fn payloads(arena: &NodeArena<&'static str>) -> Vec<&'static str> {
        arena
            .iter_oldest_first()
            .map(|(_, node)| *node.payload())
            .collect()
    }

    #[test]
    fn test_push_head_keeps_arrival_order() {
        let mut arena = NodeArena::new();
        assert!(arena.is_empty());
        assert!(arena.head().is_none() && arena.tail().is_none());

        arena.push_head("a");
        arena.push_head("b");
        arena.push_head("c");

        assert_eq!(arena.len(), 3);
        assert_eq!(payloads(&arena), vec!["a", "b", "c"]);
        assert_eq!(arena.node(arena.tail().unwrap()).unwrap().payload(), &"a");
        assert_eq!(arena.node(arena.head().unwrap()).unwrap().payload(), &"c");
    }

    #[test]
    fn test_unlink_head_tail_and_interior() {
        let mut arena = NodeArena::new();
        let a = arena.push_head("a");
        let b = arena.push_head("b");
        let c = arena.push_head("c");
        let d = arena.push_head("d");

        // interior
        assert!(arena.remove(b).is_some());
        assert_eq!(payloads(&arena), vec!["a", "c", "d"]);

        // head
        assert!(arena.remove(d).is_some());
        assert_eq!(payloads(&arena), vec!["a", "c"]);
        assert_eq!(arena.head(), Some(c.index()));

        // tail
        assert!(arena.remove(a).is_some());
        assert_eq!(payloads(&arena), vec!["c"]);
        assert_eq!(arena.tail(), Some(c.index()));

        // last one
        assert!(arena.remove(c).is_some());
        assert!(arena.is_empty());
        assert!(arena.head().is_none() && arena.tail().is_none());
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut arena = NodeArena::new();
        let first = arena.push_head("first");
        assert!(arena.remove(first).is_some());

        let second = arena.push_head("second");
        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());

        assert!(arena.get(first).is_none());
        assert!(arena.remove(first).is_none());
        assert_eq!(arena.get(second).unwrap().payload(), &"second");
    }

    #[test]
    fn test_take_pending_marks_dispatched_once() {
        let mut arena = NodeArena::new();
        arena.push_head(1);
        let second = arena.push_head(2);
        arena.push_head(3);

        arena
            .get_mut(second)
            .unwrap()
            .complete(ProcessOutcome::keep(20))
            .unwrap();

        let batch = arena.take_pending();
        let values: Vec<i32> = batch.iter().map(|(_, p)| **p).collect();
        assert_eq!(values, vec![1, 3]);
        for (handle, _) in &batch {
            assert_eq!(arena.get(*handle).unwrap().state(), NodeState::Dispatched);
        }

        assert!(arena.take_pending().is_empty());
    }
}
