//! List: doubly linked list with nodes stored in a generational arena.

use core::fmt;
use core::iter::FusedIterator;

use slotmap::{new_key_type, SlotMap};

use crate::cursor::{Cursor, Position};

new_key_type! {
    struct NodeId;
}

struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

pub struct List<T> {
    nodes: SlotMap<NodeId, Node<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn front(&self) -> Option<&T> {
        self.nodes.get(self.head?).map(|n| &n.value)
    }

    pub fn back(&self) -> Option<&T> {
        self.nodes.get(self.tail?).map(|n| &n.value)
    }

    /// Append at the tail.
    pub fn push(&mut self, value: T) {
        let id = self.nodes.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail.and_then(|t| self.nodes.get_mut(t)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Remove from the tail.
    pub fn pop(&mut self) -> Option<T> {
        let node = self.nodes.remove(self.tail?)?;
        self.tail = node.prev;
        match node.prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next = None,
            None => self.head = None,
        }
        Some(node.value)
    }

    /// Insert at the head.
    pub fn unshift(&mut self, value: T) {
        let id = self.nodes.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|h| self.nodes.get_mut(h)) {
            Some(head) => head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Remove from the head.
    pub fn shift(&mut self) -> Option<T> {
        let node = self.nodes.remove(self.head?)?;
        self.head = node.next;
        match node.next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next) => next.prev = None,
            None => self.tail = None,
        }
        Some(node.value)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Append copies of `other`'s items in order; `other` is unchanged.
    pub fn concat(&mut self, other: &List<T>)
    where
        T: Clone,
    {
        for item in other.iter() {
            self.push(item.clone());
        }
    }

    /// Move every item of `other` onto the end of `self`, leaving `other`
    /// empty.
    pub fn append(&mut self, other: &mut List<T>) {
        while let Some(item) = other.shift() {
            self.push(item);
        }
    }

    pub fn cursor(&self) -> ListCursor<'_, T> {
        ListCursor {
            nodes: &self.nodes,
            next: self.head,
            pos: Position::new(),
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.nodes.len(),
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        let mut list = List::new();
        list.concat(self);
        list
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward cursor from head to tail.
pub struct ListCursor<'a, T> {
    nodes: &'a SlotMap<NodeId, Node<T>>,
    next: Option<NodeId>,
    pos: Position,
}

impl<'a, T> Cursor for ListCursor<'a, T> {
    type Item = &'a T;

    fn advance(&mut self) -> Option<&'a T> {
        let nodes = self.nodes;
        let item = match self.next.and_then(|id| nodes.get(id)) {
            Some(node) => {
                self.next = node.next;
                Some(&node.value)
            }
            None => None,
        };
        self.pos.record(item)
    }

    fn index(&self) -> Option<usize> {
        self.pos.index()
    }
}

impl<'a, T> Iterator for ListCursor<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.advance()
    }
}

impl<T> FusedIterator for ListCursor<'_, T> {}

pub struct Iter<'a, T> {
    nodes: &'a SlotMap<NodeId, Node<T>>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}
