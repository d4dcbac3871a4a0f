//! Heap: array-backed binary heap ordered by a [`Comparator`].
//!
//! The root is always the item the comparator ranks lowest, so [`Natural`]
//! gives a min-heap and [`Reversed`] a max-heap. Any
//! `Fn(&T, &T) -> Ordering` closure works as a comparator too.

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use log::trace;

use crate::cursor::{Cursor, Position};
use crate::error::AllocError;

pub const INITIAL_CAPACITY: usize = 16;

/// Ordering capability supplied to a heap at construction.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// `Ord` order; smallest item first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Reverse `Ord` order; largest item first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reversed;

impl<T: Ord + ?Sized> Comparator<T> for Reversed {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

pub struct Heap<T, C = Natural> {
    cmp: C,
    nodes: Vec<T>,
}

impl<T: Ord> Heap<T> {
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T: Ord> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Heap<T, C>
where
    C: Comparator<T>,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            cmp,
            nodes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn try_with_comparator(cmp: C) -> Result<Self, AllocError> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(INITIAL_CAPACITY)?;
        Ok(Self { cmp, nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The root item, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.nodes.first()
    }

    /// Items in heap (array) order, not sorted order.
    pub fn as_slice(&self) -> &[T] {
        &self.nodes
    }

    fn reserve_total(&mut self, total: usize) -> Result<(), AllocError> {
        if total <= self.nodes.capacity() {
            return Ok(());
        }
        let old = self.nodes.capacity();
        self.nodes.try_reserve_exact(total - self.nodes.len())?;
        trace!("heap grew from {} to {} slots", old, self.nodes.capacity());
        Ok(())
    }

    /// Add `item`, doubling storage when full.
    pub fn push(&mut self, item: T) -> Result<(), AllocError> {
        if self.nodes.len() == self.nodes.capacity() {
            let target = self.nodes.capacity().saturating_mul(2).max(INITIAL_CAPACITY);
            self.reserve_total(target)?;
        }
        self.nodes.push(item);
        self.sift_up(self.nodes.len() - 1);
        Ok(())
    }

    /// Remove and return the root.
    pub fn pop(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let root = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some(root)
    }

    /// Remove every item; storage is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Push a copy of every item of `other`. `other` is left as it was.
    ///
    /// # Errors
    /// Storage for both heaps is reserved up front; if that fails nothing is
    /// pushed.
    pub fn merge<C2>(&mut self, other: &Heap<T, C2>) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.reserve_total(self.nodes.len().saturating_add(other.nodes.len()))?;
        for item in &other.nodes {
            self.push(item.clone())?;
        }
        Ok(())
    }

    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
        C: Clone,
    {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(self.nodes.len().max(INITIAL_CAPACITY))?;
        nodes.extend_from_slice(&self.nodes);
        Ok(Self {
            cmp: self.cmp.clone(),
            nodes,
        })
    }

    /// Cursor yielding items in comparator order. It pops from a private
    /// clone, so building it allocates and `self` is never touched.
    pub fn cursor(&self) -> Result<HeapCursor<T, C>, AllocError>
    where
        T: Clone,
        C: Clone,
    {
        Ok(HeapCursor {
            heap: self.try_clone()?,
            pos: Position::new(),
        })
    }

    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.nodes.len());
        while let Some(item) = self.pop() {
            out.push(item);
        }
        out
    }

    fn sift_up(&mut self, mut k: usize) {
        while k > 0 {
            let parent = (k - 1) / 2;
            if self.cmp.compare(&self.nodes[k], &self.nodes[parent]) != Ordering::Less {
                break;
            }
            self.nodes.swap(k, parent);
            k = parent;
        }
    }

    fn sift_down(&mut self, mut k: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * k + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smaller = left;
            if right < len && self.cmp.compare(&self.nodes[right], &self.nodes[left]) == Ordering::Less
            {
                smaller = right;
            }
            if self.cmp.compare(&self.nodes[k], &self.nodes[smaller]) != Ordering::Greater {
                break;
            }
            self.nodes.swap(k, smaller);
            k = smaller;
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Heap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap").field("nodes", &self.nodes).finish()
    }
}

/// Destructive cursor over a heap clone; dropping or disposing it frees the
/// clone.
pub struct HeapCursor<T, C> {
    heap: Heap<T, C>,
    pos: Position,
}

impl<T, C> HeapCursor<T, C> {
    /// Items not yet yielded.
    pub fn remaining(&self) -> usize {
        self.heap.nodes.len()
    }
}

impl<T, C: Comparator<T>> Cursor for HeapCursor<T, C> {
    type Item = T;

    fn advance(&mut self) -> Option<T> {
        let item = self.heap.pop();
        self.pos.record(item)
    }

    fn index(&self) -> Option<usize> {
        self.pos.index()
    }
}

impl<T, C: Comparator<T>> Iterator for HeapCursor<T, C> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl<T, C: Comparator<T>> ExactSizeIterator for HeapCursor<T, C> {}
impl<T, C: Comparator<T>> FusedIterator for HeapCursor<T, C> {}
