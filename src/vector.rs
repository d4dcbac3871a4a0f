//! Vector: growable array with fallible, doubling growth.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::Deref;

use log::trace;

use crate::cursor::{Cursor, Position};
use crate::error::{AllocError, IndexOutOfBounds, VectorError};

pub const INITIAL_CAPACITY: usize = 16;

pub struct Vector<T> {
    items: Vec<T>,
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn try_new() -> Result<Self, AllocError> {
        let mut items = Vec::new();
        items.try_reserve_exact(INITIAL_CAPACITY)?;
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn grow_if_full(&mut self) -> Result<(), AllocError> {
        if self.items.len() < self.items.capacity() {
            return Ok(());
        }
        let old = self.items.capacity();
        let additional = old.max(INITIAL_CAPACITY);
        self.items.try_reserve_exact(additional)?;
        trace!("vector grew from {} to {} slots", old, self.items.capacity());
        Ok(())
    }

    pub fn push(&mut self, item: T) -> Result<(), AllocError> {
        self.grow_if_full()?;
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    fn check(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, IndexOutOfBounds> {
        self.check(index)?;
        Ok(core::mem::replace(&mut self.items[index], item))
    }

    /// Insert at `index`, shifting later items right. `index == len` appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), VectorError> {
        if index > self.items.len() {
            return Err(IndexOutOfBounds {
                index,
                len: self.items.len(),
            }
            .into());
        }
        self.grow_if_full()?;
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove at `index`, shifting later items left.
    pub fn remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.check(index)?;
        Ok(self.items.remove(index))
    }

    /// Remove every item; storage is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn cursor(&self) -> VectorCursor<'_, T> {
        VectorCursor {
            items: &self.items,
            pos: Position::new(),
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Forward cursor by index.
pub struct VectorCursor<'a, T> {
    items: &'a [T],
    pos: Position,
}

impl<'a, T> Cursor for VectorCursor<'a, T> {
    type Item = &'a T;

    fn advance(&mut self) -> Option<&'a T> {
        let items = self.items;
        let next = self.pos.index().map_or(0, |i| i + 1);
        self.pos.record(items.get(next))
    }

    fn index(&self) -> Option<usize> {
        self.pos.index()
    }
}

impl<'a, T> Iterator for VectorCursor<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.advance()
    }
}

impl<T> FusedIterator for VectorCursor<'_, T> {}
