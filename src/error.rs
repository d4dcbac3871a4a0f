//! Error types shared by the containers.
//!
//! A missing key is never an error: lookups and removals return `Option`.
//! Everything here describes an allocation that could not be obtained or an
//! index outside a vector's bounds.

use std::collections::TryReserveError;

use derive_more::{Display, Error, From, IsVariant};

/// An owning allocation (bucket array, key copy, heap or vector storage)
/// could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
#[display("memory allocation failed: {_0}")]
pub struct AllocError(TryReserveError);

/// Failure of [`Table::set`](crate::Table::set).
///
/// The two variants differ in whether the entry was stored.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum SetError {
    /// The key copy could not be allocated; the table is unchanged.
    #[display("entry not stored: {_0}")]
    Allocation(AllocError),
    /// The entry is stored, but growing the bucket array afterwards failed.
    /// The table stays valid, only denser than its load-factor target.
    #[display("entry stored but table could not grow: {_0}")]
    Growth(AllocError),
}

impl SetError {
    /// Whether the entry was stored despite the error.
    pub fn is_stored(&self) -> bool {
        self.is_growth()
    }

    pub fn alloc_error(&self) -> &AllocError {
        match self {
            SetError::Allocation(e) | SetError::Growth(e) => e,
        }
    }
}

/// Failure of [`Table::merge`](crate::Table::merge).
///
/// Merging is not transactional: entries applied before an `Insert` failure
/// stay in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum MergeError {
    /// Pre-sizing the destination failed; nothing was merged.
    #[display("could not reserve room for merge: {_0}")]
    Reserve(AllocError),
    /// An individual insert failed after `merged` source entries were applied.
    #[display("merge stopped after {merged} entries: {source}")]
    Insert { merged: usize, source: AllocError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("index {index} out of bounds for length {len}")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From, IsVariant)]
pub enum VectorError {
    IndexOutOfBounds(IndexOutOfBounds),
    Allocation(AllocError),
}
