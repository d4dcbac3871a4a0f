#![cfg(test)]

// Helpers shared by the in-crate table tests.

use core::hash::{BuildHasher, Hasher};

use crate::error::AllocError;

/// Hashes every key to zero, so every key lands in bucket 0.
#[derive(Clone, Default)]
pub(crate) struct ConstBuildHasher;

pub(crate) struct ConstHasher;

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}

impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}

    fn finish(&self) -> u64 {
        0
    }
}

/// A genuine allocation error, produced by asking for more than `isize::MAX`
/// bytes.
pub(crate) fn alloc_failure() -> AllocError {
    let mut v: Vec<u64> = Vec::new();
    match v.try_reserve_exact(usize::MAX) {
        Err(e) => AllocError::from(e),
        Ok(()) => unreachable!("reserving usize::MAX elements cannot succeed"),
    }
}
