//! FNV-1a (32-bit) hashing over raw key bytes.
//!
//! The table hashes keys by feeding the key bytes to a single
//! `Hasher::write` call, so with [`BuildFnv1a`] a bucket index is exactly
//! `fnv1a(key) % capacity`.

use core::hash::{BuildHasher, Hasher};

pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
pub const FNV_PRIME: u32 = 16_777_619;

/// FNV-1a over `bytes`: `hash = (hash ^ b) * FNV_PRIME` for each byte.
#[inline]
pub const fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash = (hash ^ bytes[i] as u32).wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Streaming FNV-1a hasher. `finish` widens the 32-bit state.
#[derive(Debug, Copy, Clone)]
pub struct Fnv1aHasher {
    hash: u32,
}

impl Fnv1aHasher {
    pub const fn new() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.hash)
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = (self.hash ^ u32::from(b)).wrapping_mul(FNV_PRIME);
        }
    }
}

/// Builder for [`Fnv1aHasher`]; the default hasher of [`Table`](crate::Table).
#[derive(Debug, Copy, Clone, Default)]
pub struct BuildFnv1a;

impl BuildHasher for BuildFnv1a {
    type Hasher = Fnv1aHasher;

    fn build_hasher(&self) -> Self::Hasher {
        Fnv1aHasher::new()
    }
}
