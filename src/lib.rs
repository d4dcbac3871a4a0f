//! chain-collections: in-memory container primitives that share one cursor
//! protocol.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose iteration order is the order keys were first
//!   inserted, plus the small containers that sit beside it (heap, list,
//!   vector), all traversable the same way.
//! - Pieces:
//!   - Table<V, S>: separate-chaining hash table over byte-string keys.
//!     Entries live in a `slotmap` arena; bucket chains and the global
//!     insertion-order list both link entries by handle.
//!   - Heap<T, C>: binary heap ordered by a `Comparator`.
//!   - List<T>: doubly linked list, arena-backed like the table.
//!   - Vector<T>: growable array.
//!   - Cursor: `advance` / `index` / `dispose`, implemented by every
//!     container's cursor; each cursor is also an `Iterator`.
//!
//! Constraints
//! - Single-threaded. No internal locking; wrap in a mutex to share.
//! - Keys are copied into table-owned buffers on insert.
//! - `len / capacity` is at most 0.75 right after an insert that grew the
//!   table; capacity doubles on growth and never shrinks.
//! - Bucket index is `hash mod capacity`; the default hasher is 32-bit
//!   FNV-1a over the raw key bytes.
//!
//! Ordering vs locality
//! - Bucket chains give locality, the global list gives order. Rehashing
//!   walks the global list and rebuilds the chains, so order never depends
//!   on bucket position.
//!
//! Allocation failures
//! - Bucket arrays, key copies, heap and vector storage are reserved with
//!   `try_reserve_exact` and reported as `AllocError`.
//! - `Table::set` separates "nothing stored" from "stored, but could not
//!   grow"; the latter leaves a valid, denser table.
//! - `Table::merge` is not transactional: a failure keeps what was merged.
//! - Arena slots for entries and list nodes come from the global allocator,
//!   which aborts on exhaustion.
//!
//! Values
//! - The table owns values of any `V`; for handle types (`&T`, `Rc<T>`)
//!   that means it only holds the handle. Values replaced by `set` or
//!   `merge`, and removed by `remove`/`drain`, are handed back to the
//!   caller.
//!
//! Cursors and mutation
//! - Table, list and vector cursors borrow their container, so the borrow
//!   checker rules out mutation during iteration. The heap cursor owns a
//!   clone and pops from it.

pub mod cursor;
pub mod error;
pub mod hash;
pub mod heap;
pub mod list;
pub mod table;
pub mod vector;

mod table_proptest;
mod test_util;

// Public surface
pub use cursor::Cursor;
pub use error::{AllocError, IndexOutOfBounds, MergeError, SetError, VectorError};
pub use hash::{fnv1a, BuildFnv1a, Fnv1aHasher};
pub use heap::{Comparator, Heap, Natural, Reversed};
pub use list::List;
pub use table::{EntryRef, Key, Table};
pub use vector::Vector;
