//! Cursor: the external-iterator protocol every container exposes.
//!
//! A cursor is advanced explicitly and disposed explicitly. Once `advance`
//! has returned `None` it keeps returning `None`. Concrete cursors also
//! implement [`Iterator`] by delegating to `advance`, so they work with the
//! standard adapters.
//!
//! Disposal differs per container: the table, list and vector cursors borrow
//! their container and release nothing, while the heap cursor owns a private
//! clone of its heap (iteration pops from it) and drops that clone on
//! disposal.

pub trait Cursor {
    type Item;

    /// Yield the next item, or `None` once exhausted.
    fn advance(&mut self) -> Option<Self::Item>;

    /// Zero-based position of the item last returned by `advance`; `None`
    /// before the first item has been produced.
    fn index(&self) -> Option<usize>;

    /// Release the cursor and anything it owns.
    fn dispose(self)
    where
        Self: Sized,
    {
        drop(self)
    }
}

/// Position bookkeeping shared by the concrete cursors.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Position {
    yielded: usize,
    done: bool,
}

impl Position {
    pub(crate) const fn new() -> Self {
        Self {
            yielded: 0,
            done: false,
        }
    }

    /// Record the outcome of one advance step. After the first `None` the
    /// cursor stays exhausted even if the source would produce more.
    #[inline]
    pub(crate) fn record<T>(&mut self, item: Option<T>) -> Option<T> {
        if self.done {
            return None;
        }
        match item {
            Some(item) => {
                self.yielded += 1;
                Some(item)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    #[inline]
    pub(crate) const fn index(&self) -> Option<usize> {
        self.yielded.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        n: u32,
        pos: Position,
    }

    impl Cursor for Countdown {
        type Item = u32;

        fn advance(&mut self) -> Option<u32> {
            let next = if self.n == 0 {
                None
            } else {
                self.n -= 1;
                Some(self.n)
            };
            self.pos.record(next)
        }

        fn index(&self) -> Option<usize> {
            self.pos.index()
        }
    }

    /// Invariant: index tracks the last yielded item and exhaustion is sticky.
    #[test]
    fn index_and_exhaustion() {
        let mut c = Countdown {
            n: 2,
            pos: Position::new(),
        };
        assert_eq!(c.index(), None);
        assert_eq!(c.advance(), Some(1));
        assert_eq!(c.index(), Some(0));
        assert_eq!(c.advance(), Some(0));
        assert_eq!(c.index(), Some(1));
        assert_eq!(c.advance(), None);
        // Source refilled after exhaustion must not resurrect the cursor.
        c.n = 5;
        assert_eq!(c.advance(), None);
        assert_eq!(c.index(), Some(1));
        c.dispose();
    }
}
