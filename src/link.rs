//! The embeddable chain slot and the record trait.
//!
//! Records indexed by [`HashIndex`](crate::HashIndex) carry their own chain
//! linkage: a [`HashLink`] field embedded in the record, plus an impl of
//! [`Indexed`] that tells the index where the key and the link live. No
//! per-entry node allocation happens anywhere.

use core::cell::Cell;
use core::fmt;

/// The chain slot embedded in every indexable record.
///
/// Holds the "next record in my bucket" reference. Interior mutability lets
/// the index relink chains while records stay behind shared borrows; the
/// cell is never exposed, so callers cannot corrupt a chain from outside
/// the crate.
///
/// A record (and therefore its link) may be inserted into at most one
/// [`HashIndex`](crate::HashIndex) at a time, and at most once.
pub struct HashLink<'a, R> {
    next: Cell<Option<&'a R>>,
}

impl<'a, R> HashLink<'a, R> {
    /// Create an unlinked slot. Const so it can be a field initializer.
    pub const fn new() -> Self {
        Self {
            next: Cell::new(None),
        }
    }

    pub(crate) fn next(&self) -> Option<&'a R> {
        self.next.get()
    }

    pub(crate) fn set_next(&self, next: Option<&'a R>) {
        self.next.set(next);
    }
}

impl<'a, R> Default for HashLink<'a, R> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: deriving would demand R: Debug and chase the chain.
impl<'a, R> fmt::Debug for HashLink<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLink")
            .field("linked", &self.next.get().is_some())
            .finish()
    }
}

/// A record that can be indexed by a [`HashIndex`](crate::HashIndex).
///
/// Implementors expose the key field and the embedded [`HashLink`]; the
/// index reads the key and reads/writes the link, and never touches the
/// rest of the record. The key must not change while the record is
/// indexed, or lookups and removal will probe the wrong bucket.
pub trait Indexed<'a>: Sized {
    /// The key type this record is indexed by. Matched against a
    /// [`KeyPolicy`](crate::KeyPolicy) at table construction.
    type Key: ?Sized;

    /// Borrow the embedded key field.
    fn key(&self) -> &Self::Key;

    /// Borrow the embedded chain slot.
    fn hash_link(&self) -> &HashLink<'a, Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_link_is_unlinked() {
        let l: HashLink<'_, u32> = HashLink::new();
        assert!(l.next().is_none());
        assert_eq!(format!("{:?}", l), "HashLink { linked: false }");
    }

    #[test]
    fn set_and_clear_next() {
        let target = 7u32;
        let l: HashLink<'_, u32> = HashLink::default();
        l.set_next(Some(&target));
        assert!(core::ptr::eq(l.next().unwrap(), &target));
        assert_eq!(format!("{:?}", l), "HashLink { linked: true }");
        l.set_next(None);
        assert!(l.next().is_none());
    }
}
