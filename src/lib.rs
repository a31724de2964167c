//! ihash: an intrusive, bucket-chained hash index over caller-owned
//! records.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: index records by a key field embedded in each record, with no
//!   per-entry node allocation and no key duplication inside the table.
//! - Pieces:
//!   - HashLink<'a, R>: the chain slot a record embeds; one shared-borrow
//!     cell holding "next record in my bucket".
//!   - Indexed<'a>: the record trait saying where the key lives and
//!     where the link lives. Replaces byte-offset field descriptors
//!     with a type-checked bound.
//!   - KeyPolicy<K>: hash + equality for one key type, bound at
//!     construction; StrKey / StrRefKey / WordKey / FourWordKey are the
//!     predefined policies.
//!   - HashIndex<'a, R, P>: the table itself, a vector of chain heads
//!     plus counters. Everything else lives inside the records.
//!
//! Constraints
//! - Single-threaded: chains use `Cell`, so the index is `!Sync`; the
//!   caller serializes all access.
//! - Records are caller-owned for the whole `'a`. The index never
//!   allocates, copies, or frees a record; removal just unlinks.
//! - Duplicate keys are allowed; `find` returns the first match on the
//!   chain and `find_next` walks the rest.
//! - A record may be linked into at most one index at a time, at most
//!   once (debug builds probe for same-index double inserts).
//!
//! Growth
//! - After an insert leaves `entries / buckets >= growth_ratio` (default
//!   3), the bucket array is rebuilt four times wider and every record is
//!   rehashed. Removal never rebuilds and never touches other chains, so
//!   a scan may delete its current match and keep going.
//! - `clear` restores the construction-time bucket count.
//!
//! Errors
//! - Lookup misses are `None`, not errors.
//! - Removing a record that is not indexed is a caller bug, reported as
//!   `ContractViolation::RecordNotIndexed` with the table unchanged.
//! - Construction with zero buckets or a zero growth ratio panics.
//!
//! Hashing caveat
//! - The predefined string and four-word policies accumulate key bytes
//!   base-10, so ASCII-decimal keys hash to their numeric value. This is
//!   a deliberately preserved historical scheme, not a well-distributed
//!   hash; see `key.rs` for the details.

mod index;
mod index_proptest;
mod key;
mod link;

// Public surface
pub use index::{ContractViolation, HashIndex, Iter, Stats};
pub use key::{FourWordKey, KeyPolicy, StrKey, StrRefKey, WordKey};
pub use link::{HashLink, Indexed};
