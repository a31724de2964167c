//! HashIndex: the bucket-chained intrusive table.

use core::mem;
use core::ptr;
use std::io;

use crate::key::KeyPolicy;
use crate::link::Indexed;

const DEFAULT_GROWTH_RATIO: usize = 3;
const GROWTH_FACTOR: usize = 4;

/// Caller contract breaches that the index can detect and report.
///
/// These are the programmer-error class, kept distinct from ordinary
/// not-found results so both can be asserted on separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// `remove` was handed a record that is not linked into the bucket its
    /// key maps to. The table is left unchanged.
    RecordNotIndexed,
}

/// Structural counters and the memory footprint of the table itself.
///
/// `table_bytes` covers the table header and the bucket array only;
/// indexed records are caller-owned and never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub initial_buckets: usize,
    pub buckets: usize,
    pub entries: usize,
    pub table_bytes: usize,
}

/// An intrusive hash index over caller-owned records.
///
/// The index stores only bucket heads; every record referenced by the
/// index lives outside it for the whole `'a` and carries its own chain
/// slot (see [`Indexed`](crate::Indexed)). Nothing is allocated per entry
/// and nothing is freed on removal.
///
/// Duplicate keys are allowed by design: [`insert`](Self::insert) never
/// checks for an existing match, and [`find_next`](Self::find_next) walks
/// the remaining matches. Each *record*, however, may be linked in at most
/// once and into at most one index at a time.
pub struct HashIndex<'a, R, P> {
    buckets: Vec<Option<&'a R>>,
    buckets_init: usize,
    entries: usize,
    growth_ratio: usize,
    policy: P,
}

impl<'a, R, P> HashIndex<'a, R, P>
where
    R: Indexed<'a>,
    P: KeyPolicy<R::Key>,
{
    /// Create an index with `initial_buckets` empty buckets and the
    /// default growth ratio of 3.
    ///
    /// # Panics
    /// Panics if `initial_buckets` is zero.
    pub fn new(initial_buckets: usize, policy: P) -> Self {
        Self::with_growth_ratio(initial_buckets, DEFAULT_GROWTH_RATIO, policy)
    }

    /// Create an index with an explicit growth ratio: after an insertion
    /// leaves `entries / buckets >= growth_ratio` (integer division), the
    /// bucket array is rebuilt at four times its size and every record is
    /// rehashed.
    ///
    /// # Panics
    /// Panics if `initial_buckets` or `growth_ratio` is zero.
    pub fn with_growth_ratio(initial_buckets: usize, growth_ratio: usize, policy: P) -> Self {
        assert!(initial_buckets > 0, "hash index needs at least one bucket");
        assert!(growth_ratio > 0, "growth ratio must be positive");
        Self {
            buckets: vec![None; initial_buckets],
            buckets_init: initial_buckets,
            entries: 0,
            growth_ratio,
            policy,
        }
    }

    /// Number of indexed records. O(1).
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Current bucket count; grows by 4x steps, resets on `clear`.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn initial_bucket_count(&self) -> usize {
        self.buckets_init
    }

    pub fn growth_ratio(&self) -> usize {
        self.growth_ratio
    }

    fn bucket_of(&self, key: &R::Key) -> usize {
        self.policy.hash(key).unsigned_abs() as usize % self.buckets.len()
    }

    /// First record whose key is policy-equal to `key`, or `None`.
    ///
    /// The returned borrow is tied to the records' lifetime, not to this
    /// call, so it stays usable while the index is mutated.
    pub fn find(&self, key: &R::Key) -> Option<&'a R> {
        let mut cur = self.buckets[self.bucket_of(key)];
        while let Some(r) = cur {
            if self.policy.eq(r.key(), key) {
                return Some(r);
            }
            cur = r.hash_link().next();
        }
        None
    }

    /// Next record after `prev` on the same chain with a policy-equal key.
    ///
    /// `prev` must be a record previously returned by [`find`](Self::find)
    /// or `find_next` on this index. The scan order among equal keys is
    /// unspecified but stable as long as no insertion lands in that chain
    /// between calls. Removing `prev` itself is fine: removal leaves the
    /// removed record's own link intact, so the scan continues.
    pub fn find_next(&self, prev: &'a R) -> Option<&'a R> {
        let key = prev.key();
        let mut cur = prev.hash_link().next();
        while let Some(r) = cur {
            if self.policy.eq(r.key(), key) {
                return Some(r);
            }
            cur = r.hash_link().next();
        }
        None
    }

    /// Link `record` into the bucket its key maps to, at the front of the
    /// chain. O(1). No duplicate-key check is made; index multiple records
    /// with equal keys freely and scan them with
    /// [`find_next`](Self::find_next).
    ///
    /// `record` must not currently be linked into this or any other index;
    /// a same-index double insert is caught in debug builds only.
    pub fn insert(&mut self, record: &'a R) {
        let bucket = self.bucket_of(record.key());
        debug_assert!(
            !self.chain_contains(bucket, record),
            "record is already linked into this index"
        );
        record.hash_link().set_next(self.buckets[bucket]);
        self.buckets[bucket] = Some(record);
        self.entries += 1;

        // Chains are getting crowded: rebuild wider.
        if self.entries / self.buckets.len() >= self.growth_ratio {
            self.grow();
        }
    }

    /// Unlink `record` from its bucket, matching by identity, never by key
    /// equality (with duplicate keys only the exact record given here is
    /// removed). Never resizes and never touches any other chain, so an
    /// enumeration or `find`/`find_next` scan in progress stays valid
    /// across removal of its current record.
    ///
    /// Handing over a record that is not in its computed bucket is a
    /// caller bug, reported as [`ContractViolation::RecordNotIndexed`]
    /// with the table unchanged.
    pub fn remove(&mut self, record: &'a R) -> Result<(), ContractViolation> {
        let bucket = self.bucket_of(record.key());
        let head = self.buckets[bucket].ok_or(ContractViolation::RecordNotIndexed)?;
        if ptr::eq(head, record) {
            self.buckets[bucket] = record.hash_link().next();
        } else {
            let mut prev = head;
            loop {
                match prev.hash_link().next() {
                    Some(r) if ptr::eq(r, record) => {
                        prev.hash_link().set_next(record.hash_link().next());
                        break;
                    }
                    Some(r) => prev = r,
                    None => return Err(ContractViolation::RecordNotIndexed),
                }
            }
        }
        self.entries -= 1;
        Ok(())
    }

    /// Drop every entry and restore the bucket array to its construction
    /// size. Records themselves are untouched; the caller is responsible
    /// for knowing they are no longer indexed.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.buckets.resize(self.buckets_init, None);
        self.entries = 0;
    }

    /// Visit every indexed record once, buckets in index order, chains
    /// front to back. The index must not be mutated while the iterator is
    /// alive; use [`retain`](Self::retain) to delete during a sweep.
    pub fn iter(&self) -> Iter<'_, 'a, R, P> {
        Iter {
            table: self,
            bucket: 0,
            cur: None,
        }
    }

    /// Sweep every record, unlinking those for which `keep` returns false.
    /// Only the record currently visited is ever unlinked, so the sweep
    /// itself stays consistent. No rebuild happens regardless of how many
    /// records are dropped.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&'a R) -> bool,
    {
        for bucket in 0..self.buckets.len() {
            while let Some(head) = self.buckets[bucket] {
                if keep(head) {
                    break;
                }
                self.buckets[bucket] = head.hash_link().next();
                self.entries -= 1;
            }
            if let Some(mut prev) = self.buckets[bucket] {
                while let Some(r) = prev.hash_link().next() {
                    if keep(r) {
                        prev = r;
                    } else {
                        prev.hash_link().set_next(r.hash_link().next());
                        self.entries -= 1;
                    }
                }
            }
        }
    }

    /// Structural counters plus the table's own memory footprint.
    pub fn stats(&self) -> Stats {
        Stats {
            initial_buckets: self.buckets_init,
            buckets: self.buckets.len(),
            entries: self.entries,
            table_bytes: mem::size_of::<Self>()
                + self.buckets.len() * mem::size_of::<Option<&'a R>>(),
        }
    }

    /// Human-readable statistics: the counters plus per-bucket chain
    /// lengths. Diagnostic only; the layout is not a stable format.
    pub fn dump_stats<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        let stats = self.stats();
        writeln!(w, "intrusive hash index statistics:")?;
        writeln!(w, "\tinitial buckets = {}", stats.initial_buckets)?;
        writeln!(w, "\tbuckets = {}", stats.buckets)?;
        writeln!(w, "\tentries = {}", stats.entries)?;
        writeln!(w, "\ttable bytes = {}", stats.table_bytes)?;
        write!(w, "distribution:")?;
        for head in &self.buckets {
            let mut n = 0usize;
            let mut cur = *head;
            while let Some(r) = cur {
                n += 1;
                cur = r.hash_link().next();
            }
            write!(w, " {}", n)?;
        }
        writeln!(w)
    }

    /// `dump_stats` to stderr, errors swallowed.
    pub fn print_stats(&self) {
        let _ = self.dump_stats(&mut io::stderr());
    }

    /// Rebuild four times wider and rehash every record. Triggered only
    /// from `insert`. Final load is a quarter of the trigger ratio, so a
    /// rebuild can never cascade.
    fn grow(&mut self) {
        let widened = self.buckets.len() * GROWTH_FACTOR;
        let old = mem::replace(&mut self.buckets, vec![None; widened]);
        for mut cur in old {
            while let Some(r) = cur {
                cur = r.hash_link().next();
                let bucket = self.bucket_of(r.key());
                r.hash_link().set_next(self.buckets[bucket]);
                self.buckets[bucket] = Some(r);
            }
        }
    }

    // Debug-only probe behind the debug_assert in insert.
    fn chain_contains(&self, bucket: usize, record: &'a R) -> bool {
        let mut cur = self.buckets[bucket];
        while let Some(r) = cur {
            if ptr::eq(r, record) {
                return true;
            }
            cur = r.hash_link().next();
        }
        false
    }
}

/// Iterator over all indexed records. See [`HashIndex::iter`].
pub struct Iter<'t, 'a, R, P> {
    table: &'t HashIndex<'a, R, P>,
    bucket: usize,
    cur: Option<&'a R>,
}

impl<'t, 'a, R, P> Iterator for Iter<'t, 'a, R, P>
where
    R: Indexed<'a>,
    P: KeyPolicy<R::Key>,
{
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(r) = self.cur {
                self.cur = r.hash_link().next();
                return Some(r);
            }
            if self.bucket >= self.table.buckets.len() {
                return None;
            }
            self.cur = self.table.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}

impl<'t, 'a, R, P> IntoIterator for &'t HashIndex<'a, R, P>
where
    R: Indexed<'a>,
    P: KeyPolicy<R::Key>,
{
    type Item = &'a R;
    type IntoIter = Iter<'t, 'a, R, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
