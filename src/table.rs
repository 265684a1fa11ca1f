//! Link-time interning tables
//!
//! A [`Table`] owns the slot array of one scope. Its size and offset come
//! from a finalized [`Layout`], and every access through a bound
//! [`Marker`] is `value_store[id - offset]`: one atomic load, one epoch
//! comparison, one subtraction, one bounds-checked index.
//!
//! A marker bound under another layout of the same table (a different
//! resolver laid the table out differently) is rejected rather than
//! read through, since its ID may name a different tag here.
//!
//! ```
//! use eprofiler::{declare_tags, unique_scope, Resolver, Table};
//!
//! unique_scope!(Counters);
//!
//! declare_tags! {
//!     static COUNTERS: [Counters] = {
//!         HITS = "hits",
//!         MISSES = "misses",
//!     };
//! }
//!
//! let mut resolver = Resolver::new();
//! resolver.declare(COUNTERS);
//! let layout = resolver.finalize().unwrap();
//!
//! let mut table: Table<Counters, u64> = Table::new(&layout).unwrap();
//! *table.at(&HITS) += 1;
//! table[&MISSES] = 7;
//!
//! assert_eq!(table[&HITS], 1);
//! assert_eq!(table.value_store(), &[1, 7]);
//! assert_eq!(table.keys(), &["hits", "misses"]);
//! ```
//!
//! # Concurrency
//!
//! Tables hold no locks. Mutation goes through `&mut self`, so a slot can
//! never be written from two threads at once in safe code. Disjoint slots
//! can be handed to different threads by splitting
//! [`Table::value_store_mut`].

use crate::error::TableError;
use crate::marker::Marker;
use crate::resolver::Layout;
use crate::scope::{Scope, TableKey};
use crate::tag_id::TagId;
use std::fmt;
use std::marker::PhantomData;

/// Slot array for the tags of scope `S`, holding values of type `V` and
/// handing out IDs of type `I`
pub struct Table<S, V, I = u32> {
    offset: I,
    epoch: u16,
    keys: Box<[&'static str]>,
    value_store: Box<[V]>,
    _scope: PhantomData<fn() -> S>,
}

impl<S: Scope, V: Default, I: TagId> Table<S, V, I> {
    /// Build the table for `S` with default-valued slots
    pub fn new(layout: &Layout) -> Result<Self, TableError> {
        Self::with_slots(layout, V::default)
    }
}

impl<S: Scope, V, I: TagId> Table<S, V, I> {
    /// Build the table for `S`, filling each slot with `init()`
    pub fn with_slots(layout: &Layout, mut init: impl FnMut() -> V) -> Result<Self, TableError> {
        let entry = layout
            .table_for::<S>()
            .ok_or(TableError::UnknownTable(S::KEY))?;

        let range = entry.range();
        let offset = I::from_offset(range.start).ok_or(TableError::IdTypeOverflow {
            table: S::KEY,
            end: range.end,
        })?;
        // The last ID must fit as well
        if !range.is_empty() {
            I::from_offset(range.end - 1).ok_or(TableError::IdTypeOverflow {
                table: S::KEY,
                end: range.end,
            })?;
        }

        let value_store: Box<[V]> = (0..entry.len()).map(|_| init()).collect();
        tracing::trace!(table = %S::KEY, offset = range.start, len = value_store.len(), "table built");

        Ok(Table {
            offset,
            epoch: entry.epoch(),
            keys: entry.keys().into(),
            value_store,
            _scope: PhantomData,
        })
    }

    /// Local slot index of a marker
    #[inline]
    pub fn try_index(&self, tag: &Marker<S>) -> Result<usize, TableError> {
        let stamp = tag.binding().stamp().ok_or(TableError::Unresolved {
            table: S::KEY,
            tag: tag.tag(),
        })?;
        let foreign = TableError::ForeignTag {
            table: S::KEY,
            tag: tag.tag(),
            id: stamp.id,
        };
        if stamp.epoch != self.epoch {
            return Err(foreign);
        }
        match stamp.id.checked_sub(self.offset.to_offset()) {
            Some(local) if local < self.value_store.len() => Ok(local),
            _ => Err(foreign),
        }
    }

    #[inline]
    fn local_index(&self, tag: &Marker<S>) -> usize {
        match self.try_index(tag) {
            Ok(local) => local,
            Err(err) => panic!("{}", err),
        }
    }

    /// Mutable slot of `tag`
    ///
    /// # Panics
    ///
    /// Panics if `tag` was never finalized, or was finalized into a
    /// different layout of this table.
    #[inline]
    pub fn at(&mut self, tag: &Marker<S>) -> &mut V {
        let local = self.local_index(tag);
        &mut self.value_store[local]
    }

    /// Shared slot of `tag`
    ///
    /// # Panics
    ///
    /// Same conditions as [`Table::at`].
    #[inline]
    pub fn get(&self, tag: &Marker<S>) -> &V {
        &self.value_store[self.local_index(tag)]
    }

    pub fn try_at(&mut self, tag: &Marker<S>) -> Result<&mut V, TableError> {
        let local = self.try_index(tag)?;
        Ok(&mut self.value_store[local])
    }

    pub fn try_get(&self, tag: &Marker<S>) -> Result<&V, TableError> {
        let local = self.try_index(tag)?;
        Ok(&self.value_store[local])
    }

    /// Global ID of `tag`
    ///
    /// # Panics
    ///
    /// Same conditions as [`Table::at`].
    pub fn get_id(&self, tag: &Marker<S>) -> I {
        self.id_at(self.local_index(tag))
    }

    #[inline]
    fn id_at(&self, local: usize) -> I {
        // Every local index below len() was range-checked in with_slots
        match I::from_offset(self.offset.to_offset() + local) {
            Some(id) => id,
            None => unreachable!("table ids were checked against the id type"),
        }
    }

    /// Local slot index of a raw global ID
    #[inline]
    fn local_of(&self, id: I) -> Option<usize> {
        id.to_offset()
            .checked_sub(self.offset.to_offset())
            .filter(|local| *local < self.value_store.len())
    }

    pub(crate) fn check_id(&self, id: I) -> Result<usize, TableError> {
        self.local_of(id).ok_or(TableError::IdOutOfRange {
            id: id.to_offset(),
            offset: self.offset.to_offset(),
            len: self.value_store.len(),
        })
    }

    pub fn contains_id(&self, id: I) -> bool {
        self.local_of(id).is_some()
    }

    /// Slot of a raw global ID, `None` outside this table
    pub fn slot(&self, id: I) -> Option<&V> {
        self.local_of(id).map(|local| &self.value_store[local])
    }

    pub fn slot_mut(&mut self, id: I) -> Option<&mut V> {
        let local = self.local_of(id)?;
        Some(&mut self.value_store[local])
    }

    /// Tag string of a raw global ID
    pub fn key_of(&self, id: I) -> Option<&'static str> {
        self.local_of(id).map(|local| self.keys[local])
    }

    /// Tag strings in ID order
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Slots in ID order
    pub fn value_store(&self) -> &[V] {
        &self.value_store
    }

    pub fn value_store_mut(&mut self) -> &mut [V] {
        &mut self.value_store
    }

    /// First global ID owned by this table
    pub fn offset(&self) -> I {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.value_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value_store.is_empty()
    }

    pub fn key(&self) -> TableKey {
        S::KEY
    }

    /// `(id, tag, slot)` in ID order
    pub fn iter(&self) -> impl Iterator<Item = (I, &'static str, &V)> + '_ {
        self.keys
            .iter()
            .zip(self.value_store.iter())
            .enumerate()
            .map(move |(local, (key, value))| (self.id_at(local), *key, value))
    }
}

impl<S: Scope, V, I: TagId> std::ops::Index<&Marker<S>> for Table<S, V, I> {
    type Output = V;

    fn index(&self, tag: &Marker<S>) -> &V {
        self.get(tag)
    }
}

impl<S: Scope, V, I: TagId> std::ops::IndexMut<&Marker<S>> for Table<S, V, I> {
    fn index_mut(&mut self, tag: &Marker<S>) -> &mut V {
        self.at(tag)
    }
}

impl<S: Scope, V: fmt::Debug, I: TagId> fmt::Debug for Table<S, V, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("key", &S::KEY)
            .field("offset", &self.offset)
            .field("keys", &self.keys)
            .field("value_store", &self.value_store)
            .finish()
    }
}
