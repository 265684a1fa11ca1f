//! Timestamp and duration profiling over an interning table
//!
//! A [`Profiler`] is a [`Table`] whose slots are [`TimedSlot`]s, plus the
//! [`Clock`] that fills them. Recording an event writes `now()` into the
//! event's slot; a slot may also remember which other event it should be
//! measured against, so `get_duration(tag)` reports "time since the event I
//! was linked to" without the caller naming both ends again.
//!
//! # Example
//!
//! ```
//! use eprofiler::{declare_tags, named_scope, Profiler, Resolver, TickClock};
//!
//! named_scope!(Frame = "Frame");
//!
//! declare_tags! {
//!     static FRAME_TAGS: [Frame] = {
//!         BEGIN = "begin",
//!         UPDATE = "update",
//!         RENDER = "render",
//!     };
//! }
//!
//! let mut resolver = Resolver::new();
//! resolver.declare(FRAME_TAGS);
//! let layout = resolver.finalize().unwrap();
//!
//! let mut profiler: Profiler<Frame, TickClock> =
//!     Profiler::new(&layout, TickClock::new()).unwrap();
//!
//! profiler.set_time(&BEGIN); // t = 0
//! profiler.set_time_relative(&BEGIN, &UPDATE); // t = 1
//! profiler.set_time_relative(&UPDATE, &RENDER); // t = 2
//!
//! assert_eq!(profiler.get_duration(&UPDATE), 1);
//! assert_eq!(profiler.get_duration(&RENDER), 1);
//! assert_eq!(profiler.get_duration_between(&BEGIN, &RENDER), 2);
//! assert_eq!(profiler.name(), "Frame");
//! ```

use crate::clock::Clock;
use crate::error::TableError;
use crate::marker::Marker;
use crate::resolver::Layout;
use crate::scope::Scope;
use crate::table::Table;
use crate::tag_id::TagId;
use std::fmt;

/// One recorded event: its time and, optionally, the ID of the event it is
/// measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedSlot<I, T> {
    pub reference: Option<I>,
    pub time: T,
}

/// Event recorder for the tags of scope `S`, reading time from `C`
pub struct Profiler<S, C: Clock, I = u32> {
    table: Table<S, TimedSlot<I, C::TimePoint>, I>,
    clock: C,
}

impl<S: Scope, C: Clock, I: TagId> Profiler<S, C, I> {
    /// Build the profiler for `S`
    ///
    /// Every slot starts at `clock.origin()` with no reference.
    pub fn new(layout: &Layout, clock: C) -> Result<Self, TableError> {
        let origin = clock.origin();
        let table = Table::with_slots(layout, || TimedSlot {
            reference: None,
            time: origin,
        })?;
        Ok(Profiler { table, clock })
    }

    /// Record `tag` now, with no reference
    #[inline]
    pub fn set_time(&mut self, tag: &Marker<S>) {
        let slot = self.table.at(tag);
        slot.reference = None;
        slot.time = self.clock.now();
    }

    /// Record `tag` now, measured against `reference`
    #[inline]
    pub fn set_time_relative(&mut self, reference: &Marker<S>, tag: &Marker<S>) {
        let reference = self.table.get_id(reference);
        let slot = self.table.at(tag);
        slot.reference = Some(reference);
        slot.time = self.clock.now();
    }

    /// Stored time point of `tag`
    pub fn get_time(&mut self, tag: &Marker<S>) -> &mut C::TimePoint {
        &mut self.table.at(tag).time
    }

    pub fn time(&self, tag: &Marker<S>) -> C::TimePoint {
        self.table.get(tag).time
    }

    /// ID of the event `tag` is measured against, if any
    pub fn reference(&self, tag: &Marker<S>) -> Option<I> {
        self.table.get(tag).reference
    }

    fn duration_of(&self, slot: &TimedSlot<I, C::TimePoint>) -> C::Duration {
        match slot.reference.and_then(|id| self.table.slot(id)) {
            Some(reference) => slot.time - reference.time,
            None => C::Duration::default(),
        }
    }

    /// Time between `tag` and its reference; zero when there is none
    pub fn get_duration(&self, tag: &Marker<S>) -> C::Duration {
        self.duration_of(self.table.get(tag))
    }

    /// `time(end) - time(start)`, ignoring stored references
    pub fn get_duration_between(&self, start: &Marker<S>, end: &Marker<S>) -> C::Duration {
        self.table.get(end).time - self.table.get(start).time
    }

    /// [`Profiler::get_duration`] addressed by raw global ID
    pub fn get_duration_by_id(&self, id: I) -> Result<C::Duration, TableError> {
        let local = self.table.check_id(id)?;
        Ok(self.duration_of(&self.table.value_store()[local]))
    }

    /// `(tag, duration)` for every slot, in ID order
    pub fn durations(&self) -> impl Iterator<Item = (&'static str, C::Duration)> + '_ {
        self.table
            .iter()
            .map(move |(_, key, slot)| (key, self.duration_of(slot)))
    }

    /// Put every slot back to the clock origin with no reference
    pub fn reset(&mut self) {
        let origin = self.clock.origin();
        for slot in self.table.value_store_mut() {
            *slot = TimedSlot {
                reference: None,
                time: origin,
            };
        }
    }

    pub fn get_id(&self, tag: &Marker<S>) -> I {
        self.table.get_id(tag)
    }

    pub fn keys(&self) -> &[&'static str] {
        self.table.keys()
    }

    pub fn value_store(&self) -> &[TimedSlot<I, C::TimePoint>] {
        self.table.value_store()
    }

    pub fn value_store_mut(&mut self) -> &mut [TimedSlot<I, C::TimePoint>] {
        self.table.value_store_mut()
    }

    pub fn offset(&self) -> I {
        self.table.offset()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn table(&self) -> &Table<S, TimedSlot<I, C::TimePoint>, I> {
        &self.table
    }
}

impl<S, C, I> fmt::Debug for Profiler<S, C, I>
where
    S: Scope,
    C: Clock + fmt::Debug,
    C::TimePoint: fmt::Debug,
    I: TagId,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiler")
            .field("table", &self.table)
            .field("clock", &self.clock)
            .finish()
    }
}
