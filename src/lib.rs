//! eprofiler - link-time string interning tables and an event profiler
//!
//! Tags are compile-time string literals attached to a table scope. A single
//! finalization pass at start-up assigns every distinct `(scope, tag)` pair a
//! dense global ID, after which table access by tag is one subtraction and
//! one array index with no hashing or string comparison.
//!
//! ```
//! use eprofiler::{declare_tags, named_scope, Profiler, Resolver, Table, TickClock};
//!
//! named_scope!(Loop = "Loop");
//!
//! declare_tags! {
//!     static LOOP_TAGS: [Loop] = {
//!         START = "start",
//!         INPUT = "input",
//!         DRAW = "draw",
//!     };
//! }
//!
//! let mut resolver = Resolver::new();
//! resolver.declare(LOOP_TAGS);
//! let layout = resolver.finalize().unwrap();
//!
//! let mut counts: Table<Loop, u32> = Table::new(&layout).unwrap();
//! counts[&DRAW] += 1;
//!
//! let mut profiler: Profiler<Loop, TickClock> =
//!     Profiler::new(&layout, TickClock::new()).unwrap();
//! profiler.set_time(&START);
//! profiler.set_time_relative(&START, &DRAW);
//! assert_eq!(profiler.get_duration(&DRAW), 1);
//! ```

pub mod clock;
pub mod error;
pub mod marker;
pub mod named;
pub mod profiler;
pub mod resolver;
pub mod scope;
pub mod table;
pub mod tag;
pub mod tag_id; // ID integer types

pub use clock::{Clock, MonotonicClock, TickClock};
pub use error::{ResolveError, TableError};
pub use marker::Marker;
pub use named::NamedScope;
pub use profiler::{Profiler, TimedSlot};
pub use resolver::{Layout, Resolver, ResolverConfig, TableLayout, TableOrder};
pub use scope::{Scope, Site, TableKey};
pub use table::Table;
pub use tag::Tag;
pub use tag_id::TagId;

// Used by `declare_tags!` expansions
#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use marker::TagGroup;
