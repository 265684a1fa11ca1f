//! Identity markers
//!
//! A [`Marker`] is one declaration of a tag for one table scope. Markers are
//! `static` items: the resolver writes the assigned ID into the marker once,
//! and from then on every table access through the marker is an atomic load
//! followed by an array index.
//!
//! Several markers may carry the same tag for the same scope (for example
//! when two modules both declare `"frame"`); the resolver binds all of them
//! to the same ID.
//!
//! Markers are normally declared in groups with
//! [`declare_tags!`](crate::declare_tags), which also emits a slice listing
//! the group for registration with a [`Resolver`](crate::Resolver).

use crate::resolver::Resolver;
use crate::scope::{Scope, TableKey};
use crate::tag::Tag;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

// A bound cell packs the layout epoch above the ID
const ID_BITS: u32 = 48;
const ID_MASK: u64 = (1 << ID_BITS) - 1;
const UNBOUND: u64 = u64::MAX;

/// Exclusive upper bound on the IDs a marker can hold
pub(crate) fn id_capacity() -> usize {
    usize::try_from(ID_MASK + 1).unwrap_or(usize::MAX)
}

/// Exclusive upper bound on the layouts of one table
pub(crate) const EPOCH_CAPACITY: u16 = u16::MAX;

/// An ID together with the table layout it was assigned in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stamp {
    pub(crate) epoch: u16,
    pub(crate) id: usize,
}

impl Stamp {
    fn to_bits(self) -> u64 {
        // id < id_capacity() and epoch < EPOCH_CAPACITY, so this never
        // produces UNBOUND
        (u64::from(self.epoch) << ID_BITS) | (self.id as u64 & ID_MASK)
    }

    fn from_bits(bits: u64) -> Self {
        Stamp {
            epoch: (bits >> ID_BITS) as u16,
            id: (bits & ID_MASK) as usize,
        }
    }
}

/// Write-once stamp cell shared by the resolver and the tables
pub(crate) struct Binding {
    bits: AtomicU64,
}

impl Binding {
    const fn new() -> Self {
        Binding {
            bits: AtomicU64::new(UNBOUND),
        }
    }

    #[inline]
    pub(crate) fn stamp(&self) -> Option<Stamp> {
        match self.bits.load(Ordering::Acquire) {
            UNBOUND => None,
            bits => Some(Stamp::from_bits(bits)),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<usize> {
        self.stamp().map(|stamp| stamp.id)
    }

    /// Bind to `stamp`, returning the existing stamp if bound to something
    /// else
    ///
    /// Binding again to the same stamp succeeds, so finalizing an identical
    /// registration twice is harmless.
    pub(crate) fn bind(&self, stamp: Stamp) -> Result<(), Stamp> {
        let bits = stamp.to_bits();
        match self
            .bits
            .compare_exchange(UNBOUND, bits, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(()),
            Err(existing) if existing == bits => Ok(()),
            Err(existing) => Err(Stamp::from_bits(existing)),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stamp() {
            Some(stamp) => write!(f, "Bound({}@{})", stamp.id, stamp.epoch),
            None => f.write_str("Unbound"),
        }
    }
}

/// Registration hook submitted by [`declare_tags!`](crate::declare_tags) to the link-time
/// registry, see [`Resolver::declare_linked`]
#[doc(hidden)]
pub struct TagGroup {
    register: fn(&mut Resolver),
}

impl TagGroup {
    pub const fn new(register: fn(&mut Resolver)) -> Self {
        TagGroup { register }
    }

    pub(crate) fn register(&self, resolver: &mut Resolver) {
        (self.register)(resolver)
    }
}

inventory::collect!(TagGroup);

/// One declaration of `tag` for the table named by scope `S`
pub struct Marker<S> {
    tag: Tag,
    binding: Binding,
    _scope: PhantomData<fn() -> S>,
}

impl<S: Scope> Marker<S> {
    pub const fn new(tag: Tag) -> Self {
        Marker {
            tag,
            binding: Binding::new(),
            _scope: PhantomData,
        }
    }

    pub const fn tag(&self) -> Tag {
        self.tag
    }

    /// Key of the table this marker belongs to
    pub const fn table(&self) -> TableKey {
        S::KEY
    }

    /// Global ID, once a resolver has bound this marker
    #[inline]
    pub fn id(&self) -> Option<usize> {
        self.binding.get()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.binding
    }
}

impl<S: Scope> fmt::Debug for Marker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("table", &S::KEY)
            .field("tag", &self.tag)
            .field("binding", &self.binding)
            .finish()
    }
}

/// Declare a group of tag markers for one scope
///
/// Emits one `static` [`Marker`] per entry, plus a `static` slice holding the
/// whole group, ready to pass to [`Resolver::declare`](crate::Resolver::declare).
/// The group is also submitted to the link-time registry, so
/// [`Resolver::linked`](crate::Resolver::linked) picks it up without any
/// explicit registration.
///
/// ```
/// use eprofiler::{declare_tags, named_scope, Resolver};
///
/// named_scope!(pub Frame = "Frame");
///
/// declare_tags! {
///     pub static FRAME_TAGS: [Frame] = {
///         pub BEGIN = "begin",
///         pub PRESENT = "present",
///     };
/// }
///
/// let mut resolver = Resolver::new();
/// resolver.declare(FRAME_TAGS);
/// let layout = resolver.finalize().unwrap();
///
/// assert_eq!(layout.table_for::<Frame>().unwrap().keys(), &["begin", "present"]);
/// assert!(BEGIN.is_bound());
/// ```
#[macro_export]
macro_rules! declare_tags {
    (
        $(#[$list_meta:meta])*
        $list_vis:vis static $list:ident: [$scope:ty] = {
            $( $(#[$meta:meta])* $vis:vis $name:ident = $value:literal ),* $(,)?
        };
    ) => {
        $(
            $(#[$meta])*
            $vis static $name: $crate::Marker<$scope> = $crate::Marker::new($crate::Tag::new($value));
        )*

        $(#[$list_meta])*
        $list_vis static $list: &[&$crate::Marker<$scope>] = &[$(&$name),*];

        const _: () = {
            fn register(resolver: &mut $crate::Resolver) {
                resolver.declare($list);
            }

            $crate::inventory::submit! {
                $crate::TagGroup::new(register)
            }
        };
    };
}
