//! Named tables
//!
//! A named scope is a [`Scope`] keyed by a human-readable name instead of a
//! source position. Naming changes nothing about resolution or access; it
//! adds `name()` to the [`Table`] and [`Profiler`] built over the scope, and
//! makes every scope declared with the same name refer to one table.

use crate::clock::Clock;
use crate::profiler::Profiler;
use crate::scope::Scope;
use crate::table::Table;
use crate::tag_id::TagId;

/// A [`Scope`] with an attached name
pub trait NamedScope: Scope {
    const NAME: &'static str;
}

/// Declare a scope type keyed by name
///
/// ```
/// use eprofiler::{named_scope, NamedScope, Scope, TableKey};
///
/// named_scope!(pub Net = "Net");
///
/// assert_eq!(Net::NAME, "Net");
/// assert_eq!(Net::KEY, TableKey::Named("Net"));
/// ```
#[macro_export]
macro_rules! named_scope {
    ($(#[$meta:meta])* $vis:vis $name:ident = $value:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Scope for $name {
            const KEY: $crate::TableKey = $crate::TableKey::Named($value);
        }

        impl $crate::NamedScope for $name {
            const NAME: &'static str = $value;
        }
    };
}

impl<S: NamedScope, V, I: TagId> Table<S, V, I> {
    pub fn name(&self) -> &'static str {
        S::NAME
    }
}

impl<S: NamedScope, C: Clock, I: TagId> Profiler<S, C, I> {
    pub fn name(&self) -> &'static str {
        S::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::TableKey;

    crate::named_scope!(Profiler1 = "Profiler1");
    crate::named_scope!(Profiler1Again = "Profiler1");
    crate::named_scope!(Profiler2 = "Profiler2");

    #[test]
    fn test_same_name_same_key() {
        assert_eq!(Profiler1::KEY, Profiler1Again::KEY);
        assert_ne!(Profiler1::KEY, Profiler2::KEY);
    }

    #[test]
    fn test_name_constant() {
        assert_eq!(Profiler1::NAME, "Profiler1");
        assert_eq!(Profiler2::NAME, "Profiler2");
        assert_eq!(Profiler2::KEY, TableKey::Named("Profiler2"));
        assert_eq!(Profiler2::KEY.name(), Some("Profiler2"));
    }
}
