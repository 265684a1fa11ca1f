//! Table scopes and unique scope generation
//!
//! Every table is identified by a zero-size *scope* type implementing
//! [`Scope`]. The scope carries the table's [`TableKey`], which is what the
//! resolver groups tag occurrences by:
//!
//! - [`TableKey::Named`] for scopes declared with
//!   [`named_scope!`](crate::named_scope). Every scope type declared with
//!   the same name refers to the same table.
//! - [`TableKey::Site`] for anonymous scopes declared with
//!   [`unique_scope!`](crate::unique_scope). The key is the source position
//!   of the macro invocation, so two textually identical declarations on
//!   different lines stay distinct.
//!
//! ```
//! use eprofiler::{unique_scope, Scope};
//!
//! unique_scope!(Render);
//! unique_scope!(Physics);
//!
//! assert_ne!(Render::KEY, Physics::KEY);
//! ```
//!
//! # Hazard
//!
//! Site keys use `file!()`, `line!()` and `column!()` of the outermost macro
//! invocation. A macro of your own that expands to two `unique_scope!`
//! invocations produces two types with the *same* key, and their tags end up
//! in one table. Give such scopes names instead.

use serde::Serialize;
use std::fmt;

/// Source position of a scope declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Site {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Site {
    pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
        Site { file, line, column }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Identity of a table
///
/// Tables are equal exactly when their keys are equal; the ordering is used
/// by [`TableOrder::Key`](crate::TableOrder::Key) to lay tables out
/// independently of registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKey {
    Named(&'static str),
    Site(Site),
}

impl TableKey {
    /// The table name, for named tables
    pub const fn name(&self) -> Option<&'static str> {
        match self {
            TableKey::Named(name) => Some(*name),
            TableKey::Site(_) => None,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Named(name) => f.write_str(name),
            TableKey::Site(site) => write!(f, "<{}>", site),
        }
    }
}

/// Zero-size type naming one table
///
/// Implemented by [`unique_scope!`](crate::unique_scope) and
/// [`named_scope!`](crate::named_scope); implement it by hand only when you
/// need a key those macros cannot express.
pub trait Scope: 'static {
    const KEY: TableKey;
}

/// Declare an anonymous scope type keyed by its declaration site
///
/// ```
/// use eprofiler::{unique_scope, Scope, TableKey};
///
/// unique_scope!(
///     /// Tags recorded by the asset loader
///     pub Loader
/// );
///
/// match Loader::KEY {
///     TableKey::Site(site) => assert!(site.file.ends_with(".rs")),
///     TableKey::Named(_) => unreachable!(),
/// }
/// ```
#[macro_export]
macro_rules! unique_scope {
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Scope for $name {
            const KEY: $crate::TableKey =
                $crate::TableKey::Site($crate::Site::new(file!(), line!(), column!()));
        }
    };
}
