//! Tag string constants
//!
//! A [`Tag`] is the textual half of a tag identity: a `&'static str` known
//! when the program is compiled. The table half is supplied by wrapping the
//! tag in a [`Marker`](crate::Marker) for a particular scope.
//!
//! Tags are plain `Copy` values built with a `const fn`, so they can be used
//! in `static` and `const` items without any allocation:
//!
//! ```
//! use eprofiler::Tag;
//!
//! const FRAME_START: Tag = Tag::new("frame_start");
//! const _: () = assert!(FRAME_START.const_eq(Tag::new("frame_start")));
//!
//! assert_eq!(FRAME_START.as_str(), "frame_start");
//! assert_eq!(FRAME_START, Tag::new("frame_start"));
//! assert_ne!(FRAME_START, Tag::new("frame_end"));
//! ```

use serde::Serialize;
use std::fmt;

/// Compile-time tag string
///
/// Equality, ordering and hashing all follow the string content, so two tags
/// written at unrelated places in the source compare equal whenever their
/// text does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Tag(&'static str);

impl Tag {
    /// Create a tag from a string literal
    pub const fn new(value: &'static str) -> Self {
        Tag(value)
    }

    /// View the tag as a string slice
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Length of the tag in bytes
    pub const fn len(self) -> usize {
        self.0.len()
    }

    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Content comparison usable in constant contexts
    ///
    /// `PartialEq` is not callable from a `const` item, this is.
    pub const fn const_eq(self, other: Tag) -> bool {
        let a = self.0.as_bytes();
        let b = other.0.as_bytes();
        if a.len() != b.len() {
            return false;
        }

        let mut i = 0;
        while i < a.len() {
            if a[i] != b[i] {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl From<Tag> for &'static str {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
