// Process-wide record of table layouts
//
// Markers are statics shared by every resolver in the process, so an ID
// only means something together with the layout it was assigned in. Each
// distinct (offset, keys) layout of a table gets an epoch; resolvers that
// produce the same layout get the same epoch, so their tables accept each
// other's markers.

use crate::marker::EPOCH_CAPACITY;
use crate::scope::TableKey;
use fnv::FnvHashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

type Registry = FnvHashMap<TableKey, Vec<(usize, Box<[&'static str]>)>>;

static LAYOUTS: OnceLock<Mutex<Registry>> = OnceLock::new();

/// Epoch of `keys` laid out at `offset` for table `key`
///
/// `None` once the table has had `EPOCH_CAPACITY` distinct layouts.
pub(crate) fn epoch_of(key: TableKey, offset: usize, keys: &[&'static str]) -> Option<u16> {
    let mut registry = LAYOUTS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let layouts = registry.entry(key).or_default();

    if let Some(epoch) = layouts
        .iter()
        .position(|(known_offset, known_keys)| *known_offset == offset && **known_keys == *keys)
    {
        return u16::try_from(epoch).ok();
    }

    let epoch = u16::try_from(layouts.len())
        .ok()
        .filter(|epoch| *epoch < EPOCH_CAPACITY)?;
    layouts.push((offset, keys.into()));
    Some(epoch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_layouts_share_an_epoch() {
        let key = TableKey::Named("epoch-tests/equal");
        let first = epoch_of(key, 0, &["a", "b"]).unwrap();
        assert_eq!(epoch_of(key, 0, &["a", "b"]), Some(first));
    }

    #[test]
    fn test_distinct_layouts_get_distinct_epochs() {
        let key = TableKey::Named("epoch-tests/distinct");
        let base = epoch_of(key, 0, &["a"]).unwrap();
        let moved = epoch_of(key, 4, &["a"]).unwrap();
        let renamed = epoch_of(key, 0, &["b"]).unwrap();

        assert_ne!(base, moved);
        assert_ne!(base, renamed);
        assert_ne!(moved, renamed);
    }

    #[test]
    fn test_epochs_are_per_table() {
        let left = epoch_of(TableKey::Named("epoch-tests/left"), 0, &["x"]);
        let right = epoch_of(TableKey::Named("epoch-tests/right"), 0, &["y"]);
        assert_eq!(left, Some(0));
        assert_eq!(right, Some(0));
    }
}
