// Frozen result of tag ID resolution
//
// A Layout is immutable once built: tables copy what they need out of it
// and never consult it on the hot path.

use crate::scope::{Scope, TableKey};
use fnv::FnvHashMap;
use serde::Serialize;
use std::ops::Range;

/// Resolved ID range and keys of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLayout {
    key: TableKey,
    offset: usize,
    keys: Box<[&'static str]>,
    #[serde(skip)]
    epoch: u16,
}

impl TableLayout {
    pub(crate) fn new(key: TableKey, offset: usize, keys: Vec<&'static str>, epoch: u16) -> Self {
        TableLayout {
            key,
            offset,
            keys: keys.into_boxed_slice(),
            epoch,
        }
    }

    /// Process-wide identity of this (offset, keys) layout of the table
    pub(crate) fn epoch(&self) -> u16 {
        self.epoch
    }

    pub fn key(&self) -> TableKey {
        self.key
    }

    /// First global ID owned by the table
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Tag strings in ID order
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Global IDs owned by the table, `offset..offset + len`
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.keys.len()
    }

    /// Global ID of a tag string (linear scan, for diagnostics)
    pub fn id_of(&self, tag: &str) -> Option<usize> {
        self.keys
            .iter()
            .position(|key| *key == tag)
            .map(|local| self.offset + local)
    }
}

/// Resolved layout of every registered table
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    tables: Vec<TableLayout>,
    #[serde(skip)]
    by_key: FnvHashMap<TableKey, usize>,
}

impl Layout {
    pub(crate) fn new(tables: Vec<TableLayout>) -> Self {
        let by_key = tables
            .iter()
            .enumerate()
            .map(|(position, table)| (table.key, position))
            .collect();
        Layout { tables, by_key }
    }

    /// Tables in ID order
    pub fn tables(&self) -> &[TableLayout] {
        &self.tables
    }

    pub fn table(&self, key: &TableKey) -> Option<&TableLayout> {
        self.by_key.get(key).map(|&position| &self.tables[position])
    }

    pub fn table_for<S: Scope>(&self) -> Option<&TableLayout> {
        self.table(&S::KEY)
    }

    /// Number of IDs assigned across all tables
    pub fn total_ids(&self) -> usize {
        self.tables.iter().map(TableLayout::len).sum()
    }

    /// Manifest of the resolved tables as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
