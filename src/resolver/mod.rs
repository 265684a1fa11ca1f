// Tag ID resolution
//
// The resolver is the finalization step of the two-phase scheme: every tag
// marker in the program is registered once during start-up, then finalize()
// deduplicates them per table, lays the tables out in one dense global ID
// space and writes each ID into its markers. After that no table access ever
// hashes or compares a tag string.
//
// Invariants of a finalized Layout:
// - identical strings within a table share one ID, distinct strings do not
// - each table owns the contiguous range [offset, offset + N)
// - ranges of different tables never overlap
// - a marker is bound under exactly one layout of its table per process

mod config;
mod epochs;
mod layout;

pub use config::{ResolverConfig, TableOrder};
pub use layout::{Layout, TableLayout};

use crate::error::ResolveError;
use crate::marker::{self, Binding, Marker, Stamp, TagGroup};
use crate::scope::{Scope, TableKey};
use crate::tag::Tag;
use fnv::FnvBuildHasher;
use indexmap::IndexMap;

type FnvIndexMap<K, V> = IndexMap<K, V, FnvBuildHasher>;

/// Occurrences of one table, deduplicated by tag content in first-seen order
#[derive(Default)]
struct PendingTable {
    tags: FnvIndexMap<Tag, Vec<&'static Binding>>,
}

/// Collects tag markers and assigns their IDs
///
/// # Example
/// ```
/// use eprofiler::{declare_tags, unique_scope, Resolver};
///
/// unique_scope!(Startup);
///
/// declare_tags! {
///     static STARTUP_TAGS: [Startup] = {
///         CONFIG_LOADED = "config_loaded",
///         READY = "ready",
///     };
/// }
///
/// let mut resolver = Resolver::new();
/// resolver.declare(STARTUP_TAGS);
/// let layout = resolver.finalize().unwrap();
///
/// assert_eq!(CONFIG_LOADED.id(), Some(0));
/// assert_eq!(READY.id(), Some(1));
/// assert_eq!(layout.total_ids(), 2);
/// ```
pub struct Resolver {
    config: ResolverConfig,
    tables: FnvIndexMap<TableKey, PendingTable>,
    occurrences: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Resolver {
            config,
            tables: FnvIndexMap::default(),
            occurrences: 0,
        }
    }

    /// A resolver holding every [`declare_tags!`](crate::declare_tags) group
    /// linked into the program
    pub fn linked() -> Self {
        Self::linked_with_config(ResolverConfig::default())
    }

    pub fn linked_with_config(config: ResolverConfig) -> Self {
        let mut resolver = Self::with_config(config);
        resolver.declare_linked();
        resolver
    }

    /// Register every [`declare_tags!`](crate::declare_tags) group linked
    /// into the program
    ///
    /// Registration order between groups is unspecified; use
    /// [`TableOrder::Key`] when offsets must be reproducible.
    pub fn declare_linked(&mut self) -> &mut Self {
        let mut groups = 0usize;
        for group in inventory::iter::<TagGroup> {
            group.register(self);
            groups += 1;
        }
        tracing::debug!(groups, "collected linked tag groups");
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Register table `S` without any tags
    ///
    /// Tables are registered implicitly by their first tag; this makes a
    /// table known (and constructible) even when it has none.
    pub fn table<S: Scope>(&mut self) -> &mut Self {
        self.tables.entry(S::KEY).or_default();
        self
    }

    /// Register one marker
    pub fn occurrence<S: Scope>(&mut self, marker: &'static Marker<S>) -> &mut Self {
        self.tables
            .entry(S::KEY)
            .or_default()
            .tags
            .entry(marker.tag())
            .or_default()
            .push(marker.binding());
        self.occurrences += 1;
        self
    }

    /// Register a group of markers, as emitted by
    /// [`declare_tags!`](crate::declare_tags)
    pub fn declare<S: Scope>(&mut self, markers: &[&'static Marker<S>]) -> &mut Self {
        for &marker in markers {
            self.occurrence(marker);
        }
        self
    }

    /// Number of markers registered so far
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Number of distinct tables registered so far
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Assign IDs, bind every registered marker and freeze the layout
    ///
    /// All IDs are computed and checked before the first marker is written,
    /// so on error no marker has been touched by this call.
    pub fn finalize(self) -> Result<Layout, ResolveError> {
        let Resolver {
            config,
            tables,
            occurrences,
        } = self;
        config.validate()?;

        let mut ordered: Vec<(TableKey, PendingTable)> = tables.into_iter().collect();
        if config.table_order == TableOrder::Key {
            ordered.sort_by(|a, b| a.0.cmp(&b.0));
        }

        // Markers can only hold IDs below id_capacity()
        let limit = config.id_limit.min(marker::id_capacity());

        // Plan: (table, offset, epoch, keys, tags with their bindings)
        let mut next = config.base_offset;
        let mut plan = Vec::with_capacity(ordered.len());
        for (key, pending) in ordered {
            let offset = next;
            next = offset
                .checked_add(pending.tags.len())
                .filter(|end| *end <= limit)
                .ok_or(ResolveError::IdOverflow { table: key, limit })?;

            let keys: Vec<&'static str> = pending.tags.keys().map(|tag| tag.as_str()).collect();
            let epoch = epochs::epoch_of(key, offset, &keys)
                .ok_or(ResolveError::LayoutsExhausted { table: key })?;
            plan.push((key, offset, epoch, keys, pending));
        }

        // A moved ID is reported before a same-ID layout change
        let mut relaid = None;
        for (key, offset, epoch, _, pending) in &plan {
            for (local, (tag, bindings)) in pending.tags.iter().enumerate() {
                let requested = Stamp {
                    epoch: *epoch,
                    id: offset + local,
                };
                for existing in bindings.iter().filter_map(|binding| binding.stamp()) {
                    if existing.id != requested.id {
                        tracing::warn!(
                            table = %key,
                            tag = %tag,
                            existing = existing.id,
                            requested = requested.id,
                            "refusing to rebind tag marker"
                        );
                        return Err(ResolveError::Rebound {
                            table: *key,
                            tag: *tag,
                            existing: existing.id,
                            requested: requested.id,
                        });
                    }
                    if existing.epoch != requested.epoch && relaid.is_none() {
                        relaid = Some(ResolveError::Relaid {
                            table: *key,
                            tag: *tag,
                            id: existing.id,
                        });
                    }
                }
            }
        }
        if let Some(err) = relaid {
            tracing::warn!(error = %err, "refusing to move tag marker to another layout");
            return Err(err);
        }

        let mut tables = Vec::with_capacity(plan.len());
        for (key, offset, epoch, keys, pending) in plan {
            for (local, (tag, bindings)) in pending.tags.into_iter().enumerate() {
                let requested = Stamp {
                    epoch,
                    id: offset + local,
                };
                for binding in bindings {
                    binding.bind(requested).map_err(|existing| {
                        if existing.id == requested.id {
                            ResolveError::Relaid {
                                table: key,
                                tag,
                                id: existing.id,
                            }
                        } else {
                            ResolveError::Rebound {
                                table: key,
                                tag,
                                existing: existing.id,
                                requested: requested.id,
                            }
                        }
                    })?;
                }
            }

            tracing::debug!(table = %key, offset, epoch, len = keys.len(), "resolved table");
            tables.push(TableLayout::new(key, offset, keys, epoch));
        }

        let layout = Layout::new(tables);
        tracing::info!(
            tables = layout.tables().len(),
            ids = layout.total_ids(),
            occurrences,
            "tag ids finalized"
        );
        Ok(layout)
    }
}
