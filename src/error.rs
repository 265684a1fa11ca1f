//! Error types for resolution and table access

use crate::scope::TableKey;
use crate::tag::Tag;
use thiserror::Error;

/// Errors raised while finalizing tag IDs or loading resolver configuration
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("tag `{tag}` in table `{table}` is already bound to id {existing}, cannot rebind to {requested}")]
    Rebound {
        table: TableKey,
        tag: Tag,
        existing: usize,
        requested: usize,
    },

    #[error("tag `{tag}` in table `{table}` is already bound to id {id} under a different layout of the table")]
    Relaid { table: TableKey, tag: Tag, id: usize },

    #[error("table `{table}` has been laid out in too many different ways")]
    LayoutsExhausted { table: TableKey },

    #[error("id space exhausted while laying out table `{table}` (limit {limit})")]
    IdOverflow { table: TableKey, limit: usize },

    #[error("invalid resolver configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse resolver configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by table construction and checked slot access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("no table `{0}` in the resolved layout")]
    UnknownTable(TableKey),

    #[error("tag `{tag}` of table `{table}` was never resolved")]
    Unresolved { table: TableKey, tag: Tag },

    #[error("tag `{tag}` is bound to id {id} in another layout of table `{table}`")]
    ForeignTag { table: TableKey, tag: Tag, id: usize },

    #[error("id {id} is outside the table range starting at {offset} with {len} slots")]
    IdOutOfRange { id: usize, offset: usize, len: usize },

    #[error("ids of table `{table}` run up to {end}, which does not fit the table's id type")]
    IdTypeOverflow { table: TableKey, end: usize },
}
