//! Cache key construction for entity store queries.
//!
//! A query is identified by an explicit request descriptor rather than
//! ad hoc parameter objects: the collection, the operation, and a
//! canonical parameter record. The rendered key is deterministic and
//! independent of the order in which filter fields were added, so two
//! widgets issuing the same logical query always share a cache slot.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::storage::{Collection, FilterQuery, ListQuery, SortSpec};

/// The read operations that flow through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    List,
    Filter,
}

impl QueryOp {
    /// Returns the operation's key segment.
    pub fn name(self) -> &'static str {
        match self {
            QueryOp::List => "list",
            QueryOp::Filter => "filter",
        }
    }
}

/// A fully-described cacheable request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub collection: Collection,
    pub op: QueryOp,
    pub matches: BTreeMap<String, Value>,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl RequestDescriptor {
    /// Describes a full-collection listing.
    pub fn list(collection: Collection, query: &ListQuery) -> Self {
        Self {
            collection,
            op: QueryOp::List,
            matches: BTreeMap::new(),
            sort: query.sort.clone(),
            limit: query.limit,
        }
    }

    /// Describes a filtered listing.
    pub fn filter(collection: Collection, query: &FilterQuery) -> Self {
        Self {
            collection,
            op: QueryOp::Filter,
            matches: query.matches.clone(),
            sort: query.sort.clone(),
            limit: query.limit,
        }
    }

    /// Renders the cache key: `{collection}_{op}_{canonical params}`.
    ///
    /// The parameter record serializes the match spec from a `BTreeMap`,
    /// so keys never depend on insertion order.
    pub fn cache_key(&self) -> String {
        let params = serde_json::json!({
            "match": self.matches,
            "sort": self.sort,
            "limit": self.limit,
        });
        format!(
            "{}_{}_{}",
            self.collection.name(),
            self.op.name(),
            params
        )
    }
}

/// Returns the key prefix shared by every cached query against a
/// collection. Mutations invalidate by this prefix.
pub fn collection_prefix(collection: Collection) -> String {
    format!("{}_", collection.name())
}
