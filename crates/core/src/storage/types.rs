use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Update cadence of a collection, used to pick cache TTLs and throttle
/// cooldowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChurnClass {
    /// Frequently-changing records (employee activity, time tracking).
    High,
    /// Everything else.
    Standard,
}

/// The named record collections exposed by the entity store.
///
/// The wire name doubles as the cache key prefix for the collection, so
/// a mutation can invalidate every cached listing with a prefix scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Employee,
    TimeEntry,
    CollaborativeEvent,
    CollaborationInvitation,
    CollaborationComment,
    Notification,
}

impl Collection {
    /// Returns the collection's wire name.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Employee => "Employee",
            Collection::TimeEntry => "TimeEntry",
            Collection::CollaborativeEvent => "CollaborativeEvent",
            Collection::CollaborationInvitation => "CollaborationInvitation",
            Collection::CollaborationComment => "CollaborationComment",
            Collection::Notification => "Notification",
        }
    }

    /// Returns the churn class of this collection.
    ///
    /// Employee and time-tracking records are refreshed aggressively by
    /// dashboard widgets, so they get shorter TTLs and cooldowns.
    pub fn churn(self) -> ChurnClass {
        match self {
            Collection::Employee | Collection::TimeEntry => ChurnClass::High,
            _ => ChurnClass::Standard,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort specification over a single record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parses the `"-field"` convention used by the entity API: a
    /// leading minus means descending.
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(spec),
        }
    }
}

/// Parameters for a full-collection listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ListQuery {
    /// A listing with no sort or limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort specification.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Parameters for a filtered listing.
///
/// The match spec is a `BTreeMap` so its canonical serialization does
/// not depend on the order in which callers added fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub matches: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl FilterQuery {
    /// A filter matching a single field.
    pub fn matching(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut matches = BTreeMap::new();
        matches.insert(field.into(), value.into());
        Self {
            matches,
            sort: None,
            limit: None,
        }
    }

    /// Adds another equality condition.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.matches.insert(field.into(), value.into());
        self
    }

    /// Sets the sort specification.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
