//! In-memory entity store implementation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use teamsync_core::storage::{
    Collection, EntityStore, FilterQuery, ListQuery, Result, SortDirection, SortSpec, StoreError,
};

/// In-memory entity store backend for testing.
///
/// Stores JSON documents per collection behind `Arc<RwLock<_>>`, mints
/// uuid identities and stamps `created_date` on create, the way the
/// remote store does. Data is not persisted and is lost on drop.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Value>>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn as_object(fields: Value) -> Result<Map<String, Value>> {
        match fields {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::InvalidData(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    fn apply(records: Vec<Value>, sort: Option<&SortSpec>, limit: Option<usize>) -> Vec<Value> {
        let mut records = records;
        if let Some(sort) = sort {
            records.sort_by(|a, b| {
                let ordering = compare_fields(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        records
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        let records = collections.get(&collection).cloned().unwrap_or_default();
        Ok(Self::apply(records, query.sort.as_ref(), query.limit))
    }

    async fn filter(&self, collection: Collection, query: &FilterQuery) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        let records: Vec<Value> = collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| {
                        query
                            .matches
                            .iter()
                            .all(|(field, expected)| record.get(field) == Some(expected))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self::apply(records, query.sort.as_ref(), query.limit))
    }

    async fn create(&self, collection: Collection, fields: Value) -> Result<Value> {
        let mut record = Self::as_object(fields)?;
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        record.insert(
            "created_date".to_string(),
            serde_json::to_value(Utc::now())
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
        );
        let record = Value::Object(record);

        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Value> {
        let patch = Self::as_object(patch)?;

        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(&collection)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            })?;

        let record = records
            .iter_mut()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            })?;

        if let Value::Object(fields) = record {
            for (key, value) in patch {
                fields.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(&collection)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            })?;

        let before = records.len();
        records.retain(|record| record.get("id").and_then(Value::as_str) != Some(id));
        if records.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// Orders two optional field values; records missing the field sort
/// last.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
