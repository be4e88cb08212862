use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, FilterQuery, ListQuery, Result};

/// The entity store contract.
///
/// The remote backend exposes CRUD plus list/filter over named record
/// collections of JSON documents. The store assigns `id` and
/// `created_date` on create; `update` merges a partial document into an
/// existing record.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Lists records in a collection.
    async fn list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Value>>;

    /// Lists records matching an equality filter.
    async fn filter(&self, collection: Collection, query: &FilterQuery) -> Result<Vec<Value>>;

    /// Creates a record. The store assigns identity and creation time
    /// and returns the full record.
    async fn create(&self, collection: Collection, fields: Value) -> Result<Value>;

    /// Merges a partial document into an existing record and returns
    /// the updated record.
    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Value>;

    /// Deletes a record by id.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}
