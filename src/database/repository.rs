use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::store::{Collection, DocumentStore, StoreError};
use crate::filter::FilterData;

/// A typed record persisted in one collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    /// Human-readable name used in not-found messages.
    const LABEL: &'static str;
}

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, StoreError> {
        self.store
            .find(T::COLLECTION, filter_data)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, StoreError> {
        match self.store.find_one(T::COLLECTION, filter_data).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn select_404(&self, filter_data: FilterData) -> Result<T, StoreError> {
        self.select_one(filter_data)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("{} not found", T::LABEL)))
    }

    /// Records whose `field` is any of `values`; used for batched joins.
    pub async fn select_in(&self, field: &str, values: Vec<Value>) -> Result<Vec<T>, StoreError> {
        if values.is_empty() {
            return Ok(vec![]);
        }
        let mut where_clause = serde_json::Map::new();
        where_clause.insert(field.to_string(), serde_json::json!({ "$in": values }));
        self.select_any(FilterData::where_clause(Value::Object(where_clause))).await
    }

    pub async fn exists(&self, filter_data: FilterData) -> Result<bool, StoreError> {
        Ok(self.store.find_one(T::COLLECTION, filter_data).await?.is_some())
    }

    /// Stamps `createdAt`/`updatedAt`, inserts, and returns the stored record.
    pub async fn insert(&self, record: &T) -> Result<T, StoreError> {
        let mut doc = serde_json::to_value(record)?;
        let now = serde_json::to_value(Utc::now())?;
        if let Value::Object(ref mut map) = doc {
            map.insert("createdAt".to_string(), now.clone());
            map.insert("updatedAt".to_string(), now);
        }
        self.store.insert(T::COLLECTION, doc.clone()).await?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Replaces the first match, refreshing `updatedAt`.
    pub async fn replace(&self, filter_data: FilterData, record: &T) -> Result<T, StoreError> {
        let mut doc = serde_json::to_value(record)?;
        if let Value::Object(ref mut map) = doc {
            map.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);
        }
        if self.store.replace_one(T::COLLECTION, filter_data, doc.clone()).await? {
            Ok(serde_json::from_value(doc)?)
        } else {
            Err(StoreError::NotFound(format!("{} not found", T::LABEL)))
        }
    }

    /// Returns false when nothing matched.
    pub async fn delete(&self, filter_data: FilterData) -> Result<bool, StoreError> {
        self.store.delete_one(T::COLLECTION, filter_data).await
    }

    pub async fn max_key(&self, field: &str) -> Result<Option<i64>, StoreError> {
        self.store.max_i64(T::COLLECTION, field).await
    }
}
