use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{Collection, DocumentStore, StoreError};
use crate::filter::filter_where::json_eq;
use crate::filter::{Filter, FilterData};

/// Process-local store used by the test suite and `STORE=memory`.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn filter(collection: Collection, data: FilterData) -> Result<Filter, StoreError> {
        let mut filter = Filter::new(collection.table_name())?;
        filter.assign(data)?;
        Ok(filter)
    }

    /// First unique field of `document` already taken by a document other than `skip`.
    fn conflicting_field(collection: Collection, documents: &[Value], document: &Value, skip: Option<usize>) -> Option<String> {
        for field in collection.unique_fields() {
            let candidate = match document.get(*field) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            let taken = documents
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != skip)
                .any(|(_, existing)| existing.get(*field).is_some_and(|v| json_eq(v, candidate)));
            if taken {
                return Some((*field).to_string());
            }
        }
        None
    }

    fn ensure_object(document: &Value) -> Result<(), StoreError> {
        if document.is_object() {
            Ok(())
        } else {
            Err(StoreError::InvalidDocument("document must be a JSON object".to_string()))
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: FilterData) -> Result<Vec<Value>, StoreError> {
        let filter = Self::filter(collection, filter)?;
        let collections = self.collections.read().await;
        let documents = collections.get(&collection).map(Vec::as_slice).unwrap_or_default();
        Ok(filter.apply(documents)?)
    }

    async fn find_one(&self, collection: Collection, filter: FilterData) -> Result<Option<Value>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn insert(&self, collection: Collection, document: Value) -> Result<(), StoreError> {
        Self::ensure_object(&document)?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        if let Some(field) = Self::conflicting_field(collection, documents, &document, None) {
            return Err(StoreError::DuplicateKey { collection: collection.table_name(), field });
        }
        documents.push(document);
        Ok(())
    }

    async fn replace_one(&self, collection: Collection, filter: FilterData, document: Value) -> Result<bool, StoreError> {
        Self::ensure_object(&document)?;
        let filter = Self::filter(collection, filter)?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        let mut position = None;
        for (index, existing) in documents.iter().enumerate() {
            if filter.matches(existing)? {
                position = Some(index);
                break;
            }
        }
        let Some(index) = position else {
            return Ok(false);
        };
        if let Some(field) = Self::conflicting_field(collection, documents, &document, Some(index)) {
            return Err(StoreError::DuplicateKey { collection: collection.table_name(), field });
        }
        documents[index] = document;
        Ok(true)
    }

    async fn delete_one(&self, collection: Collection, filter: FilterData) -> Result<bool, StoreError> {
        let filter = Self::filter(collection, filter)?;
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let mut position = None;
        for (index, existing) in documents.iter().enumerate() {
            if filter.matches(existing)? {
                position = Some(index);
                break;
            }
        }
        match position {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn max_i64(&self, collection: Collection, field: &str) -> Result<Option<i64>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter_map(|document| document.get(field).and_then(Value::as_i64))
            .max())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_enforces_every_unique_field() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Usuarios, json!({ "numeroIdentificacion": "1234567", "email": "a@b.co", "telefono": "3001234567" }))
            .await
            .unwrap();

        let err = store
            .insert(Collection::Usuarios, json!({ "numeroIdentificacion": "7654321", "email": "a@b.co", "telefono": "3000000000" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref field, .. } if field == "email"));
        assert_eq!(store.find(Collection::Usuarios, FilterData::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_may_keep_its_own_key_but_not_take_another() {
        let store = MemoryStore::new();
        store.insert(Collection::Asistentes, json!({ "numeroIdentificacion": "1111111" })).await.unwrap();
        store.insert(Collection::Asistentes, json!({ "numeroIdentificacion": "2222222" })).await.unwrap();

        let kept = store
            .replace_one(Collection::Asistentes, FilterData::eq("numeroIdentificacion", "1111111"), json!({ "numeroIdentificacion": "1111111", "x": 1 }))
            .await
            .unwrap();
        assert!(kept);

        let err = store
            .replace_one(Collection::Asistentes, FilterData::eq("numeroIdentificacion", "1111111"), json!({ "numeroIdentificacion": "2222222" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn delete_and_max() {
        let store = MemoryStore::new();
        assert_eq!(store.max_i64(Collection::Agendas, "id_agenda").await.unwrap(), None);
        for id in [3, 7, 5] {
            store.insert(Collection::Agendas, json!({ "id_agenda": id })).await.unwrap();
        }
        assert_eq!(store.max_i64(Collection::Agendas, "id_agenda").await.unwrap(), Some(7));
        assert!(store.delete_one(Collection::Agendas, FilterData::eq("id_agenda", 7)).await.unwrap());
        assert!(!store.delete_one(Collection::Agendas, FilterData::eq("id_agenda", 7)).await.unwrap());
        assert_eq!(store.max_i64(Collection::Agendas, "id_agenda").await.unwrap(), Some(5));
    }
}
