use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;

use super::store::{Document, DocumentStore, WriteBatch, WriteOp};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory document store.
///
/// Collections map keys to JSON field maps. Keys are v7 uuids, so iteration
/// order of a collection is creation order. `commit_batch` holds the write
/// guard for the whole batch, which is what makes a batch atomic here.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_put(collections: &mut Collections, collection: &str, key: &str, fields: Value, merge: bool) {
    let entry = collections.entry(collection.to_string()).or_default();
    if merge {
        if let Some(Value::Object(existing)) = entry.get_mut(key) {
            if let Value::Object(incoming) = fields {
                existing.extend(incoming);
                return;
            }
        }
    }
    entry.insert(key.to_string(), fields);
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_by_key(&self, collection: &str, key: &str) -> anyhow::Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .map(|fields| Document {
                key: key.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn query_by_equality(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(vec![]);
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| fields.get(field) == Some(value))
            .map(|(key, fields)| Document {
                key: key.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn put(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> anyhow::Result<()> {
        let mut collections = self.collections.write().await;
        apply_put(&mut collections, collection, key, fields, merge);
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Value) -> anyhow::Result<String> {
        let key = Uuid::now_v7().to_string();
        let mut collections = self.collections.write().await;
        apply_put(&mut collections, collection, &key, fields, false);
        Ok(key)
    }

    async fn delete(&self, collection: &str, key: &str) -> anyhow::Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn commit_batch(&self, batch: WriteBatch) -> anyhow::Result<()> {
        let mut collections = self.collections.write().await;
        for op in batch.into_ops() {
            match op {
                WriteOp::Put {
                    collection,
                    key,
                    fields,
                    merge,
                } => apply_put(&mut collections, &collection, &key, fields, merge),
                WriteOp::Delete { collection, key } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_put_get_merge() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        store
            .put("users", "a", json!({"username": "ada", "title": "engineer"}), false)
            .await?;

        // When merging a single field
        store.put("users", "a", json!({"title": "founder"}), true).await?;

        // Expect the untouched field to survive
        let doc = store.get_by_key("users", "a").await?.unwrap();
        assert_eq!(doc.fields.get("username"), Some(&json!("ada")));
        assert_eq!(doc.fields.get("title"), Some(&json!("founder")));

        // When replacing without merge
        store.put("users", "a", json!({"title": "advisor"}), false).await?;

        // Expect only the new fields
        let doc = store.get_by_key("users", "a").await?.unwrap();
        assert!(doc.fields.get("username").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_query_by_equality() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        store.put("projects", "p1", json!({"owner_id": "u1"}), false).await?;
        store.put("projects", "p2", json!({"owner_id": "u2"}), false).await?;
        store.put("projects", "p3", json!({"owner_id": "u1"}), false).await?;

        // When
        let docs = store.query_by_equality("projects", "owner_id", &json!("u1")).await?;

        // Expect
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|doc| doc.fields.get("owner_id") == Some(&json!("u1"))));

        let none = store.query_by_equality("missing", "owner_id", &json!("u1")).await?;
        assert!(none.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_mints_keys_in_creation_order() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let first = store.add("categories", json!({"owner_id": "u1", "name": "a"})).await?;
        let second = store.add("categories", json!({"owner_id": "u1", "name": "b"})).await?;

        // Expect v7 keys to sort in insertion order
        let docs = store.query_by_equality("categories", "owner_id", &json!("u1")).await?;
        assert_eq!(docs[0].key, first);
        assert_eq!(docs[1].key, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_commit_batch_applies_all_ops() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        store.put("categories", "c1", json!({"name": "old"}), false).await?;
        store.put("projects", "p1", json!({"category_id": "c1"}), false).await?;

        // When
        let mut batch = WriteBatch::new();
        batch.delete("projects", "p1");
        batch.delete("categories", "c1");
        batch.put("users", "u1", json!({"username": "ada"}), false);
        store.commit_batch(batch).await?;

        // Expect
        assert!(store.get_by_key("projects", "p1").await?.is_none());
        assert!(store.get_by_key("categories", "c1").await?.is_none());
        assert!(store.get_by_key("users", "u1").await?.is_some());
        Ok(())
    }
}
