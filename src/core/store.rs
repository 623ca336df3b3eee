use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One stored record: its key within a collection plus its field map.
#[derive(Clone, Debug)]
pub struct Document {
    pub key: String,
    pub fields: Value,
}

impl Document {
    /// Deserialize the field map into a model type, with the document key
    /// injected as the `id` field. The key is the single source of truth
    /// for record identity; an `id` stored inside the fields is ignored.
    pub fn decode<T: DeserializeOwned>(self) -> anyhow::Result<T> {
        let Value::Object(mut map) = self.fields else {
            anyhow::bail!("document {} is not an object", self.key);
        };
        map.insert("id".to_string(), Value::String(self.key));
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

#[derive(Clone, Debug)]
pub enum WriteOp {
    Put {
        collection: String,
        key: String,
        fields: Value,
        merge: bool,
    },
    Delete {
        collection: String,
        key: String,
    },
}

/// A set of writes committed in full or not at all.
///
/// Operations are collected first and handed to the store in one
/// `commit_batch` call; callers never apply them one by one.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, collection: &str, key: &str, fields: Value, merge: bool) {
        self.ops.push(WriteOp::Put {
            collection: collection.to_string(),
            key: key.to_string(),
            fields,
            merge,
        });
    }

    pub fn delete(&mut self, collection: &str, key: &str) {
        self.ops.push(WriteOp::Delete {
            collection: collection.to_string(),
            key: key.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Contract of the external document store.
///
/// Keys are uuid strings. `put` with `merge` updates only the supplied
/// top-level fields; `add` mints the key. `commit_batch` is the only way
/// to apply more than one write atomically.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_by_key(&self, collection: &str, key: &str) -> anyhow::Result<Option<Document>>;

    async fn query_by_equality(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Vec<Document>>;

    async fn put(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> anyhow::Result<()>;

    async fn add(&self, collection: &str, fields: Value) -> anyhow::Result<String>;

    async fn delete(&self, collection: &str, key: &str) -> anyhow::Result<()>;

    async fn commit_batch(&self, batch: WriteBatch) -> anyhow::Result<()>;
}
