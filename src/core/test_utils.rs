use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fake::{Fake, Faker};
use serde_json::Value;

use crate::core::assets::MemoryAssets;
use crate::core::identity::{Identity, IdentityService, MemoryIdentity};
use crate::core::mail::MemoryMail;
use crate::core::memory::MemoryStore;
use crate::core::store::{Document, DocumentStore, WriteBatch};
use crate::model::profile::Profile;
use crate::repository::account::sign_up_with_profile;
use crate::repository::portfolio::RetryPolicy;
use crate::AppState;

pub fn generate_random<T: fake::Dummy<fake::Faker>>() -> T {
    Faker.fake()
}

pub fn test_config() -> crate::settings::Config {
    crate::settings::Config {
        env: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        prefix: Some("/api".to_string()),
        fetch_retry_attempts: None,
        fetch_retry_delay_secs: None,
    }
}

/// All-memory application state plus the concrete collaborator handles, so
/// tests can look inside the fakes the routes only see as trait objects.
pub struct TestHarness {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentity>,
    pub assets: Arc<MemoryAssets>,
    pub mail: Arc<MemoryMail>,
}

pub fn test_harness() -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(MemoryIdentity::new());
    let assets = Arc::new(MemoryAssets::new());
    let mail = Arc::new(MemoryMail::new());
    let state = Arc::new(AppState {
        store: store.clone(),
        identity: identity.clone(),
        assets: assets.clone(),
        mail: mail.clone(),
        retry: RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        },
    });
    TestHarness {
        state,
        store,
        identity,
        assets,
        mail,
    }
}

pub struct TestUser {
    pub identity: Identity,
    pub profile: Profile,
    pub token: String,
}

pub async fn generate_test_user(
    state: &AppState,
    email: &str,
    password: &str,
    username: &str,
) -> anyhow::Result<TestUser> {
    let (identity, profile) = sign_up_with_profile(
        state.identity.as_ref(),
        state.store.as_ref(),
        email,
        password,
        username,
    )
    .await
    .map_err(anyhow::Error::new)?;
    let token = state
        .identity
        .sign_in(email, password)
        .await?
        .ok_or_else(|| anyhow::anyhow!("sign in failed for test user"))?;
    Ok(TestUser {
        identity,
        profile,
        token,
    })
}

/// A store wrapper that fails on command.
///
/// Counted failures let a test script "fail twice, then succeed"; the
/// per-collection switch fails every query against one collection while the
/// rest of the store keeps working.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    query_calls: AtomicU32,
    fail_queries: AtomicU32,
    fail_batches: AtomicU32,
    fail_collection: Mutex<Option<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn fail_next_queries(&self, count: u32) {
        self.fail_queries.store(count, Ordering::SeqCst);
    }

    pub fn fail_next_batches(&self, count: u32) {
        self.fail_batches.store(count, Ordering::SeqCst);
    }

    pub fn fail_queries_on(&self, collection: &str) {
        *self.fail_collection.lock().unwrap() = Some(collection.to_string());
    }

    pub fn query_calls(&self) -> u32 {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn take_counted_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok()
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get_by_key(&self, collection: &str, key: &str) -> anyhow::Result<Option<Document>> {
        self.inner.get_by_key(collection, key).await
    }

    async fn query_by_equality(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Vec<Document>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let targeted = self
            .fail_collection
            .lock()
            .unwrap()
            .as_deref()
            .is_some_and(|target| target == collection);
        if targeted {
            anyhow::bail!("injected query failure on {collection}");
        }
        if Self::take_counted_failure(&self.fail_queries) {
            anyhow::bail!("injected query failure");
        }
        self.inner.query_by_equality(collection, field, value).await
    }

    async fn put(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> anyhow::Result<()> {
        self.inner.put(collection, key, fields, merge).await
    }

    async fn add(&self, collection: &str, fields: Value) -> anyhow::Result<String> {
        self.inner.add(collection, fields).await
    }

    async fn delete(&self, collection: &str, key: &str) -> anyhow::Result<()> {
        self.inner.delete(collection, key).await
    }

    async fn commit_batch(&self, batch: WriteBatch) -> anyhow::Result<()> {
        if Self::take_counted_failure(&self.fail_batches) {
            anyhow::bail!("injected batch failure");
        }
        self.inner.commit_batch(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_test_user() -> anyhow::Result<()> {
        // Given
        let harness = test_harness();

        // When
        let test_user =
            generate_test_user(&harness.state, "ada@example.com", "password", "ada").await?;

        // Expect
        assert_eq!(test_user.profile.username, "ada");
        let resolved = harness
            .identity
            .current_user(Some(test_user.token.clone()))
            .await?;
        assert!(resolved.is_some());
        assert_eq!(resolved.unwrap().id, test_user.identity.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_flaky_store_counts_down() -> anyhow::Result<()> {
        // Given
        let store = FlakyStore::new();
        store.fail_next_queries(1);

        // Expect one failure, then normal service
        let failed = store
            .query_by_equality("projects", "owner_id", &serde_json::json!("u1"))
            .await;
        assert!(failed.is_err());
        let ok = store
            .query_by_equality("projects", "owner_id", &serde_json::json!("u1"))
            .await?;
        assert!(ok.is_empty());
        assert_eq!(store.query_calls(), 2);
        Ok(())
    }
}
