use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A resolved account from the identity provider.
#[derive(Clone, Debug)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

/// Contract of the external identity provider.
///
/// Credential storage, token minting and session lifetime all live behind
/// this trait; the rest of the crate only ever consumes `Identity.id` as the
/// owner id of portfolio records. `current_user` is a one-shot
/// request/response lookup, not a subscription.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<Identity>;

    /// Resolves to a bearer token, or `None` on bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Option<String>>;

    async fn current_user(&self, token: Option<String>) -> anyhow::Result<Option<Identity>>;

    async fn sign_out(&self, token: &str) -> anyhow::Result<()>;

    async fn reset_password(&self, email: &str) -> anyhow::Result<()>;

    /// Removes an account again. Used to roll back a signup whose profile
    /// writes did not go through.
    async fn delete_identity(&self, id: &Uuid) -> anyhow::Result<()>;
}

#[derive(Clone, Debug)]
struct MemoryAccount {
    id: Uuid,
    password: String,
}

/// In-memory identity provider.
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    accounts: RwLock<HashMap<String, MemoryAccount>>,
    sessions: RwLock<HashMap<String, Uuid>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl IdentityService for MemoryIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<Identity> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            anyhow::bail!("Email already registered");
        }
        let account = MemoryAccount {
            id: Uuid::now_v7(),
            password: password.to_string(),
        };
        accounts.insert(email.to_string(), account.clone());
        Ok(Identity {
            id: account.id,
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Option<String>> {
        let accounts = self.accounts.read().await;
        let Some(account) = accounts.get(email) else {
            return Ok(None);
        };
        if account.password != password {
            return Ok(None);
        }
        let token = Uuid::now_v7().to_string();
        self.sessions.write().await.insert(token.clone(), account.id);
        Ok(Some(token))
    }

    async fn current_user(&self, token: Option<String>) -> anyhow::Result<Option<Identity>> {
        let Some(token) = token else {
            return Ok(None);
        };
        let sessions = self.sessions.read().await;
        let Some(id) = sessions.get(&token).copied() else {
            return Ok(None);
        };
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|(_, account)| account.id == id)
            .map(|(email, account)| Identity {
                id: account.id,
                email: email.clone(),
            }))
    }

    async fn sign_out(&self, token: &str) -> anyhow::Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> anyhow::Result<()> {
        let known = self.accounts.read().await.contains_key(email);
        tracing::info!(email, known, "password reset requested");
        Ok(())
    }

    async fn delete_identity(&self, id: &Uuid) -> anyhow::Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.retain(|_, account| account.id != *id);
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session_id| session_id != id);
        Ok(())
    }
}
