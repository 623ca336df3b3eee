use chrono::Local;
use serde_json::json;

use crate::core::error::PortfolioError;
use crate::core::identity::{Identity, IdentityService};
use crate::core::store::{DocumentStore, WriteBatch};
use crate::model::profile::{self, Profile};
use crate::model::username_lookup::{self, UsernameLookup};

/// Creates an account with its profile and username lookup record.
///
/// The identity is created first; the lookup record and the profile are then
/// committed in one batch. If anything after identity creation fails, the
/// identity is deleted again so no account without a profile can survive.
/// The rollback itself is best effort: its failure is logged and the
/// original error is the one reported.
pub async fn sign_up_with_profile(
    identity: &dyn IdentityService,
    store: &dyn DocumentStore,
    email: &str,
    password: &str,
    username: &str,
) -> Result<(Identity, Profile), PortfolioError> {
    let account = identity
        .sign_up(email, password)
        .await
        .map_err(|err| PortfolioError::Validation {
            field: "email",
            message: err.to_string(),
        })?;
    tracing::info!(id = %account.id, "identity created");

    let taken = match store
        .query_by_equality(username_lookup::COLLECTION, "username", &json!(username))
        .await
    {
        Ok(matches) => !matches.is_empty(),
        Err(err) => {
            roll_back_identity(identity, &account).await;
            return Err(PortfolioError::Other(err));
        }
    };
    if taken {
        roll_back_identity(identity, &account).await;
        return Err(PortfolioError::Validation {
            field: "username",
            message: "Username already taken".to_string(),
        });
    }

    let new_profile = Profile::new(
        account.id,
        account.email.clone(),
        username.to_string(),
        Local::now().fixed_offset(),
    );
    let lookup = UsernameLookup {
        owner_id: account.id,
        username: username.to_string(),
    };
    let mut batch = WriteBatch::new();
    batch.put(
        username_lookup::COLLECTION,
        &account.id.to_string(),
        lookup.to_fields(),
        false,
    );
    batch.put(
        profile::COLLECTION,
        &account.id.to_string(),
        new_profile.to_fields(),
        false,
    );
    if let Err(err) = store.commit_batch(batch).await {
        roll_back_identity(identity, &account).await;
        return Err(PortfolioError::Other(err));
    }

    tracing::info!(id = %account.id, username, "profile created");
    Ok((account, new_profile))
}

async fn roll_back_identity(identity: &dyn IdentityService, account: &Identity) {
    if let Err(err) = identity.delete_identity(&account.id).await {
        tracing::error!(
            id = %account.id,
            error = %err,
            "failed to roll back identity after aborted signup"
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::core::identity::MemoryIdentity;
    use crate::core::memory::MemoryStore;
    use crate::core::test_utils::FlakyStore;
    use crate::repository::profile::get_profile;

    use super::*;

    #[tokio::test]
    async fn test_signup_creates_profile_and_lookup() -> anyhow::Result<()> {
        // Given
        let identity = MemoryIdentity::new();
        let store = MemoryStore::new();

        // When
        let (account, created) =
            sign_up_with_profile(&identity, &store, "ada@example.com", "pw", "ada")
                .await
                .unwrap();

        // Expect
        assert_eq!(created.id, account.id);
        assert_eq!(created.email, "ada@example.com");
        let stored = get_profile(&store, &account.id).await?.unwrap();
        assert_eq!(stored.username, "ada");
        let matches = store
            .query_by_equality(username_lookup::COLLECTION, "username", &json!("ada"))
            .await?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key, account.id.to_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_rolls_back_identity() -> anyhow::Result<()> {
        // Given
        let identity = MemoryIdentity::new();
        let store = MemoryStore::new();
        sign_up_with_profile(&identity, &store, "ada@example.com", "pw", "ada")
            .await
            .unwrap();

        // When
        let err = sign_up_with_profile(&identity, &store, "grace@example.com", "pw", "ada")
            .await
            .unwrap_err();

        // Expect
        match err {
            PortfolioError::Validation { field, message } => {
                assert_eq!(field, "username");
                assert_eq!(message, "Username already taken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(identity.account_count().await, 1);
        assert!(identity.sign_in("grace@example.com", "pw").await?.is_none());
        let matches = store
            .query_by_equality(username_lookup::COLLECTION, "username", &json!("ada"))
            .await?;
        assert_eq!(matches.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_profile_write_rolls_back_identity() -> anyhow::Result<()> {
        // Given
        let identity = MemoryIdentity::new();
        let store = FlakyStore::new();
        store.fail_next_batches(1);

        // When
        let err = sign_up_with_profile(&identity, &store, "ada@example.com", "pw", "ada")
            .await
            .unwrap_err();

        // Expect no trace of the account anywhere
        assert!(matches!(err, PortfolioError::Other(_)));
        assert_eq!(identity.account_count().await, 0);
        let matches = store
            .query_by_equality(username_lookup::COLLECTION, "username", &json!("ada"))
            .await?;
        assert!(matches.is_empty());
        Ok(())
    }
}
