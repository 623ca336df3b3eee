use serde_json::json;
use uuid::Uuid;

use crate::core::error::PortfolioError;
use crate::core::store::{DocumentStore, WriteBatch};
use crate::model::profile::{self, PictureTransform, Profile};
use crate::model::username_lookup::{self, UsernameLookup};

pub async fn get_profile(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
) -> anyhow::Result<Option<Profile>> {
    match store
        .get_by_key(profile::COLLECTION, &owner_id.to_string())
        .await?
    {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Fields an owner may change on their profile. Absent fields are left as
/// they are.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub picture_url: Option<String>,
    pub picture: Option<PictureTransform>,
}

/// Applies an update to the owner's profile.
///
/// Picture transform values are validated before anything is written. A
/// username change re-checks uniqueness and rewrites the lookup record in
/// the same batch as the profile, so the two can never disagree.
pub async fn put_profile(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
    update: ProfileUpdate,
) -> Result<Profile, PortfolioError> {
    let Some(mut profile) = get_profile(store, owner_id).await? else {
        return Err(PortfolioError::NotFound("profile"));
    };

    if let Some(picture) = update.picture {
        picture.validate()?;
        profile.set_picture(picture);
    }
    if let Some(title) = update.title {
        profile.title = title;
    }
    if let Some(bio) = update.bio {
        profile.bio = bio;
    }
    if let Some(picture_url) = update.picture_url {
        profile.picture_url = picture_url;
    }

    match update.username {
        Some(username) if username != profile.username => {
            let taken = store
                .query_by_equality(username_lookup::COLLECTION, "username", &json!(username))
                .await?
                .into_iter()
                .any(|doc| doc.key != owner_id.to_string());
            if taken {
                return Err(PortfolioError::Validation {
                    field: "username",
                    message: "Username already taken".to_string(),
                });
            }
            profile.username = username;
            let lookup = UsernameLookup {
                owner_id: *owner_id,
                username: profile.username.clone(),
            };
            let mut batch = WriteBatch::new();
            batch.put(
                username_lookup::COLLECTION,
                &owner_id.to_string(),
                lookup.to_fields(),
                false,
            );
            batch.put(
                profile::COLLECTION,
                &owner_id.to_string(),
                profile.to_fields(),
                true,
            );
            store.commit_batch(batch).await?;
        }
        _ => {
            store
                .put(
                    profile::COLLECTION,
                    &owner_id.to_string(),
                    profile.to_fields(),
                    true,
                )
                .await?;
        }
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use crate::core::memory::MemoryStore;
    use crate::core::store::DocumentStore;

    use super::*;

    async fn seed_profile(store: &MemoryStore, username: &str) -> anyhow::Result<Profile> {
        let profile = Profile::new(
            Uuid::now_v7(),
            format!("{username}@example.com"),
            username.to_string(),
            Local::now().fixed_offset(),
        );
        let lookup = UsernameLookup {
            owner_id: profile.id,
            username: username.to_string(),
        };
        store
            .put(
                profile::COLLECTION,
                &profile.id.to_string(),
                profile.to_fields(),
                false,
            )
            .await?;
        store
            .put(
                username_lookup::COLLECTION,
                &profile.id.to_string(),
                lookup.to_fields(),
                false,
            )
            .await?;
        Ok(profile)
    }

    #[tokio::test]
    async fn test_put_profile_merges_fields() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let seeded = seed_profile(&store, "ada").await?;

        // When
        let updated = put_profile(
            &store,
            &seeded.id,
            ProfileUpdate {
                title: Some("Systems engineer".to_string()),
                bio: Some("**Hi**".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

        // Expect
        assert_eq!(updated.title, "Systems engineer");
        assert_eq!(updated.bio, "**Hi**");
        let stored = get_profile(&store, &seeded.id).await?.unwrap();
        assert_eq!(stored.username, "ada");
        assert_eq!(stored.title, "Systems engineer");
        Ok(())
    }

    #[tokio::test]
    async fn test_username_change_rewrites_lookup() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let seeded = seed_profile(&store, "ada").await?;

        // When
        put_profile(
            &store,
            &seeded.id,
            ProfileUpdate {
                username: Some("lovelace".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

        // Expect
        let matches = store
            .query_by_equality(username_lookup::COLLECTION, "username", &json!("lovelace"))
            .await?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key, seeded.id.to_string());
        let old = store
            .query_by_equality(username_lookup::COLLECTION, "username", &json!("ada"))
            .await?;
        assert!(old.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_username_change_refuses_taken_name() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        seed_profile(&store, "ada").await?;
        let second = seed_profile(&store, "grace").await?;

        // When
        let err = put_profile(
            &store,
            &second.id,
            ProfileUpdate {
                username: Some("ada".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();

        // Expect
        assert!(matches!(
            err,
            PortfolioError::Validation { field: "username", .. }
        ));
        let unchanged = get_profile(&store, &second.id).await?.unwrap();
        assert_eq!(unchanged.username, "grace");
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_picture_blocks_the_write() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let seeded = seed_profile(&store, "ada").await?;

        // When
        let err = put_profile(
            &store,
            &seeded.id,
            ProfileUpdate {
                picture: Some(PictureTransform {
                    scale: 3.0,
                    offset_x: 0,
                    offset_y: 0,
                }),
                title: Some("never stored".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();

        // Expect
        assert!(matches!(
            err,
            PortfolioError::Validation { field: "picture_scale", .. }
        ));
        let stored = get_profile(&store, &seeded.id).await?.unwrap();
        assert_eq!(stored.picture_scale, 1.0);
        assert_eq!(stored.title, "");
        Ok(())
    }
}
