use serde_json::json;
use uuid::Uuid;

use crate::core::store::{DocumentStore, WriteBatch};
use crate::model::{category, category::Category, project};

pub async fn create_category(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
    name: &str,
) -> anyhow::Result<Category> {
    let fields = json!({
        "name": name,
        "owner_id": owner_id,
    });
    let key = store.add(category::COLLECTION, fields).await?;
    Ok(Category {
        id: Uuid::parse_str(&key)?,
        name: name.to_string(),
        owner_id: *owner_id,
    })
}

pub async fn get_category_by_id(
    store: &dyn DocumentStore,
    id: &Uuid,
) -> anyhow::Result<Option<Category>> {
    match store
        .get_by_key(category::COLLECTION, &id.to_string())
        .await?
    {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

pub async fn update_category(
    store: &dyn DocumentStore,
    id: &Uuid,
    name: &str,
) -> anyhow::Result<Option<Category>> {
    let Some(mut found) = get_category_by_id(store, id).await? else {
        return Ok(None);
    };
    found.name = name.to_string();
    store
        .put(
            category::COLLECTION,
            &id.to_string(),
            json!({ "name": found.name }),
            true,
        )
        .await?;
    Ok(Some(found))
}

pub async fn list_categories(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
) -> anyhow::Result<Vec<Category>> {
    let docs = store
        .query_by_equality(category::COLLECTION, "owner_id", &json!(owner_id))
        .await?;
    docs.into_iter().map(|doc| doc.decode()).collect()
}

/// Removes a category together with every project assigned to it, as one
/// batch commit. Either the category and all of its projects disappear, or
/// a failed commit leaves everything in place. Callers confirm with the
/// user first; once invoked the delete runs unconditionally.
///
/// Returns the number of projects removed, or `None` for an unknown id.
pub async fn delete_category_cascade(
    store: &dyn DocumentStore,
    id: &Uuid,
) -> anyhow::Result<Option<usize>> {
    let Some(found) = get_category_by_id(store, id).await? else {
        return Ok(None);
    };
    let assigned = store
        .query_by_equality(project::COLLECTION, "category_id", &json!(id))
        .await?;

    let mut batch = WriteBatch::new();
    for doc in &assigned {
        batch.delete(project::COLLECTION, &doc.key);
    }
    batch.delete(category::COLLECTION, &found.id.to_string());
    store.commit_batch(batch).await?;

    tracing::info!(
        category = %found.id,
        projects = assigned.len(),
        "category cascade delete committed"
    );
    Ok(Some(assigned.len()))
}

#[cfg(test)]
mod tests {
    use crate::core::memory::MemoryStore;
    use crate::core::test_utils::FlakyStore;
    use crate::repository::project::{create_project, list_projects, NewProject};

    use super::*;

    fn new_project(title: &str, category_id: Option<Uuid>) -> NewProject {
        NewProject {
            title: title.to_string(),
            recruiter_name: String::new(),
            description: String::new(),
            contribution: String::new(),
            tools: "rust".to_string(),
            link: String::new(),
            category_id,
        }
    }

    #[tokio::test]
    async fn test_category_create_update_list() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let owner_id = Uuid::now_v7();
        let first = create_category(&store, &owner_id, "Web").await?;
        let second = create_category(&store, &owner_id, "Embedded").await?;

        // When
        let renamed = update_category(&store, &first.id, "Frontend").await?;
        let listed = list_categories(&store, &owner_id).await?;

        // Expect
        assert_eq!(renamed.unwrap().name, "Frontend");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[0].name, "Frontend");
        assert_eq!(listed[1].id, second.id);

        let missing = update_category(&store, &Uuid::now_v7(), "nope").await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_cascade_removes_category_and_assigned_projects() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let owner_id = Uuid::now_v7();
        let doomed = create_category(&store, &owner_id, "Old work").await?;
        let kept = create_category(&store, &owner_id, "Current").await?;
        for title in ["a", "b", "c"] {
            create_project(&store, &owner_id, new_project(title, Some(doomed.id)))
                .await
                .unwrap();
        }
        create_project(&store, &owner_id, new_project("keep me", Some(kept.id)))
            .await
            .unwrap();
        create_project(&store, &owner_id, new_project("unassigned", None))
            .await
            .unwrap();

        // When
        let removed = delete_category_cascade(&store, &doomed.id).await?;

        // Expect
        assert_eq!(removed, Some(3));
        assert!(get_category_by_id(&store, &doomed.id).await?.is_none());
        let remaining = list_projects(&store, &owner_id).await?;
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|p| p.category_id != Some(doomed.id)));
        assert!(get_category_by_id(&store, &kept.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_cascade_failure_leaves_no_partial_state() -> anyhow::Result<()> {
        // Given
        let store = FlakyStore::new();
        let owner_id = Uuid::now_v7();
        let doomed = create_category(&store, &owner_id, "Old work").await?;
        for title in ["a", "b"] {
            create_project(&store, &owner_id, new_project(title, Some(doomed.id)))
                .await
                .unwrap();
        }
        store.fail_next_batches(1);

        // When
        let result = delete_category_cascade(&store, &doomed.id).await;

        // Expect everything still in place
        assert!(result.is_err());
        assert!(get_category_by_id(&store, &doomed.id).await?.is_some());
        assert_eq!(list_projects(&store, &owner_id).await?.len(), 2);

        // And the retry succeeds in full
        let removed = delete_category_cascade(&store, &doomed.id).await?;
        assert_eq!(removed, Some(2));
        assert!(get_category_by_id(&store, &doomed.id).await?.is_none());
        assert!(list_projects(&store, &owner_id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cascade_unknown_category() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let removed = delete_category_cascade(&store, &Uuid::now_v7()).await?;
        assert!(removed.is_none());
        Ok(())
    }
}
