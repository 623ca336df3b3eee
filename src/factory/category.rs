use fake::{Dummy, Fake, Faker};
use uuid::Uuid;

use crate::core::store::{DocumentStore, WriteBatch};
use crate::model::category::{Category, COLLECTION};

pub struct CategoryFactory<T: Clone> {
    modifier_one: fn(x: &Category, ext: T) -> Category,
    modifier_many: fn(x: &Category, idx: usize, ext: T) -> Category,
}

impl<T: Clone> Default for CategoryFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> CategoryFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Category, ext: T) -> Category) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Category, idx: usize, ext: T) -> Category) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(
        &mut self,
        store: &dyn DocumentStore,
        ext: T,
    ) -> anyhow::Result<Category> {
        let data = CategoryDummy::new().generate_one();
        let data = (self.modifier_one)(&data, ext);
        store
            .put(COLLECTION, &data.id.to_string(), data.to_fields(), false)
            .await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        store: &dyn DocumentStore,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Category>> {
        let data = CategoryDummy::new().generate_many(num);
        let mut result: Vec<Category> = vec![];
        for (idx, item) in data.iter().enumerate() {
            result.push((self.modifier_many)(item, idx, ext.clone()));
        }
        let mut batch = WriteBatch::new();
        for item in &result {
            batch.put(COLLECTION, &item.id.to_string(), item.to_fields(), false);
        }
        store.commit_batch(batch).await?;
        Ok(result)
    }
}

#[derive(Debug, Default, Dummy, Clone)]
struct CategoryDummy {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

impl CategoryDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> Category {
        let dummy = Faker.fake::<Self>();
        Category {
            id: dummy.id,
            name: dummy.name,
            owner_id: dummy.owner_id,
        }
    }

    pub fn generate_many(&self, num: u32) -> Vec<Category> {
        let mut result: Vec<Category> = vec![];
        for _ in 0..num {
            result.push(self.generate_one());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::core::memory::MemoryStore;
    use crate::repository::category::list_categories;

    use super::*;

    #[tokio::test]
    async fn test_generate_many_modified() -> anyhow::Result<()> {
        // Given
        let store = MemoryStore::new();
        let owner_id = Uuid::now_v7();

        // When
        let mut factory = CategoryFactory::<Uuid>::new();
        factory.modified_many(|data, idx, ext| Category {
            id: data.id,
            name: format!("category {idx}"),
            owner_id: ext,
        });
        factory.generate_many(&store, 5, owner_id).await?;

        // Expect
        let listed = list_categories(&store, &owner_id).await?;
        assert_eq!(listed.len(), 5);
        assert!(listed.iter().any(|c| c.name == "category 0"));
        Ok(())
    }
}
