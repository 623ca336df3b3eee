use fake::{Dummy, Fake, Faker};
use uuid::Uuid;

use crate::core::store::{DocumentStore, WriteBatch};
use crate::model::project::{Project, COLLECTION};

pub struct ProjectFactory<T: Clone> {
    modifier_one: fn(x: &Project, ext: T) -> Project,
    modifier_many: fn(x: &Project, idx: usize, ext: T) -> Project,
}

impl<T: Clone> Default for ProjectFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ProjectFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Project, ext: T) -> Project) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Project, idx: usize, ext: T) -> Project) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(
        &mut self,
        store: &dyn DocumentStore,
        ext: T,
    ) -> anyhow::Result<Project> {
        let data = ProjectDummy::new().generate_one();
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
    ) -> anyhow::Result<Vec<Project>> {
        let data = ProjectDummy::new().generate_many(num);
        let mut result: Vec<Project> = vec![];
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
struct ProjectDummy {
    pub id: Uuid,
    pub title: String,
    pub recruiter_name: String,
    pub description: String,
    pub contribution: String,
    pub tools: Vec<String>,
    pub link: String,
    pub owner_id: Uuid,
    pub category_id: Option<Uuid>,
}

impl ProjectDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> Project {
        let dummy = Faker.fake::<Self>();
        Project {
            id: dummy.id,
            title: dummy.title,
            recruiter_name: dummy.recruiter_name,
            description: dummy.description,
            contribution: dummy.contribution,
            tools: dummy.tools,
            link: dummy.link,
            owner_id: dummy.owner_id,
            category_id: dummy.category_id,
        }
    }

    pub fn generate_many(&self, num: u32) -> Vec<Project> {
        let mut result: Vec<Project> = vec![];
        for _ in 0..num {
            result.push(self.generate_one());
        }
        result
    }
}
