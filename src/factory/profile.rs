use chrono::{DateTime, FixedOffset};
use fake::{Dummy, Fake, Faker};
use uuid::Uuid;

use crate::core::store::{DocumentStore, WriteBatch};
use crate::model::profile::{Profile, COLLECTION};
use crate::model::username_lookup::{self, UsernameLookup};

pub struct ProfileFactory<T: Clone> {
    modifier_one: fn(x: &Profile, ext: T) -> Profile,
    modifier_many: fn(x: &Profile, idx: usize, ext: T) -> Profile,
}

impl<T: Clone> Default for ProfileFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ProfileFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Profile, ext: T) -> Profile) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Profile, idx: usize, ext: T) -> Profile) {
        self.modifier_many = modifier
    }

    /// Writes the profile together with its username lookup record, the way
    /// signup does.
    pub async fn generate_one(
        &mut self,
        store: &dyn DocumentStore,
        ext: T,
    ) -> anyhow::Result<Profile> {
        let data = ProfileDummy::new().generate_one();
        let data = (self.modifier_one)(&data, ext);
        let mut batch = WriteBatch::new();
        self.push_writes(&mut batch, &data);
        store.commit_batch(batch).await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        store: &dyn DocumentStore,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Profile>> {
        let data = ProfileDummy::new().generate_many(num);
        let mut result: Vec<Profile> = vec![];
        for (idx, item) in data.iter().enumerate() {
            result.push((self.modifier_many)(item, idx, ext.clone()));
        }
        let mut batch = WriteBatch::new();
        for item in &result {
            self.push_writes(&mut batch, item);
        }
        store.commit_batch(batch).await?;
        Ok(result)
    }

    fn push_writes(&self, batch: &mut WriteBatch, data: &Profile) {
        batch.put(COLLECTION, &data.id.to_string(), data.to_fields(), false);
        let lookup = UsernameLookup {
            owner_id: data.id,
            username: data.username.clone(),
        };
        batch.put(
            username_lookup::COLLECTION,
            &data.id.to_string(),
            lookup.to_fields(),
            false,
        );
    }
}

#[derive(Debug, Default, Dummy, Clone)]
struct ProfileDummy {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub title: String,
    pub bio: String,
    pub picture_url: String,
    pub created_date: Option<DateTime<FixedOffset>>,
}

impl ProfileDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> Profile {
        let dummy = Faker.fake::<Self>();
        Profile {
            id: dummy.id,
            email: dummy.email,
            username: dummy.username,
            title: dummy.title,
            bio: dummy.bio,
            picture_url: dummy.picture_url,
            picture_scale: 1.0,
            picture_offset_x: 0,
            picture_offset_y: 0,
            created_date: dummy.created_date,
        }
    }

    pub fn generate_many(&self, num: u32) -> Vec<Profile> {
        let mut result: Vec<Profile> = vec![];
        for _ in 0..num {
            result.push(self.generate_one());
        }
        result
    }
}
