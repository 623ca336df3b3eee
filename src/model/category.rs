use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

pub const COLLECTION: &str = "categories";

/// A user-defined project grouping. Belongs to exactly one profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

impl Category {
    pub fn to_fields(&self) -> Value {
        json!({
            "name": self.name,
            "owner_id": self.owner_id,
        })
    }
}
