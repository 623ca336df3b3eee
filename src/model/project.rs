use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

pub const COLLECTION: &str = "projects";

/// A portfolio entry. Belongs to exactly one profile and at most one of the
/// owner's categories.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub recruiter_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contribution: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub link: String,
    pub owner_id: Uuid,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

impl Project {
    pub fn to_fields(&self) -> Value {
        json!({
            "title": self.title,
            "recruiter_name": self.recruiter_name,
            "description": self.description,
            "contribution": self.contribution,
            "tools": self.tools,
            "link": self.link,
            "owner_id": self.owner_id,
            "category_id": self.category_id,
        })
    }
}
