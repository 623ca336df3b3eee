use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

pub const COLLECTION: &str = "usernames";

/// Public-lookup record mapping a username to its owner, keyed by the owner
/// id. The owner id never changes, so a username edit rewrites this one
/// record in place; resolution by name goes through an equality query on
/// `username`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsernameLookup {
    pub owner_id: Uuid,
    pub username: String,
}

impl UsernameLookup {
    pub fn to_fields(&self) -> Value {
        json!({
            "owner_id": self.owner_id,
            "username": self.username,
        })
    }
}
