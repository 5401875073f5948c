//! Shared fixtures for unit tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use warden_core::storage::{Fields, Record};

use crate::storage::InMemoryStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl Post {
    /// An unsaved post.
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            title: title.to_string(),
            slug: None,
            published: false,
            created_at: Utc::now(),
            author: None,
        }
    }
}

impl Record for Post {
    const ENTITY_TYPE: &'static str = "Post";

    fn id(&self) -> Uuid {
        self.id
    }

    fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Store for posts with an `author` relation and a unique `slug`.
pub fn post_store() -> InMemoryStore<Post> {
    InMemoryStore::new()
        .with_relation("author", |doc| match doc.get("user_id") {
            Some(Value::String(user_id)) => json!({ "id": user_id }),
            _ => Value::Null,
        })
        .with_unique("slug")
}

/// Converts a `json!` object literal into `Fields`.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
