use serde::{Deserialize, Serialize};

/// Status given to a todo created without one.
pub const DEFAULT_STATUS: &str = "pending";

/// A stored todo, in the shape it is persisted and returned over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub task: String,
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Fields to change on an existing todo. Omitted fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl Todo {
    pub fn new(id: impl Into<String>, task: String, status: String) -> Self {
        Self {
            id: id.into(),
            task,
            status,
        }
    }
}
