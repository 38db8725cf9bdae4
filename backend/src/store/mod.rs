//! Document store backends for the todo collection.
//!
//! Every backend exposes the same four calls. Identifiers are opaque strings
//! at this boundary; each backend parses them into its native key type and
//! reports [`StoreError::InvalidId`] when that fails.

mod memory;
mod mongo;
mod redis;

pub use self::memory::MemoryStore;
pub use self::mongo::MongoStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;
use thiserror::Error;
use todo_shared::Todo;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid todo identifier: {0}")]
    InvalidId(String),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store returned an unexpected document key: {0}")]
    UnexpectedKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A validated todo ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub task: String,
    pub status: String,
}

/// Field replacements applied by an update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub task: Option<String>,
    pub status: Option<String>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.status.is_none()
    }

    pub fn apply(&self, todo: &mut Todo) {
        if let Some(task) = &self.task {
            todo.task = task.clone();
        }
        if let Some(status) = &self.status {
            todo.status = status.clone();
        }
    }
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Every todo, in whatever order the store yields them.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    /// Insert a todo; the store assigns its identifier.
    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo>;

    /// Apply `changes` and return the document as it is after the update,
    /// or `None` when no todo has this identifier.
    async fn update(&self, id: &str, changes: TodoChanges) -> StoreResult<Option<Todo>>;

    /// Remove a todo and return its last known state.
    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_only_touch_supplied_fields() {
        let mut todo = Todo::new("1", "buy milk".to_string(), "pending".to_string());
        let changes = TodoChanges {
            task: None,
            status: Some("done".to_string()),
        };
        changes.apply(&mut todo);
        assert_eq!(todo.task, "buy milk");
        assert_eq!(todo.status, "done");
        assert!(TodoChanges::default().is_empty());
        assert!(!changes.is_empty());
    }
}
