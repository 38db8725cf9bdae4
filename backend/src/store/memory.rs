use async_trait::async_trait;
use tokio::sync::RwLock;
use todo_shared::Todo;
use uuid::Uuid;

use super::{NewTodo, StoreError, StoreResult, TodoChanges, TodoStore};

/// In-process todo collection keyed by UUID, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

fn parse_id(id: &str) -> StoreResult<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.todos.read().await.clone())
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        let todo = Todo::new(Uuid::new_v4().to_string(), todo.task, todo.status);
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &str, changes: TodoChanges) -> StoreResult<Option<Todo>> {
        let id = parse_id(id)?;
        let mut todos = self.todos.write().await;
        Ok(todos.iter_mut().find(|todo| todo.id == id).map(|todo| {
            changes.apply(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let id = parse_id(id)?;
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|todo| todo.id == id)
            .map(|index| todos.remove(index)))
    }
}
