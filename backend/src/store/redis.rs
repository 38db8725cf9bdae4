use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use todo_shared::Todo;
use uuid::Uuid;

use super::{NewTodo, StoreError, StoreResult, TodoChanges, TodoStore};

/// Todos kept as JSON documents under `<database>:<collection>:<uuid>`.
pub struct RedisStore {
    conn: MultiplexedConnection,
    prefix: String,
}

impl RedisStore {
    pub async fn connect(url: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;

        Ok(Self {
            conn,
            prefix: format!("{database}:{collection}"),
        })
    }

    fn key(&self, id: &Uuid) -> String {
        document_key(&self.prefix, id)
    }

    fn key_for(&self, id: &str) -> StoreResult<String> {
        let id = Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        Ok(self.key(&id))
    }
}

/// Parse fetched documents, skipping keys that vanished or hold values that
/// are not todos.
fn decode_documents<'a, I>(entries: I) -> Vec<Todo>
where
    I: IntoIterator<Item = (&'a String, Option<String>)>,
{
    let mut todos = Vec::new();
    for (key, json) in entries {
        let Some(json) = json else { continue };
        match serde_json::from_str(&json) {
            Ok(todo) => todos.push(todo),
            Err(err) => tracing::warn!(key = %key, error = %err, "Skipping undecodable todo"),
        }
    }
    todos
}

fn document_key(prefix: &str, id: &Uuid) -> String {
    format!("{prefix}:{id}")
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(format!("{}:*", self.prefix)).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        // Keys deleted between KEYS and MGET come back as nil.
        let values: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;
        Ok(decode_documents(keys.iter().zip(values)))
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        let id = Uuid::new_v4();
        let todo = Todo::new(id.to_string(), todo.task, todo.status);
        let json = serde_json::to_string(&todo)?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.key(&id), json).await?;

        Ok(todo)
    }

    async fn update(&self, id: &str, changes: TodoChanges) -> StoreResult<Option<Todo>> {
        let key = self.key_for(id)?;
        let mut conn = self.conn.clone();

        let current: Option<String> = conn.get(&key).await?;
        let Some(json) = current else {
            return Ok(None);
        };
        let mut todo: Todo = serde_json::from_str(&json)?;
        if changes.is_empty() {
            return Ok(Some(todo));
        }
        changes.apply(&mut todo);

        // XX: only overwrite if the document still exists.
        let written: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(serde_json::to_string(&todo)?)
            .arg("XX")
            .query_async(&mut conn)
            .await?;

        Ok(written.map(|_| todo))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let key = self.key_for(id)?;
        let mut conn = self.conn.clone();

        let removed: Option<String> = redis::cmd("GETDEL").arg(&key).query_async(&mut conn).await?;
        match removed {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_database_and_collection() {
        let id = Uuid::nil();
        assert_eq!(
            document_key("todoDB:todos", &id),
            "todoDB:todos:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn listing_skips_missing_and_corrupt_values() {
        let todo = Todo::new("a", "buy milk".to_string(), "pending".to_string());
        let keys = ["todoDB:todos:a", "todoDB:todos:b", "todoDB:todos:c"].map(String::from);
        let values = vec![
            Some(serde_json::to_string(&todo).unwrap()),
            None,
            Some("not json".to_string()),
        ];
        assert_eq!(decode_documents(keys.iter().zip(values)), vec![todo]);
    }
}
