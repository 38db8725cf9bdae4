use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use todo_shared::Todo;

use super::{NewTodo, StoreError, StoreResult, TodoChanges, TodoStore};

/// A todo as persisted in MongoDB. Fields are optional because documents
/// written by other clients are not schema-checked.
#[derive(Debug, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    task: Option<String>,
    status: Option<String>,
}

impl From<TodoDocument> for Todo {
    fn from(document: TodoDocument) -> Self {
        Todo {
            id: document.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            task: document.task.unwrap_or_default(),
            status: document.status.unwrap_or_default(),
        }
    }
}

pub struct MongoStore {
    collection: Collection<TodoDocument>,
}

impl MongoStore {
    /// Connect to `uri` and bind to `database.collection`.
    ///
    /// The server is pinged so an unreachable deployment fails here rather
    /// than on the first query.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database);
        database.run_command(doc! { "ping": 1 }).await?;

        Ok(Self {
            collection: database.collection(collection),
        })
    }
}

fn parse_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn inserted_hex(id: Bson) -> StoreResult<String> {
    match id {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        other => Err(StoreError::UnexpectedKey(other.to_string())),
    }
}

fn set_document(changes: &TodoChanges) -> Document {
    let mut set = Document::new();
    if let Some(task) = &changes.task {
        set.insert("task", task.as_str());
    }
    if let Some(status) = &changes.status {
        set.insert("status", status.as_str());
    }
    set
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<TodoDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Todo::from).collect())
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Todo> {
        let document = TodoDocument {
            id: None,
            task: Some(todo.task.clone()),
            status: Some(todo.status.clone()),
        };
        let result = self.collection.insert_one(&document).await?;
        let id = inserted_hex(result.inserted_id)?;

        Ok(Todo::new(id, todo.task, todo.status))
    }

    async fn update(&self, id: &str, changes: TodoChanges) -> StoreResult<Option<Todo>> {
        let filter = doc! { "_id": parse_id(id)? };

        // An empty $set is rejected by the server.
        let document = if changes.is_empty() {
            self.collection.find_one(filter).await?
        } else {
            self.collection
                .find_one_and_update(filter, doc! { "$set": set_document(&changes) })
                .return_document(ReturnDocument::After)
                .await?
        };

        Ok(document.map(Todo::from))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Todo>> {
        let filter = doc! { "_id": parse_id(id)? };
        let document = self.collection.find_one_and_delete(filter).await?;
        Ok(document.map(Todo::from))
    }
}
