use async_trait::async_trait;

use super::types::{StoreError, Todo};

/// Changes to apply to an existing record. `None` keeps the stored value.
/// There is deliberately no owner field here: ownership is immutable.
#[derive(Debug, Default, Clone)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// The storage backend contract.
///
/// Backends persist the full, unscoped record set. The owner-scoped helpers
/// below carry default implementations built on `read_all`/`write_all`;
/// backends with native query support override them so foreign owners' rows
/// never leave the store.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// The full record set, in insertion order. Empty when no data exists.
    async fn read_all(&self) -> Result<Vec<Todo>, StoreError>;

    /// Replaces the entire record set.
    async fn write_all(&self, todos: Vec<Todo>) -> Result<(), StoreError>;

    /// Records owned by `owner`, in insertion order.
    async fn list_owned(&self, owner: &str) -> Result<Vec<Todo>, StoreError> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .filter(|todo| todo.user_id == owner)
            .collect())
    }

    /// The record with `id`, if it exists and is owned by `owner`.
    async fn find_owned(&self, id: i64, owner: &str) -> Result<Option<Todo>, StoreError> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .find(|todo| todo.id == id && todo.user_id == owner))
    }

    /// Appends a new record for `owner`, assigning the next id.
    async fn insert(
        &self,
        title: String,
        completed: bool,
        owner: String,
    ) -> Result<Todo, StoreError> {
        let mut todos = self.read_all().await?;
        let todo = Todo {
            id: next_id(&todos),
            title,
            completed,
            user_id: owner,
        };
        todos.push(todo.clone());
        self.write_all(todos).await?;
        Ok(todo)
    }

    /// Applies `changes` to the record if it exists and is owned by `owner`.
    /// Returns the updated record, or `None` when there is nothing to update.
    async fn update(
        &self,
        id: i64,
        owner: &str,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.read_all().await?;
        let Some(todo) = todos
            .iter_mut()
            .find(|todo| todo.id == id && todo.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }

        let updated = todo.clone();
        self.write_all(todos).await?;
        Ok(Some(updated))
    }

    /// Removes the record if owned by `owner`. True when something was
    /// actually deleted.
    async fn delete(&self, id: i64, owner: &str) -> Result<bool, StoreError> {
        let mut todos = self.read_all().await?;
        let before = todos.len();
        todos.retain(|todo| !(todo.id == id && todo.user_id == owner));

        if todos.len() == before {
            return Ok(false);
        }

        self.write_all(todos).await?;
        Ok(true)
    }
}

/// One past the highest assigned id, or 1 for an empty set.
pub fn next_id(todos: &[Todo]) -> i64 {
    todos.iter().map(|todo| todo.id).max().unwrap_or(0) + 1
}
