use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::TodoStore;
use super::types::{StoreError, Todo};

/// Ephemeral record set held in process memory. Nothing survives a restart;
/// useful for tests and throwaway deployments.
#[derive(Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.clone())
    }

    async fn write_all(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        *self.todos.write().await = todos;
        Ok(())
    }
}
