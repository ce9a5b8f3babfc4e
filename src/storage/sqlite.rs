use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use super::backend::{TodoChanges, TodoStore};
use super::types::{StoreError, Todo};

/// Relational backend: one `todos` table, owner filtering and id ordering
/// pushed into SQL so foreign owners' rows never leave the store.
///
/// `INTEGER PRIMARY KEY` assigns max-rowid+1 to new rows, which is exactly
/// the id contract of the other backends.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                user_id TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        user_id: row.get(3)?,
    })
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn read_all(&self) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, title, completed, user_id FROM todos ORDER BY id ASC")?;
        let todos = stmt
            .query_map([], row_to_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(todos)
    }

    async fn write_all(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM todos", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO todos (id, title, completed, user_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for todo in &todos {
                stmt.execute(params![todo.id, todo.title, todo.completed, todo.user_id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    async fn list_owned(&self, owner: &str) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, title, completed, user_id FROM todos
             WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let todos = stmt
            .query_map(params![owner], row_to_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(todos)
    }

    async fn find_owned(&self, id: i64, owner: &str) -> Result<Option<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        let todo = conn
            .query_row(
                "SELECT id, title, completed, user_id FROM todos
                 WHERE id = ?1 AND user_id = ?2",
                params![id, owner],
                row_to_todo,
            )
            .optional()?;
        Ok(todo)
    }

    async fn insert(
        &self,
        title: String,
        completed: bool,
        owner: String,
    ) -> Result<Todo, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO todos (title, completed, user_id) VALUES (?1, ?2, ?3)",
            params![title, completed, owner],
        )?;

        Ok(Todo {
            id: conn.last_insert_rowid(),
            title,
            completed,
            user_id: owner,
        })
    }

    async fn update(
        &self,
        id: i64,
        owner: &str,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let conn = self.conn.lock().await;

        // Existence and ownership check first; the follow-up update is a
        // second statement. A concurrent delete in between reads as
        // not-found, which is the documented behavior.
        let existing = conn
            .query_row(
                "SELECT id, title, completed, user_id FROM todos
                 WHERE id = ?1 AND user_id = ?2",
                params![id, owner],
                row_to_todo,
            )
            .optional()?;
        let Some(mut todo) = existing else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }

        conn.execute(
            "UPDATE todos SET title = ?1, completed = ?2 WHERE id = ?3 AND user_id = ?4",
            params![todo.title, todo.completed, id, owner],
        )?;

        Ok(Some(todo))
    }

    async fn delete(&self, id: i64, owner: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute(
            "DELETE FROM todos WHERE id = ?1 AND user_id = ?2",
            params![id, owner],
        )?;
        Ok(deleted > 0)
    }
}
