//! File-backed side of the data access layer.
//!
//! Mirrors the server's API over a `todos.json` file in the client's state
//! directory. Ids are assigned the same way the server assigns them, one
//! past the current maximum, so a list built offline looks like a list built
//! online.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::api::{ClientError, Todo, TodoUpdate};
use crate::identity;

pub struct LocalApi {
    todos_path: PathBuf,
    owner: String,
}

impl LocalApi {
    pub fn open(state_dir: &Path) -> Result<Self, ClientError> {
        std::fs::create_dir_all(state_dir)?;

        let owner = match identity::saved_token(state_dir)? {
            Some(saved) => saved,
            None => {
                let token = identity::local_token();
                identity::persist_token(state_dir, &token)?;
                token
            }
        };

        Ok(Self {
            todos_path: state_dir.join("todos.json"),
            owner,
        })
    }

    pub fn get_all(&self) -> Result<Vec<Todo>, ClientError> {
        self.read()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Todo, ClientError> {
        self.read()?
            .into_iter()
            .find(|todo| todo.id == id)
            .ok_or(ClientError::NotFound(id))
    }

    pub fn create(&self, title: String) -> Result<Todo, ClientError> {
        let mut todos = self.read()?;
        let id = todos.iter().map(|todo| todo.id).max().unwrap_or(0) + 1;

        let todo = Todo {
            id,
            title,
            completed: false,
            user_id: self.owner.clone(),
        };
        todos.push(todo.clone());
        self.write(&todos)?;

        Ok(todo)
    }

    pub fn update(&self, id: i64, changes: TodoUpdate) -> Result<Todo, ClientError> {
        let mut todos = self.read()?;
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(ClientError::NotFound(id))?;

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }

        let updated = todo.clone();
        self.write(&todos)?;
        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> Result<(), ClientError> {
        let mut todos = self.read()?;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);

        if todos.len() == before {
            return Err(ClientError::NotFound(id));
        }

        self.write(&todos)
    }

    fn read(&self) -> Result<Vec<Todo>, ClientError> {
        match std::fs::read(&self.todos_path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, todos: &[Todo]) -> Result<(), ClientError> {
        std::fs::write(&self.todos_path, serde_json::to_vec_pretty(todos)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_in(dir: &tempfile::TempDir) -> LocalApi {
        LocalApi::open(dir.path()).unwrap()
    }

    #[test]
    fn test_fresh_store_is_empty_and_mints_a_local_owner() {
        let dir = tempfile::tempdir().unwrap();
        let api = open_in(&dir);

        assert!(api.get_all().unwrap().is_empty());
        assert!(api.owner.starts_with("local-"));
    }

    #[test]
    fn test_owner_token_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let first = open_in(&dir).owner.clone();
        let second = open_in(&dir).owner.clone();

        assert_eq!(first, second);
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let api = open_in(&dir);

        assert_eq!(api.create("a".to_string()).unwrap().id, 1);
        assert_eq!(api.create("b".to_string()).unwrap().id, 2);
    }

    #[test]
    fn test_ids_continue_past_the_maximum_after_a_delete() {
        let dir = tempfile::tempdir().unwrap();
        let api = open_in(&dir);

        api.create("a".to_string()).unwrap();
        let second = api.create("b".to_string()).unwrap();
        api.delete(1).unwrap();

        assert_eq!(api.create("c".to_string()).unwrap().id, second.id + 1);
    }

    #[test]
    fn test_update_applies_fields_independently() {
        let dir = tempfile::tempdir().unwrap();
        let api = open_in(&dir);
        let created = api.create("task".to_string()).unwrap();

        let updated = api
            .update(
                created.id,
                TodoUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "task");
        assert!(updated.completed);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let api = open_in(&dir);

        assert!(matches!(api.get_by_id(7), Err(ClientError::NotFound(7))));
        assert!(matches!(api.delete(7), Err(ClientError::NotFound(7))));
        assert!(matches!(
            api.update(7, TodoUpdate::default()),
            Err(ClientError::NotFound(7))
        ));
    }

    #[test]
    fn test_todos_persist_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let created = open_in(&dir).create("persisted".to_string()).unwrap();

        let reopened = open_in(&dir);
        assert_eq!(reopened.get_all().unwrap(), vec![created]);
    }
}
