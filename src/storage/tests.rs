//! Storage Module Tests
//!
//! Validates the id contract and the owner-scoped helpers across all three
//! backends.
//!
//! ## Test Scopes
//! - **Id assignment**: `next_id` over empty and sparse sets.
//! - **MemoryStore / FileStore**: default helper implementations, document
//!   persistence across reopen.
//! - **SqliteStore**: SQL pushdown behaving identically to the defaults.

#[cfg(test)]
mod tests {
    use crate::storage::backend::{next_id, TodoChanges, TodoStore};
    use crate::storage::file::FileStore;
    use crate::storage::memory::MemoryStore;
    use crate::storage::sqlite::SqliteStore;
    use crate::storage::types::Todo;

    fn todo(id: i64, title: &str, owner: &str) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            completed: false,
            user_id: owner.to_string(),
        }
    }

    // ============================================================
    // ID ASSIGNMENT
    // ============================================================

    #[test]
    fn test_next_id_over_empty_set_is_one() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn test_next_id_is_one_past_the_maximum() {
        let todos = vec![todo(1, "a", "u1"), todo(5, "b", "u2")];
        assert_eq!(next_id(&todos), 6);
    }

    // ============================================================
    // MEMORY STORE (default helper implementations)
    // ============================================================

    #[tokio::test]
    async fn test_insert_assigns_one_based_monotone_ids() {
        let store = MemoryStore::new();

        let first = store
            .insert("first".to_string(), false, "u1".to_string())
            .await
            .unwrap();
        let second = store
            .insert("second".to_string(), true, "u1".to_string())
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.completed);
    }

    #[tokio::test]
    async fn test_list_owned_filters_by_owner() {
        let store = MemoryStore::new();
        store
            .insert("mine".to_string(), false, "u1".to_string())
            .await
            .unwrap();
        store
            .insert("theirs".to_string(), false, "u2".to_string())
            .await
            .unwrap();

        let mine = store.list_owned("u1").await.unwrap();
        let theirs = store.list_owned("u2").await.unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].title, "theirs");
    }

    #[tokio::test]
    async fn test_find_owned_hides_foreign_records() {
        let store = MemoryStore::new();
        let created = store
            .insert("secret".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        assert!(store.find_owned(created.id, "u1").await.unwrap().is_some());
        assert!(store.find_owned(created.id, "u2").await.unwrap().is_none());
        assert!(store.find_owned(999, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_never_changes_owner() {
        let store = MemoryStore::new();
        let created = store
            .insert("task".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        let updated = store
            .update(
                created.id,
                "u1",
                TodoChanges {
                    title: Some("renamed".to_string()),
                    completed: Some(true),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert!(updated.completed);
        assert_eq!(updated.user_id, "u1");
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let store = MemoryStore::new();
        let created = store
            .insert("task".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        let updated = store
            .update(
                created.id,
                "u1",
                TodoChanges {
                    title: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "task");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_delete_misses_foreign_and_absent_records() {
        let store = MemoryStore::new();
        let created = store
            .insert("task".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        assert!(!store.delete(created.id, "u2").await.unwrap());
        assert!(!store.delete(999, "u1").await.unwrap());
        assert!(store.delete(created.id, "u1").await.unwrap());
        assert!(store.read_all().await.unwrap().is_empty());
    }

    // ============================================================
    // FILE STORE
    // ============================================================

    #[tokio::test]
    async fn test_file_store_missing_document_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("todos.json"));

        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");

        let store = FileStore::new(&path);
        store
            .insert("persisted".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        let reopened = FileStore::new(&path);
        let todos = reopened.read_all().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "persisted");
        assert_eq!(todos[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_file_store_write_all_replaces_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("todos.json"));

        store
            .insert("old".to_string(), false, "u1".to_string())
            .await
            .unwrap();
        store
            .write_all(vec![todo(7, "new", "u2")])
            .await
            .unwrap();

        let todos = store.read_all().await.unwrap();
        assert_eq!(todos, vec![todo(7, "new", "u2")]);
        assert_eq!(next_id(&todos), 8);
    }

    // ============================================================
    // SQLITE STORE (pushdown overrides)
    // ============================================================

    #[tokio::test]
    async fn test_sqlite_insert_and_list_ordering() {
        let store = SqliteStore::in_memory().unwrap();

        store
            .insert("a".to_string(), false, "u1".to_string())
            .await
            .unwrap();
        store
            .insert("b".to_string(), false, "u2".to_string())
            .await
            .unwrap();
        store
            .insert("c".to_string(), true, "u1".to_string())
            .await
            .unwrap();

        let mine = store.list_owned("u1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, 1);
        assert_eq!(mine[1].id, 3);
        assert!(mine[1].completed);
    }

    #[tokio::test]
    async fn test_sqlite_pushdown_matches_default_filtering() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .insert("a".to_string(), false, "u1".to_string())
            .await
            .unwrap();
        store
            .insert("b".to_string(), false, "u2".to_string())
            .await
            .unwrap();

        let pushed_down = store.list_owned("u1").await.unwrap();
        let filtered: Vec<_> = store
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.user_id == "u1")
            .collect();

        assert_eq!(pushed_down, filtered);
    }

    #[tokio::test]
    async fn test_sqlite_update_preserves_owner_and_absent_fields() {
        let store = SqliteStore::in_memory().unwrap();
        let created = store
            .insert("task".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        let updated = store
            .update(
                created.id,
                "u1",
                TodoChanges {
                    title: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "task");
        assert!(updated.completed);
        assert_eq!(updated.user_id, "u1");

        assert!(store
            .update(created.id, "u2", TodoChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_sqlite_delete_is_owner_scoped() {
        let store = SqliteStore::in_memory().unwrap();
        let created = store
            .insert("task".to_string(), false, "u1".to_string())
            .await
            .unwrap();

        assert!(!store.delete(created.id, "u2").await.unwrap());
        assert!(store.delete(created.id, "u1").await.unwrap());
        assert!(!store.delete(created.id, "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_sqlite_write_all_round_trips() {
        let store = SqliteStore::in_memory().unwrap();
        let records = vec![todo(1, "a", "u1"), todo(5, "b", "u2")];

        store.write_all(records.clone()).await.unwrap();

        assert_eq!(store.read_all().await.unwrap(), records);
    }
}
