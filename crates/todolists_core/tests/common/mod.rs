#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;
use todolists_core::auth::hash_password_with_cost;
use todolists_core::{ListId, SqliteTodoStore, TodoId, TodoPersistence};

/// Temporary database file with provisioned users. Dropping it removes the
/// directory.
pub struct SqliteFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl SqliteFixture {
    pub fn new(users: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todolists.sqlite3");
        let admin = SqliteTodoStore::open(&path, "provisioning").unwrap();
        for (username, password) in users {
            assert!(admin
                .register_user(username, &hash_password_with_cost(password, 4).unwrap())
                .unwrap());
        }
        Self { _dir: dir, path }
    }

    pub fn store_for(&self, username: &str) -> SqliteTodoStore {
        SqliteTodoStore::open(&self.path, username).unwrap()
    }
}

pub fn list_id_by_title<P: TodoPersistence>(store: &P, title: &str) -> ListId {
    store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .map(|list| list.id)
        .unwrap_or_else(|| panic!("list `{title}` not found"))
}

pub fn todo_id_by_title<P: TodoPersistence>(store: &P, list_id: ListId, title: &str) -> TodoId {
    store
        .load_todo_list(list_id)
        .unwrap()
        .unwrap()
        .todos
        .into_iter()
        .find(|todo| todo.title == title)
        .map(|todo| todo.id)
        .unwrap_or_else(|| panic!("todo `{title}` not found"))
}

/// Builds the "Work" list used by scenario tests: Email (undone), Call (done).
pub fn seed_work_list<P: TodoPersistence>(store: &mut P) -> ListId {
    assert!(store.create_todo_list("Work").unwrap());
    let list_id = list_id_by_title(store, "Work");
    assert!(store.add_todo(list_id, "Email").unwrap());
    assert!(store.add_todo(list_id, "Call").unwrap());
    let call_id = todo_id_by_title(store, list_id, "Call");
    assert!(store.toggle_done_todo(list_id, call_id).unwrap());
    list_id
}
