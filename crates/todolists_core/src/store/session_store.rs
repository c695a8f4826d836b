//! In-process todo persistence scoped by session.
//!
//! # Responsibility
//! - Keep each session's list tree in a `SessionStore` keyed by `SessionId`.
//! - Implement `TodoPersistence` over one session entry borrowed exclusively.
//!
//! # Invariants
//! - A session entry is seeded exactly once, when it is first created.
//! - Reads return snapshots; the live tree never leaves this module.
//! - Writes mutate the session's own tree synchronously and are visible to
//!   the next call on the same session.
//! - `&mut` access makes every session single-writer. Callers sharing a
//!   `SessionStore` between threads wrap it in a lock.

use crate::auth::verify_password;
use crate::ids::next_id;
use crate::model::todo::{normalize_title, ListId, Todo, TodoId, TodoList};
use crate::ordering;
use crate::snapshot::Snapshot;
use crate::store::seed::default_todo_lists;
use crate::store::{StoreResult, TodoPersistence};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier of one client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of every session's todo tree and of the credentials checked by
/// `authenticate`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Vec<TodoList>>,
    users: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the stored credential for `username`.
    pub fn register_user(&mut self, username: impl Into<String>, password_hash: impl Into<String>) {
        self.users.insert(username.into(), password_hash.into());
    }

    /// Creates a new session seeded with the default dataset.
    pub fn create_session(&mut self) -> SessionId {
        let id = SessionId::new();
        self.seed(id);
        id
    }

    /// Opens an existing session. `None` for unknown ids; never seeds.
    pub fn open_session(&mut self, id: SessionId) -> Option<SessionTodoStore<'_>> {
        let todo_lists = self.sessions.get_mut(&id)?;
        Some(SessionTodoStore {
            session_id: id,
            todo_lists,
            users: &self.users,
        })
    }

    /// Opens `id`, seeding it first when the store has never seen it.
    pub fn open_or_seed(&mut self, id: SessionId) -> SessionTodoStore<'_> {
        if !self.sessions.contains_key(&id) {
            self.seed(id);
        }
        let todo_lists = self.sessions.entry(id).or_default();
        SessionTodoStore {
            session_id: id,
            todo_lists,
            users: &self.users,
        }
    }

    /// Drops a session and its data. Returns whether it existed.
    pub fn remove_session(&mut self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn seed(&mut self, id: SessionId) {
        let lists = default_todo_lists();
        info!(
            "event=session_seed module=store status=ok session_id={} lists={}",
            id,
            lists.len()
        );
        self.sessions.insert(id, lists);
    }
}

/// `TodoPersistence` over one session's tree.
#[derive(Debug)]
pub struct SessionTodoStore<'store> {
    session_id: SessionId,
    todo_lists: &'store mut Vec<TodoList>,
    users: &'store HashMap<String, String>,
}

impl SessionTodoStore<'_> {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    fn find_list(&self, list_id: ListId) -> Option<&TodoList> {
        self.todo_lists.iter().find(|list| list.id == list_id)
    }

    fn find_list_mut(&mut self, list_id: ListId) -> Option<&mut TodoList> {
        self.todo_lists.iter_mut().find(|list| list.id == list_id)
    }

    fn find_todo_mut(&mut self, list_id: ListId, todo_id: TodoId) -> Option<&mut Todo> {
        self.find_list_mut(list_id)?.find_todo_mut(todo_id)
    }

    fn title_taken_by_other(&self, title: &str, list_id: Option<ListId>) -> bool {
        self.todo_lists
            .iter()
            .any(|list| list.title == title && Some(list.id) != list_id)
    }

    fn log_write(&self, event: &str, applied: bool) {
        debug!(
            "event={event} module=store status={} session_id={}",
            if applied { "ok" } else { "rejected" },
            self.session_id
        );
    }
}

impl TodoPersistence for SessionTodoStore<'_> {
    fn load_todo_list(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        Ok(self.find_list(list_id).map(Snapshot::snapshot))
    }

    fn load_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self
            .find_list(list_id)
            .and_then(|list| list.find_todo(todo_id))
            .map(Snapshot::snapshot))
    }

    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        Ok(ordering::sorted_todo_lists(self.todo_lists.snapshot()))
    }

    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>> {
        Ok(ordering::sorted_todos(list.todos.snapshot()))
    }

    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        let applied = match normalize_title(title) {
            Ok(title) if !self.title_taken_by_other(title, None) => {
                self.todo_lists.push(TodoList::new(next_id(), title));
                true
            }
            _ => false,
        };
        self.log_write("todo_list_create", applied);
        Ok(applied)
    }

    fn add_todo(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        let Ok(title) = normalize_title(title) else {
            self.log_write("todo_add", false);
            return Ok(false);
        };

        let applied = match self.find_list_mut(list_id) {
            Some(list) => {
                list.todos.push(Todo::new(next_id(), list_id, title));
                true
            }
            None => false,
        };
        self.log_write("todo_add", applied);
        Ok(applied)
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool> {
        let applied = match self.find_list_mut(list_id) {
            Some(list) => match list.todos.iter().position(|todo| todo.id == todo_id) {
                Some(index) => {
                    list.todos.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        self.log_write("todo_delete", applied);
        Ok(applied)
    }

    fn delete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool> {
        let applied = match self.todo_lists.iter().position(|list| list.id == list_id) {
            Some(index) => {
                self.todo_lists.remove(index);
                true
            }
            None => false,
        };
        self.log_write("todo_list_delete", applied);
        Ok(applied)
    }

    fn toggle_done_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool> {
        let applied = match self.find_todo_mut(list_id, todo_id) {
            Some(todo) => {
                todo.done = !todo.done;
                true
            }
            None => false,
        };
        self.log_write("todo_toggle", applied);
        Ok(applied)
    }

    fn complete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool> {
        let applied = match self.find_list_mut(list_id) {
            Some(list) => {
                list.todos.iter_mut().for_each(|todo| todo.done = true);
                true
            }
            None => false,
        };
        self.log_write("todo_list_complete", applied);
        Ok(applied)
    }

    fn set_todo_list_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        let title = match normalize_title(title) {
            Ok(title) if !self.title_taken_by_other(title, Some(list_id)) => title,
            _ => {
                self.log_write("todo_list_rename", false);
                return Ok(false);
            }
        };

        let applied = match self.find_list_mut(list_id) {
            Some(list) => {
                list.title = title.to_string();
                true
            }
            None => false,
        };
        self.log_write("todo_list_rename", applied);
        Ok(applied)
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        Ok(self.todo_lists.iter().any(|list| list.title == title))
    }

    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        match self.users.get(username) {
            Some(hash) => Ok(verify_password(password, hash)),
            None => Ok(false),
        }
    }
}
