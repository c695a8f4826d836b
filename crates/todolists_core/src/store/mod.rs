//! Persistence facade for todo lists and its backends.
//!
//! # Responsibility
//! - Define the single data-access contract the rest of the app depends on.
//! - Provide a SQLite backend scoped by username and a session backend
//!   scoped by session id.
//!
//! # Invariants
//! - Not-found and uniqueness failures are `Ok(None)` / `Ok(false)`, never
//!   `Err`. `Err` is reserved for backend faults.
//! - Every value returned to callers is owned by the caller; mutating it never
//!   changes stored state (copy-on-read). Stored state only changes through
//!   the mutating methods below (copy-on-write happens inside the backend).
//! - Ordering of `sorted_*` results comes from `crate::ordering` for every
//!   backend.
//! - Titles failing `validate_title` are rejected with `Ok(false)`; accepted
//!   titles are stored trimmed (`normalize_title`).
//! - Rename policy is shared: a rename to a title held by a different list of
//!   the same user fails; a rename to the list's own title succeeds.

use crate::db::DbError;
use crate::model::todo::{ListId, Todo, TodoId, TodoList};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod seed;
pub mod session_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Backend fault raised by a persistence operation.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A persisted row violates model invariants.
    InvalidData(String),
    /// A concurrent read worker panicked before returning.
    Worker(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::Worker(name) => write!(f, "read worker `{name}` panicked"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Worker(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for one user's todo lists.
///
/// Implementations are bound to a scope at construction (a username for the
/// SQLite backend, a session for the session backend); ids from other scopes
/// behave as not found.
pub trait TodoPersistence {
    /// Loads one list with all its todos attached.
    fn load_todo_list(&self, list_id: ListId) -> StoreResult<Option<TodoList>>;

    /// Loads one todo of one list.
    fn load_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreResult<Option<Todo>>;

    /// Returns every list of the scope, not-done lists first, titles
    /// ascending case-insensitively.
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>>;

    /// Returns the todos of `list`, not-done first, titles ascending
    /// case-insensitively.
    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>>;

    /// Creates an empty list. `false` when the title is taken or invalid.
    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool>;

    /// Appends a not-done todo. `false` when the list is missing or the
    /// title is invalid.
    fn add_todo(&mut self, list_id: ListId, title: &str) -> StoreResult<bool>;

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool>;

    /// Deletes a list together with all of its todos.
    fn delete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool>;

    fn toggle_done_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool>;

    /// Marks every todo of the list done. An existing empty list succeeds.
    fn complete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool>;

    /// Renames a list. `false` when the list is missing, the title is
    /// invalid, or another list already uses the title.
    fn set_todo_list_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool>;

    /// Exact, case-sensitive title lookup among the scope's lists.
    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool>;

    /// Checks a username/password pair. Unknown users and wrong passwords
    /// are both `Ok(false)`.
    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool>;

    fn is_done_todo_list(&self, list: &TodoList) -> bool {
        list.is_done()
    }

    fn has_undone_todos(&self, list: &TodoList) -> bool {
        list.has_undone_todos()
    }
}

impl<T: TodoPersistence + ?Sized> TodoPersistence for Box<T> {
    fn load_todo_list(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        (**self).load_todo_list(list_id)
    }

    fn load_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        (**self).load_todo(list_id, todo_id)
    }

    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        (**self).sorted_todo_lists()
    }

    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>> {
        (**self).sorted_todos(list)
    }

    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        (**self).create_todo_list(title)
    }

    fn add_todo(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        (**self).add_todo(list_id, title)
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool> {
        (**self).delete_todo(list_id, todo_id)
    }

    fn delete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool> {
        (**self).delete_todo_list(list_id)
    }

    fn toggle_done_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool> {
        (**self).toggle_done_todo(list_id, todo_id)
    }

    fn complete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool> {
        (**self).complete_todo_list(list_id)
    }

    fn set_todo_list_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        (**self).set_todo_list_title(list_id, title)
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        (**self).exists_todo_list_title(title)
    }

    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        (**self).authenticate(username, password)
    }
}
