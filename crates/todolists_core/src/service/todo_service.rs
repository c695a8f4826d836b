//! Todo list use-case service.
//!
//! # Responsibility
//! - Turn the boolean persistence contract into semantic errors for callers.
//! - Build the overview and detail projections shown to users.
//!
//! # Invariants
//! - Titles are trimmed and validated before reaching the backend.
//! - Duplicate titles are checked before create/rename so that callers get
//!   `DuplicateTitle` instead of a bare failure.
//! - The service stays backend-agnostic; it only sees `TodoPersistence`.

use crate::model::todo::{normalize_title, ListId, TitleError, Todo, TodoId, TodoList};
use crate::store::{StoreError, TodoPersistence};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo list use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    InvalidTitle(TitleError),
    DuplicateTitle(String),
    ListNotFound(ListId),
    TodoNotFound { list_id: ListId, todo_id: TodoId },
    Store(StoreError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(err) => write!(f, "{err}"),
            Self::DuplicateTitle(title) => write!(f, "the list title `{title}` must be unique"),
            Self::ListNotFound(list_id) => write!(f, "todo list not found: {list_id}"),
            Self::TodoNotFound { list_id, todo_id } => {
                write!(f, "todo not found: {todo_id} in list {list_id}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TodoServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TitleError> for TodoServiceError {
    fn from(value: TitleError) -> Self {
        Self::InvalidTitle(value)
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// One row of the lists overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoListSummary {
    pub id: ListId,
    pub title: String,
    pub count_all_todos: usize,
    pub count_done_todos: usize,
    pub is_done: bool,
}

/// A list with its todos in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoListDetail {
    pub id: ListId,
    pub title: String,
    pub todos: Vec<Todo>,
    pub is_done: bool,
    pub has_undone_todos: bool,
}

/// Use-case facade over any `TodoPersistence` backend.
pub struct TodoService<P: TodoPersistence> {
    store: P,
}

impl<P: TodoPersistence> TodoService<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn sign_in(&self, username: &str, password: &str) -> ServiceResult<bool> {
        Ok(self.store.authenticate(username.trim(), password)?)
    }

    /// Lists overview in display order.
    pub fn list_overview(&self) -> ServiceResult<Vec<TodoListSummary>> {
        let lists = self.store.sorted_todo_lists()?;
        Ok(lists
            .iter()
            .map(|list| TodoListSummary {
                id: list.id,
                title: list.title.clone(),
                count_all_todos: list.todos.len(),
                count_done_todos: list.done_count(),
                is_done: self.store.is_done_todo_list(list),
            })
            .collect())
    }

    pub fn list_detail(&self, list_id: ListId) -> ServiceResult<TodoListDetail> {
        let list = self.require_list(list_id)?;
        let todos = self.store.sorted_todos(&list)?;
        Ok(TodoListDetail {
            id: list.id,
            is_done: self.store.is_done_todo_list(&list),
            has_undone_todos: self.store.has_undone_todos(&list),
            title: list.title,
            todos,
        })
    }

    pub fn create_list(&mut self, title: &str) -> ServiceResult<()> {
        let title = normalize_title(title)?;
        if self.store.exists_todo_list_title(title)? || !self.store.create_todo_list(title)? {
            return Err(TodoServiceError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    pub fn rename_list(&mut self, list_id: ListId, title: &str) -> ServiceResult<()> {
        let title = normalize_title(title)?;
        let list = self.require_list(list_id)?;
        if list.title != title && self.store.exists_todo_list_title(title)? {
            return Err(TodoServiceError::DuplicateTitle(title.to_string()));
        }
        if !self.store.set_todo_list_title(list_id, title)? {
            return Err(TodoServiceError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    pub fn delete_list(&mut self, list_id: ListId) -> ServiceResult<()> {
        if !self.store.delete_todo_list(list_id)? {
            return Err(TodoServiceError::ListNotFound(list_id));
        }
        Ok(())
    }

    pub fn complete_list(&mut self, list_id: ListId) -> ServiceResult<()> {
        if !self.store.complete_todo_list(list_id)? {
            return Err(TodoServiceError::ListNotFound(list_id));
        }
        Ok(())
    }

    pub fn add_todo(&mut self, list_id: ListId, title: &str) -> ServiceResult<()> {
        let title = normalize_title(title)?;
        if !self.store.add_todo(list_id, title)? {
            return Err(TodoServiceError::ListNotFound(list_id));
        }
        Ok(())
    }

    /// Flips a todo and returns its new state.
    pub fn toggle_todo(&mut self, list_id: ListId, todo_id: TodoId) -> ServiceResult<Todo> {
        if !self.store.toggle_done_todo(list_id, todo_id)? {
            return Err(TodoServiceError::TodoNotFound { list_id, todo_id });
        }
        self.store
            .load_todo(list_id, todo_id)?
            .ok_or(TodoServiceError::TodoNotFound { list_id, todo_id })
    }

    pub fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> ServiceResult<()> {
        if !self.store.delete_todo(list_id, todo_id)? {
            return Err(TodoServiceError::TodoNotFound { list_id, todo_id });
        }
        Ok(())
    }

    fn require_list(&self, list_id: ListId) -> ServiceResult<TodoList> {
        self.store
            .load_todo_list(list_id)?
            .ok_or(TodoServiceError::ListNotFound(list_id))
    }
}

