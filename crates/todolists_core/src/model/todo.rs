//! Todo list domain model.
//!
//! # Responsibility
//! - Define the list/todo tree shared by every persistence backend.
//! - Provide completion predicates used for "done" partitioning.
//! - Validate titles before any backend accepts a write.
//!
//! # Invariants
//! - A list with zero todos is never done.
//! - Titles are non-empty after trimming and at most `MAX_TITLE_CHARS` chars.
//! - `Todo::todolist_id` always names the list that owns the todo.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Numeric todo list identifier, unique within one user's scope.
pub type ListId = i64;

/// Numeric todo identifier, unique within its owning list.
pub type TodoId = i64;

/// Maximum title length in characters for lists and todos.
pub const MAX_TITLE_CHARS: usize = 100;

/// Single task entry inside a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub todolist_id: ListId,
    pub title: String,
    pub done: bool,
}

impl Todo {
    /// Creates a not-done todo owned by `todolist_id`.
    pub fn new(id: TodoId, todolist_id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            todolist_id,
            title: title.into(),
            done: false,
        }
    }
}

/// Named, user-owned ordered collection of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }

    /// Returns true iff the list has at least one todo and all are done.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.done)
    }

    /// Returns true iff at least one todo is not done.
    pub fn has_undone_todos(&self) -> bool {
        self.todos.iter().any(|todo| !todo.done)
    }

    /// Number of todos marked done.
    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.done).count()
    }

    pub fn find_todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    pub fn find_todo_mut(&mut self, todo_id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}

/// Title rejection reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    Empty,
    TooLong { chars: usize, max: usize },
}

impl Display for TitleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "title is required"),
            Self::TooLong { chars, max } => {
                write!(f, "title must be between 1 and {max} characters, got {chars}")
            }
        }
    }
}

impl Error for TitleError {}

/// Validates a list or todo title.
///
/// Length is measured on the trimmed value, in Unicode scalar values.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TitleError::Empty);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_TITLE_CHARS {
        return Err(TitleError::TooLong {
            chars,
            max: MAX_TITLE_CHARS,
        });
    }

    Ok(())
}

/// Validates `title` and returns the trimmed form that gets stored.
pub fn normalize_title(title: &str) -> Result<&str, TitleError> {
    validate_title(title)?;
    Ok(title.trim())
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, validate_title, Todo, TodoList, TitleError, MAX_TITLE_CHARS};

    fn list_with(done_flags: &[bool]) -> TodoList {
        let mut list = TodoList::new(1, "Work");
        for (index, done) in done_flags.iter().enumerate() {
            let mut todo = Todo::new(index as i64 + 1, 1, format!("todo {index}"));
            todo.done = *done;
            list.todos.push(todo);
        }
        list
    }

    #[test]
    fn empty_list_is_never_done() {
        let list = list_with(&[]);
        assert!(!list.is_done());
        assert!(!list.has_undone_todos());
    }

    #[test]
    fn list_is_done_only_when_every_todo_is_done() {
        assert!(!list_with(&[true, false]).is_done());
        assert!(list_with(&[true, true]).is_done());
        assert!(list_with(&[true, false]).has_undone_todos());
        assert_eq!(list_with(&[true, false, true]).done_count(), 2);
    }

    #[test]
    fn validate_title_rejects_blank_and_overlong_titles() {
        assert_eq!(validate_title("   "), Err(TitleError::Empty));
        assert!(validate_title("Groceries").is_ok());

        let exact = "a".repeat(MAX_TITLE_CHARS);
        assert!(validate_title(&exact).is_ok());

        let overlong = "é".repeat(MAX_TITLE_CHARS + 1);
        assert!(matches!(
            validate_title(&overlong),
            Err(TitleError::TooLong { chars, .. }) if chars == MAX_TITLE_CHARS + 1
        ));
    }

    #[test]
    fn normalize_title_trims_before_storage() {
        assert_eq!(normalize_title("  Work \t"), Ok("Work"));
        assert_eq!(normalize_title(" \n "), Err(TitleError::Empty));

        let padded = format!("  {}  ", "a".repeat(MAX_TITLE_CHARS));
        assert_eq!(normalize_title(&padded).unwrap().chars().count(), MAX_TITLE_CHARS);
    }
}
