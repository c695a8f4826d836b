//! Canonical display order for lists and todos.
//!
//! # Responsibility
//! - Sort lists and todos identically regardless of backend.
//!
//! # Invariants
//! - Not-done items come before done items.
//! - Within each group titles ascend case-insensitively.
//! - Items with equal keys keep their input order (stable sort).

use crate::model::todo::{Todo, TodoList};
use std::cmp::Ordering;

/// Sort keys shared by lists and todos.
pub trait Completion {
    fn is_complete(&self) -> bool;
    fn sort_title(&self) -> &str;
}

impl Completion for Todo {
    fn is_complete(&self) -> bool {
        self.done
    }

    fn sort_title(&self) -> &str {
        &self.title
    }
}

impl Completion for TodoList {
    fn is_complete(&self) -> bool {
        self.is_done()
    }

    fn sort_title(&self) -> &str {
        &self.title
    }
}

/// Compares two items by completion, then by lowercased title.
pub fn compare_by_completion<T: Completion>(left: &T, right: &T) -> Ordering {
    left.is_complete()
        .cmp(&right.is_complete())
        .then_with(|| {
            left.sort_title()
                .to_lowercase()
                .cmp(&right.sort_title().to_lowercase())
        })
}

/// Sorts items in place by completion and title. Stable.
pub fn sort_by_completion<T: Completion>(items: &mut [T]) {
    items.sort_by(compare_by_completion);
}

/// Returns `todos` in canonical order.
pub fn sorted_todos(mut todos: Vec<Todo>) -> Vec<Todo> {
    sort_by_completion(&mut todos);
    todos
}

/// Returns `lists` in canonical order.
pub fn sorted_todo_lists(mut lists: Vec<TodoList>) -> Vec<TodoList> {
    sort_by_completion(&mut lists);
    lists
}
