//! Copy-on-read boundary for in-memory state.
//!
//! # Responsibility
//! - Hand callers values that share no mutable structure with stored state.
//!
//! # Invariants
//! - Mutating a snapshot never changes the value it was taken from.
//! - Stored state is only ever changed by the owning store's write paths.
//!
//! The model types own all their data (`String`, `Vec`), so a structural
//! clone is a full deep copy. Going through this trait keeps every read path
//! of the session backend explicit about where copies are made.

use crate::model::todo::{Todo, TodoList};

/// Detached deep copy of a stored value.
pub trait Snapshot {
    type Owned;

    fn snapshot(&self) -> Self::Owned;
}

impl Snapshot for Todo {
    type Owned = Todo;

    fn snapshot(&self) -> Todo {
        self.clone()
    }
}

impl Snapshot for TodoList {
    type Owned = TodoList;

    fn snapshot(&self) -> TodoList {
        TodoList {
            id: self.id,
            title: self.title.clone(),
            todos: self.todos.snapshot(),
        }
    }
}

impl<T: Snapshot> Snapshot for [T] {
    type Owned = Vec<T::Owned>;

    fn snapshot(&self) -> Vec<T::Owned> {
        self.iter().map(Snapshot::snapshot).collect()
    }
}

impl<T: Snapshot> Snapshot for Vec<T> {
    type Owned = Vec<T::Owned>;

    fn snapshot(&self) -> Vec<T::Owned> {
        self.as_slice().snapshot()
    }
}

impl<T: Snapshot> Snapshot for Option<T> {
    type Owned = Option<T::Owned>;

    fn snapshot(&self) -> Option<T::Owned> {
        self.as_ref().map(Snapshot::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::todo::{Todo, TodoList};

    fn work_list() -> TodoList {
        let mut list = TodoList::new(1, "Work");
        list.todos.push(Todo::new(1, 1, "Email"));
        list.todos.push(Todo::new(2, 1, "Call"));
        list
    }

    #[test]
    fn mutating_a_snapshot_leaves_the_source_untouched() {
        let original = work_list();
        let mut copy = original.snapshot();
        assert_eq!(copy, original);

        copy.title.push_str(" (old)");
        copy.todos[0].done = true;
        copy.todos.pop();

        assert_eq!(original, work_list());
    }

    #[test]
    fn snapshots_cover_empty_and_nested_shapes() {
        let empty = TodoList::new(7, "Empty");
        assert_eq!(empty.snapshot(), empty);

        let lists = vec![work_list(), empty];
        let mut copies = lists.snapshot();
        copies[0].todos.clear();
        assert_eq!(lists[0].todos.len(), 2);

        let none: Option<TodoList> = None;
        assert!(none.snapshot().is_none());
    }
}
