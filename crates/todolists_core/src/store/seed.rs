//! Default dataset for a freshly created session.

use crate::ids::next_id;
use crate::model::todo::{Todo, TodoList};

const DEFAULT_LISTS: &[(&str, &[(&str, bool)])] = &[
    (
        "Work Todos",
        &[
            ("Get coffee", true),
            ("Chat with co-workers", true),
            ("Duck out of meeting", false),
        ],
    ),
    (
        "Home Todos",
        &[
            ("Feed the cats", true),
            ("Go to bed", true),
            ("Buy milk", true),
            ("Study for Launch School", true),
        ],
    ),
    ("Additional Todos", &[]),
    ("social todos", &[("Go to Libby's birthday party", false)]),
];

/// Builds the default lists with fresh ids from the process id generator.
pub fn default_todo_lists() -> Vec<TodoList> {
    DEFAULT_LISTS
        .iter()
        .map(|(title, todos)| {
            let mut list = TodoList::new(next_id(), *title);
            list.todos = todos
                .iter()
                .map(|(todo_title, done)| {
                    let mut todo = Todo::new(next_id(), list.id, *todo_title);
                    todo.done = *done;
                    todo
                })
                .collect();
            list
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::default_todo_lists;
    use std::collections::HashSet;

    #[test]
    fn every_seed_call_issues_fresh_ids() {
        let first = default_todo_lists();
        let second = default_todo_lists();

        let ids: HashSet<_> = first
            .iter()
            .chain(second.iter())
            .flat_map(|list| std::iter::once(list.id).chain(list.todos.iter().map(|t| t.id)))
            .collect();
        assert_eq!(ids.len(), 2 * (4 + 3 + 4 + 1));
        assert_eq!(first[0].title, second[0].title);
    }

    #[test]
    fn seed_contains_an_empty_and_a_done_list() {
        let lists = default_todo_lists();
        assert!(lists.iter().any(|list| list.todos.is_empty()));
        assert!(lists.iter().any(|list| list.is_done()));
        assert!(lists
            .iter()
            .all(|list| list.todos.iter().all(|todo| todo.todolist_id == list.id)));
    }
}
