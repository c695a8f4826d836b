//! SQLite-backed todo persistence scoped by username.
//!
//! # Responsibility
//! - Implement `TodoPersistence` with parameterized SQL round-trips.
//! - Keep every statement scoped by `username` so forged ids stay invisible.
//!
//! # Invariants
//! - Each operation opens its own connection and drops it before returning.
//! - Rows are never cached between calls; the database is the owner of record.
//! - No transaction spans more than one operation.
//! - Title uniqueness per user is enforced by `UNIQUE (username, title)` and
//!   detected through affected-row counts, never by overwriting.

use crate::auth::verify_password;
use crate::db::{connect, open_db};
use crate::model::todo::{normalize_title, ListId, Todo, TodoId, TodoList};
use crate::ordering;
use crate::store::{StoreError, StoreResult, TodoPersistence};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::fmt::Arguments;
use std::path::{Path, PathBuf};
use std::thread;

const TODO_SELECT_SQL: &str = "SELECT id, todolist_id, title, done FROM todos";

/// Relational todo store bound to one user.
#[derive(Debug, Clone)]
pub struct SqliteTodoStore {
    db_path: PathBuf,
    username: String,
}

impl SqliteTodoStore {
    /// Prepares the database file and binds the store to `username`.
    ///
    /// Migrations run here once, so later per-call connections find the
    /// schema ready.
    pub fn open(db_path: impl Into<PathBuf>, username: impl Into<String>) -> StoreResult<Self> {
        let db_path = db_path.into();
        drop(open_db(&db_path)?);
        Ok(Self {
            db_path,
            username: username.into(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Provisions a user row. Not part of `TodoPersistence`: accounts are
    /// managed outside the todo workflow.
    ///
    /// Returns `false` when the username already exists.
    pub fn register_user(&self, username: &str, password_hash: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query("insert_user", format_args!("target_user={username}"));
        let changed = conn.execute(
            "INSERT OR IGNORE INTO users (username, password) VALUES (?1, ?2);",
            params![username, password_hash],
        )?;
        Ok(changed > 0)
    }

    fn connect(&self) -> StoreResult<Connection> {
        Ok(connect(&self.db_path)?)
    }

    fn log_query(&self, statement: &str, args: Arguments<'_>) {
        debug!(
            "event=db_query module=store statement={statement} username={} {args}",
            self.username
        );
    }

    fn query_todos(&self, conn: &Connection, list_id: ListId) -> StoreResult<Vec<Todo>> {
        self.log_query("find_todos", format_args!("list_id={list_id}"));
        let mut stmt = conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE todolist_id = ?1
               AND username = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![list_id, self.username])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn query_all_lists(&self) -> StoreResult<Vec<TodoList>> {
        let conn = self.connect()?;
        self.log_query("all_todolists", format_args!(""));
        let mut stmt = conn.prepare(
            "SELECT id, title
             FROM todolists
             WHERE username = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([self.username.as_str()])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(TodoList::new(row.get("id")?, row.get::<_, String>("title")?));
        }
        Ok(lists)
    }

    fn query_all_todos(&self) -> StoreResult<Vec<Todo>> {
        let conn = self.connect()?;
        self.log_query("all_todos", format_args!(""));
        let mut stmt = conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE username = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([self.username.as_str()])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }
}

impl TodoPersistence for SqliteTodoStore {
    fn load_todo_list(&self, list_id: ListId) -> StoreResult<Option<TodoList>> {
        let conn = self.connect()?;
        self.log_query("find_todolist", format_args!("list_id={list_id}"));
        let list = conn
            .query_row(
                "SELECT id, title FROM todolists WHERE id = ?1 AND username = ?2;",
                params![list_id, self.username],
                |row| Ok(TodoList::new(row.get("id")?, row.get::<_, String>("title")?)),
            )
            .optional()?;

        let Some(mut list) = list else {
            return Ok(None);
        };
        list.todos = self.query_todos(&conn, list_id)?;
        Ok(Some(list))
    }

    fn load_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        let conn = self.connect()?;
        self.log_query(
            "find_todo",
            format_args!("list_id={list_id} todo_id={todo_id}"),
        );
        let mut stmt = conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE todolist_id = ?1
               AND id = ?2
               AND username = ?3;"
        ))?;
        let mut rows = stmt.query(params![list_id, todo_id, self.username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }

    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        // Independent reads: each worker owns its own connection.
        let (lists, todos) = thread::scope(|scope| {
            let lists = scope.spawn(|| self.query_all_lists());
            let todos = scope.spawn(|| self.query_all_todos());
            (lists.join(), todos.join())
        });
        let mut lists = lists.map_err(|_| StoreError::Worker("all_todolists"))??;
        let todos = todos.map_err(|_| StoreError::Worker("all_todos"))??;

        let mut by_list: HashMap<ListId, Vec<Todo>> = HashMap::new();
        for todo in todos {
            by_list.entry(todo.todolist_id).or_default().push(todo);
        }
        for list in &mut lists {
            list.todos = by_list.remove(&list.id).unwrap_or_default();
        }
        if !by_list.is_empty() {
            warn!(
                "event=todo_lists_join module=store status=warn username={} orphan_groups={}",
                self.username,
                by_list.len()
            );
        }

        Ok(ordering::sorted_todo_lists(lists))
    }

    fn sorted_todos(&self, list: &TodoList) -> StoreResult<Vec<Todo>> {
        let conn = self.connect()?;
        let todos = self.query_todos(&conn, list.id)?;
        Ok(ordering::sorted_todos(todos))
    }

    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        let Ok(title) = normalize_title(title) else {
            return Ok(false);
        };

        let conn = self.connect()?;
        self.log_query("insert_todolist", format_args!(""));
        // Selecting the owner from `users` makes an unknown user insert nothing
        // instead of tripping the foreign key.
        let changed = conn.execute(
            "INSERT OR IGNORE INTO todolists (title, username)
             SELECT ?1, username
             FROM users
             WHERE username = ?2;",
            params![title, self.username],
        )?;
        Ok(changed > 0)
    }

    fn add_todo(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        let Ok(title) = normalize_title(title) else {
            return Ok(false);
        };

        let conn = self.connect()?;
        self.log_query("insert_todo", format_args!("list_id={list_id}"));
        let changed = conn.execute(
            "INSERT INTO todos (todolist_id, title, username)
             SELECT id, ?2, username
             FROM todolists
             WHERE id = ?1
               AND username = ?3;",
            params![list_id, title, self.username],
        )?;
        Ok(changed > 0)
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query(
            "delete_todo",
            format_args!("list_id={list_id} todo_id={todo_id}"),
        );
        let changed = conn.execute(
            "DELETE FROM todos WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![list_id, todo_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn delete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query("delete_todolist", format_args!("list_id={list_id}"));
        let changed = conn.execute(
            "DELETE FROM todolists WHERE id = ?1 AND username = ?2;",
            params![list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn toggle_done_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query(
            "toggle_done",
            format_args!("list_id={list_id} todo_id={todo_id}"),
        );
        let changed = conn.execute(
            "UPDATE todos
             SET done = 1 - done
             WHERE todolist_id = ?1
               AND id = ?2
               AND username = ?3;",
            params![list_id, todo_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn complete_todo_list(&mut self, list_id: ListId) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query("exists_todolist", format_args!("list_id={list_id}"));
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM todolists WHERE id = ?1 AND username = ?2);",
            params![list_id, self.username],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(false);
        }

        self.log_query("complete_todos", format_args!("list_id={list_id}"));
        conn.execute(
            "UPDATE todos SET done = 1 WHERE todolist_id = ?1 AND username = ?2;",
            params![list_id, self.username],
        )?;
        Ok(true)
    }

    fn set_todo_list_title(&mut self, list_id: ListId, title: &str) -> StoreResult<bool> {
        let Ok(title) = normalize_title(title) else {
            return Ok(false);
        };

        let conn = self.connect()?;
        self.log_query("update_title", format_args!("list_id={list_id}"));
        // OR IGNORE turns a (username, title) collision into zero changed rows.
        let changed = conn.execute(
            "UPDATE OR IGNORE todolists
             SET title = ?1
             WHERE id = ?2
               AND username = ?3;",
            params![title, list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query("exists_title", format_args!(""));
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM todolists WHERE title = ?1 AND username = ?2);",
            params![title, self.username],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        self.log_query("find_password", format_args!("target_user={username}"));
        let stored: Option<String> = conn
            .query_row(
                "SELECT password FROM users WHERE username = ?1;",
                [username],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(hash) => Ok(verify_password(password, &hash)),
            None => Ok(false),
        }
    }
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<Todo> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid done value `{other}` in todos.done"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        todolist_id: row.get("todolist_id")?,
        title: row.get("title")?,
        done,
    })
}
