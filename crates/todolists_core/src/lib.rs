//! Core persistence logic for multi-user todo lists.
//! This crate is the single source of truth for list/todo invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod service;
pub mod snapshot;
pub mod store;

pub use config::{Backend, ConfigError, Profile, StoreConfig};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LogSettings, LoggingError,
};
pub use model::todo::{
    normalize_title, validate_title, ListId, TitleError, Todo, TodoId, TodoList,
};
pub use service::todo_service::{
    TodoListDetail, TodoListSummary, TodoService, TodoServiceError,
};
pub use snapshot::Snapshot;
pub use store::session_store::{SessionId, SessionStore, SessionTodoStore};
pub use store::sqlite_store::SqliteTodoStore;
pub use store::{StoreError, StoreResult, TodoPersistence};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
