//! Domain model for users' todo lists.
//!
//! # Responsibility
//! - Define the list/todo tree returned by every persistence backend.
//!
//! # Invariants
//! - The same shapes are produced by the SQLite and session backends.

pub mod todo;
