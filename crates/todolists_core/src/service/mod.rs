//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate persistence calls into use-case level APIs.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod todo_service;
