//! Core use-case services.
//!
//! # Responsibility
//! - Thread a request-scoped context (store + identity) through every
//!   query and mutation.
//! - Keep callers decoupled from storage and credential details.

pub mod account_service;
pub mod context;
pub mod error;
pub mod guard;
pub mod resolver;
pub mod task_list_service;
pub mod todo_service;
