//! Domain model for users, shared task lists and their to-dos.
//!
//! # Responsibility
//! - Define canonical records exchanged between store, resolver and services.
//! - Keep relationships as identifier references, never embedded documents.
//!
//! # Invariants
//! - Every entity carries exactly one canonical `id`, assigned by the store.
//! - Identifiers are immutable once assigned.

pub mod task_list;
pub mod todo;
pub mod user;
