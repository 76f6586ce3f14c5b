//! Core domain logic for the shared task-list service.
//! This crate is the single source of truth for access rules, entity
//! relationships and derived fields.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{CredentialError, CredentialService, PasswordSettings};
pub use config::{ConfigError, ServiceConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::task_list::{NewTaskList, TaskList, TaskListId};
pub use model::todo::{NewToDo, ToDo, ToDoId};
pub use model::user::{NewUser, User, UserId};
pub use repo::{
    Collection, DeleteAck, EntityStore, RepoError, RepoResult, SqliteStore, TaskListFilter,
    TaskListPatch, TaskListRepository, ToDoFilter, ToDoPatch, ToDoRepository, UpdateAck,
    UserFilter, UserRepository,
};
pub use service::account_service::{AccountService, AuthPayload, SignInInput, SignUpInput};
pub use service::context::{resolve_identity, RequestContext};
pub use service::error::{parse_id, AuthFailure, ServiceError, ServiceResult};
pub use service::guard::{AccessPolicy, AuthorizationGuard};
pub use service::resolver::{progress_of, Resolver};
pub use service::task_list_service::TaskListService;
pub use service::todo_service::ToDoService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
