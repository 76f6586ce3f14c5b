//! Entity store adapter: uniform CRUD and filtered finds over the three
//! logical collections (users, task lists, to-dos).
//!
//! # Responsibility
//! - Define per-collection data access contracts used by services.
//! - Isolate SQLite query details from authorization and orchestration.
//!
//! # Invariants
//! - Identifiers are generated here on insert and never change afterwards.
//! - Each single-document read or write is atomic; sequences spanning
//!   several calls are not.
//! - The connection lock is held for one store call at most.
//! - Missing documents are `None` / zero acks, never errors.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::task_list::TaskListValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub mod task_list_repo;
pub mod todo_repo;
pub mod user_repo;

pub use task_list_repo::{TaskListFilter, TaskListPatch, TaskListRepository};
pub use todo_repo::{ToDoFilter, ToDoPatch, ToDoRepository};
pub use user_repo::{UserFilter, UserRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for store reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskListValidationError),
    Db(DbError),
    InvalidData(String),
    SchemaNotReady { found: u32, expected: u32 },
    /// A thread panicked while holding the connection lock.
    ConnectionPoisoned(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::SchemaNotReady { found, expected } => write!(
                f,
                "store schema version {found} does not match expected {expected}"
            ),
            Self::ConnectionPoisoned(message) => {
                write!(f, "store connection unavailable: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::SchemaNotReady { .. } | Self::ConnectionPoisoned(_) => None,
        }
    }
}

impl From<TaskListValidationError> for RepoError {
    fn from(value: TaskListValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Logical collection names, used in errors, logs and lookup caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    TaskLists,
    ToDos,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::TaskLists => "task_lists",
            Self::ToDos => "todos",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateAck {
    /// Documents matched by the identifier (0 or 1).
    pub matched: u64,
    /// Documents whose stored state actually changed (0 or 1).
    pub modified: u64,
}

/// Result of a single-document delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteAck {
    /// Documents removed (0 or 1).
    pub deleted: u64,
}

/// Full store contract required by services: all three collections.
pub trait EntityStore: UserRepository + TaskListRepository + ToDoRepository {}

impl<T> EntityStore for T where T: UserRepository + TaskListRepository + ToDoRepository {}

/// SQLite-backed entity store over one shared connection.
///
/// Cloning is cheap and every clone talks to the same connection, so one
/// store can serve requests running on different threads.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Takes ownership of a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Rejects connections whose schema is not at the latest migration.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        Self::from_shared(Arc::new(Mutex::new(conn)))
    }

    /// Wraps a connection that is already shared with other components.
    pub fn from_shared(conn: Arc<Mutex<Connection>>) -> RepoResult<Self> {
        let store = Self { conn };
        let found = current_version(&*store.lock()?)?;
        let expected = latest_version();
        if found != expected {
            return Err(RepoError::SchemaNotReady { found, expected });
        }
        Ok(store)
    }

    pub(crate) fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|err| RepoError::ConnectionPoisoned(err.to_string()))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
