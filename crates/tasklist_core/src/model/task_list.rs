//! Shared task list record.
//!
//! # Invariants
//! - `user_ids` is never empty once a list is created; the first entry is
//!   the creator.
//! - `user_ids` has set semantics: an id appears at most once.
//! - `progress` is derived on read and never stored here.

use crate::model::user::UserId;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned task list identifier.
pub type TaskListId = Uuid;

/// Persisted task list with its ordered member set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: TaskListId,
    pub title: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub created_at: String,
    /// Member ids in stored order.
    pub user_ids: Vec<UserId>,
}

impl TaskList {
    /// Returns whether `user_id` is part of the member set.
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.user_ids.contains(&user_id)
    }
}

/// Insert document for a task list. The store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskList {
    pub title: String,
    pub created_at: String,
    pub user_ids: Vec<UserId>,
}

impl NewTaskList {
    /// Builds a list created now whose only member is `creator`.
    pub fn created_by(title: impl Into<String>, creator: UserId) -> Self {
        Self {
            title: title.into(),
            created_at: timestamp_now(),
            user_ids: vec![creator],
        }
    }

    /// Validates member-set invariants before persistence.
    pub fn validate(&self) -> Result<(), TaskListValidationError> {
        if self.user_ids.is_empty() {
            return Err(TaskListValidationError::EmptyMemberSet);
        }

        for (index, user_id) in self.user_ids.iter().enumerate() {
            if self.user_ids[..index].contains(user_id) {
                return Err(TaskListValidationError::DuplicateMember(*user_id));
            }
        }

        Ok(())
    }
}

/// Validation failures for task list insert documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListValidationError {
    EmptyMemberSet,
    DuplicateMember(UserId),
}

impl Display for TaskListValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMemberSet => write!(f, "task list must have at least one member"),
            Self::DuplicateMember(id) => write!(f, "task list member listed twice: {id}"),
        }
    }
}

impl Error for TaskListValidationError {}

/// Current UTC time in the `createdAt` wire format, e.g.
/// `2026-01-02T03:04:05.678Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
