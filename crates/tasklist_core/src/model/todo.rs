//! To-do item record.

use crate::model::task_list::TaskListId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned to-do identifier.
pub type ToDoId = Uuid;

/// Persisted to-do item, owned by one task list through `task_list_id`.
///
/// The reference is checked when the item is created, not afterwards: a
/// deleted list leaves its items pointing at nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToDo {
    pub id: ToDoId,
    pub content: String,
    pub is_completed: bool,
    pub task_list_id: TaskListId,
}

/// Insert document for a to-do. The store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToDo {
    pub content: String,
    pub is_completed: bool,
    pub task_list_id: TaskListId,
}

impl NewToDo {
    /// Builds an open (not completed) item under `task_list_id`.
    pub fn new(content: impl Into<String>, task_list_id: TaskListId) -> Self {
        Self {
            content: content.into(),
            is_completed: false,
            task_list_id,
        }
    }
}
