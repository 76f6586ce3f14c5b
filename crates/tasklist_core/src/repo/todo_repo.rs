//! To-dos collection.

use crate::model::task_list::TaskListId;
use crate::model::todo::{NewToDo, ToDo, ToDoId};
use crate::repo::{
    bool_to_int, int_to_bool, parse_uuid, DeleteAck, RepoResult, SqliteStore, UpdateAck,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT id, content, is_completed, task_list_id FROM todos";

/// Filters accepted by to-do finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToDoFilter {
    Id(ToDoId),
    /// Items referencing the list, whether or not the list still exists.
    TaskList(TaskListId),
}

/// Partial update for one to-do.
///
/// Only content and completion are patchable; the identifier and the parent
/// reference cannot be expressed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToDoPatch {
    pub content: Option<String>,
    pub is_completed: Option<bool>,
}

impl ToDoPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.is_completed.is_none()
    }
}

/// Data access contract for the to-dos collection.
pub trait ToDoRepository {
    fn find_todos(&self, filter: &ToDoFilter) -> RepoResult<Vec<ToDo>>;
    fn find_one_todo(&self, filter: &ToDoFilter) -> RepoResult<Option<ToDo>>;
    fn insert_todo(&self, todo: &NewToDo) -> RepoResult<ToDoId>;
    fn update_todo(&self, id: ToDoId, patch: &ToDoPatch) -> RepoResult<UpdateAck>;
    fn delete_todo(&self, id: ToDoId) -> RepoResult<DeleteAck>;
}

impl ToDoRepository for SqliteStore {
    fn find_todos(&self, filter: &ToDoFilter) -> RepoResult<Vec<ToDo>> {
        let (clause, value) = todo_filter_clause(filter);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([value])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn find_one_todo(&self, filter: &ToDoFilter) -> RepoResult<Option<ToDo>> {
        let (clause, value) = todo_filter_clause(filter);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC LIMIT 1;"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn insert_todo(&self, todo: &NewToDo) -> RepoResult<ToDoId> {
        let id = Uuid::new_v4();
        self.lock()?.execute(
            "INSERT INTO todos (id, content, is_completed, task_list_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                todo.content.as_str(),
                bool_to_int(todo.is_completed),
                todo.task_list_id.to_string(),
            ],
        )?;
        Ok(id)
    }

    fn update_todo(&self, id: ToDoId, patch: &ToDoPatch) -> RepoResult<UpdateAck> {
        let id_text = id.to_string();
        let conn = self.lock()?;
        let matched: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM todos WHERE id = ?1);",
            [id_text.as_str()],
            |row| row.get(0),
        )?;
        if !matched {
            return Ok(UpdateAck::default());
        }
        if patch.is_empty() {
            return Ok(UpdateAck {
                matched: 1,
                modified: 0,
            });
        }

        let mut assignments = Vec::new();
        let mut differs = Vec::new();
        let mut bind_values: Vec<Value> = vec![Value::Text(id_text)];

        if let Some(content) = patch.content.as_ref() {
            bind_values.push(Value::Text(content.clone()));
            let slot = bind_values.len();
            assignments.push(format!("content = ?{slot}"));
            differs.push(format!("content IS NOT ?{slot}"));
        }
        if let Some(is_completed) = patch.is_completed {
            bind_values.push(Value::Integer(bool_to_int(is_completed)));
            let slot = bind_values.len();
            assignments.push(format!("is_completed = ?{slot}"));
            differs.push(format!("is_completed IS NOT ?{slot}"));
        }

        let sql = format!(
            "UPDATE todos SET {} WHERE id = ?1 AND ({});",
            assignments.join(", "),
            differs.join(" OR ")
        );
        let modified = conn.execute(&sql, params_from_iter(bind_values))?;

        Ok(UpdateAck {
            matched: 1,
            modified: modified as u64,
        })
    }

    fn delete_todo(&self, id: ToDoId) -> RepoResult<DeleteAck> {
        let deleted = self
            .lock()?
            .execute("DELETE FROM todos WHERE id = ?1;", [id.to_string()])?;
        Ok(DeleteAck {
            deleted: deleted as u64,
        })
    }
}

fn todo_filter_clause(filter: &ToDoFilter) -> (&'static str, String) {
    match filter {
        ToDoFilter::Id(id) => ("id = ?1", id.to_string()),
        ToDoFilter::TaskList(task_list_id) => ("task_list_id = ?1", task_list_id.to_string()),
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<ToDo> {
    let id_text: String = row.get("id")?;
    let task_list_text: String = row.get("task_list_id")?;
    Ok(ToDo {
        id: parse_uuid(&id_text, "todos.id")?,
        content: row.get("content")?,
        is_completed: int_to_bool(row.get("is_completed")?, "todos.is_completed")?,
        task_list_id: parse_uuid(&task_list_text, "todos.task_list_id")?,
    })
}
