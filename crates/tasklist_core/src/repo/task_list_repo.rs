//! Task lists collection, including the ordered member set.
//!
//! # Invariants
//! - A list row and its member rows are written in one transaction, so a
//!   list is never observable without its creator.
//! - Member order is the `position` order; appends go to the end.
//! - Deleting a list removes its member rows but not its to-dos.

use crate::model::task_list::{NewTaskList, TaskList, TaskListId};
use crate::model::user::UserId;
use crate::repo::{parse_uuid, DeleteAck, RepoResult, SqliteStore, UpdateAck};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_LIST_SELECT_SQL: &str = "SELECT id, title, created_at FROM task_lists";

/// Filters accepted by task list finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskListFilter {
    Id(TaskListId),
    /// Lists whose member set contains the user.
    Member(UserId),
}

/// Partial update for one task list.
///
/// `title` overwrites; `add_member` appends to the member set unless the id
/// is already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListPatch {
    pub title: Option<String>,
    pub add_member: Option<UserId>,
}

/// Data access contract for the task lists collection.
pub trait TaskListRepository {
    fn find_task_lists(&self, filter: &TaskListFilter) -> RepoResult<Vec<TaskList>>;
    fn find_one_task_list(&self, filter: &TaskListFilter) -> RepoResult<Option<TaskList>>;
    fn insert_task_list(&self, list: &NewTaskList) -> RepoResult<TaskListId>;
    fn update_task_list(&self, id: TaskListId, patch: &TaskListPatch) -> RepoResult<UpdateAck>;
    fn delete_task_list(&self, id: TaskListId) -> RepoResult<DeleteAck>;
}

impl TaskListRepository for SqliteStore {
    fn find_task_lists(&self, filter: &TaskListFilter) -> RepoResult<Vec<TaskList>> {
        let (clause, value) = task_list_filter_clause(filter);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_LIST_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([value])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_task_list_row(&conn, row)?);
        }
        Ok(lists)
    }

    fn find_one_task_list(&self, filter: &TaskListFilter) -> RepoResult<Option<TaskList>> {
        let (clause, value) = task_list_filter_clause(filter);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_LIST_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_list_row(&conn, row)?));
        }
        Ok(None)
    }

    fn insert_task_list(&self, list: &NewTaskList) -> RepoResult<TaskListId> {
        list.validate()?;

        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO task_lists (id, title, created_at) VALUES (?1, ?2, ?3);",
            params![id_text, list.title.as_str(), list.created_at.as_str()],
        )?;
        for (position, user_id) in list.user_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO task_list_members (task_list_id, user_id, position)
                 VALUES (?1, ?2, ?3);",
                params![id_text, user_id.to_string(), position as i64],
            )?;
        }
        tx.commit()?;

        Ok(id)
    }

    fn update_task_list(&self, id: TaskListId, patch: &TaskListPatch) -> RepoResult<UpdateAck> {
        let id_text = id.to_string();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let matched: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM task_lists WHERE id = ?1);",
            [id_text.as_str()],
            |row| row.get(0),
        )?;
        if !matched {
            return Ok(UpdateAck::default());
        }

        let mut changed = 0;
        if let Some(title) = patch.title.as_deref() {
            changed += tx.execute(
                "UPDATE task_lists SET title = ?2 WHERE id = ?1 AND title IS NOT ?2;",
                params![id_text, title],
            )?;
        }
        if let Some(user_id) = patch.add_member {
            changed += tx.execute(
                "INSERT OR IGNORE INTO task_list_members (task_list_id, user_id, position)
                 SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
                 FROM task_list_members
                 WHERE task_list_id = ?1;",
                params![id_text, user_id.to_string()],
            )?;
        }
        tx.commit()?;

        Ok(UpdateAck {
            matched: 1,
            modified: u64::from(changed > 0),
        })
    }

    fn delete_task_list(&self, id: TaskListId) -> RepoResult<DeleteAck> {
        let deleted = self
            .lock()?
            .execute("DELETE FROM task_lists WHERE id = ?1;", [id.to_string()])?;
        Ok(DeleteAck {
            deleted: deleted as u64,
        })
    }
}

fn task_list_filter_clause(filter: &TaskListFilter) -> (&'static str, String) {
    match filter {
        TaskListFilter::Id(id) => ("id = ?1", id.to_string()),
        TaskListFilter::Member(user_id) => (
            "EXISTS (
                SELECT 1
                FROM task_list_members m
                WHERE m.task_list_id = task_lists.id
                  AND m.user_id = ?1
            )",
            user_id.to_string(),
        ),
    }
}

fn parse_task_list_row(conn: &Connection, row: &Row<'_>) -> RepoResult<TaskList> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "task_lists.id")?;
    Ok(TaskList {
        id,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        user_ids: load_member_ids(conn, &id_text)?,
    })
}

fn load_member_ids(conn: &Connection, task_list_id: &str) -> RepoResult<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT user_id
         FROM task_list_members
         WHERE task_list_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([task_list_id])?;
    let mut member_ids = Vec::new();
    while let Some(row) = rows.next()? {
        let user_id: String = row.get(0)?;
        member_ids.push(parse_uuid(&user_id, "task_list_members.user_id")?);
    }
    Ok(member_ids)
}
