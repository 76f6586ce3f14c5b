//! Task list queries and mutations.
//!
//! # Responsibility
//! - Gate each operation through the authorization guard.
//! - Apply one change document and return the re-fetched post-state.
//!
//! # Invariants
//! - The value returned by a mutation always comes from a read issued after
//!   the write, never from the write result.
//! - A missing list is `None`/`false` for get, add-member and delete.

use crate::model::task_list::{NewTaskList, TaskList, TaskListId};
use crate::model::user::UserId;
use crate::repo::{Collection, EntityStore, TaskListFilter, TaskListPatch};
use crate::service::context::RequestContext;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::guard::AuthorizationGuard;
use log::info;

/// Task list use-cases over any entity store.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListService {
    guard: AuthorizationGuard,
}

impl TaskListService {
    pub fn new(guard: AuthorizationGuard) -> Self {
        Self { guard }
    }

    /// Lists whose member set contains the caller.
    pub fn my_task_lists<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
    ) -> ServiceResult<Vec<TaskList>> {
        let caller = self.guard.require_identity(ctx, "myTaskLists")?;
        Ok(ctx
            .store()
            .find_task_lists(&TaskListFilter::Member(caller.id))?)
    }

    /// One list by id, `None` when it does not exist.
    pub fn get_task_list<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        id: TaskListId,
    ) -> ServiceResult<Option<TaskList>> {
        let caller = self.guard.require_identity(ctx, "getTaskList")?;
        let Some(list) = ctx.store().find_one_task_list(&TaskListFilter::Id(id))? else {
            return Ok(None);
        };
        self.guard.authorize_task_list(caller, &list, "getTaskList")?;
        Ok(Some(list))
    }

    /// Creates a list owned by the caller alone.
    pub fn create_task_list<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        title: &str,
    ) -> ServiceResult<TaskList> {
        let caller = self.guard.require_identity(ctx, "createTaskList")?;
        let id = ctx
            .store()
            .insert_task_list(&NewTaskList::created_by(title, caller.id))?;

        info!(
            "event=task_list_create module=service status=ok task_list_id={id} user_id={}",
            caller.id
        );
        ctx.store()
            .find_one_task_list(&TaskListFilter::Id(id))?
            .ok_or(ServiceError::InconsistentState(
                "created task list not found in read-back",
            ))
    }

    /// Renames a list and returns its current state.
    pub fn update_task_list<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        id: TaskListId,
        title: &str,
    ) -> ServiceResult<TaskList> {
        let caller = self.guard.require_identity(ctx, "updateTaskList")?;
        let list = self.load_existing(ctx, id)?;
        self.guard
            .authorize_task_list(caller, &list, "updateTaskList")?;

        let patch = TaskListPatch {
            title: Some(title.to_string()),
            add_member: None,
        };
        let ack = ctx.store().update_task_list(id, &patch)?;
        info!(
            "event=task_list_update module=service status=ok task_list_id={id} modified={}",
            ack.modified
        );

        ctx.store()
            .find_one_task_list(&TaskListFilter::Id(id))?
            .ok_or(ServiceError::NotFound {
                collection: Collection::TaskLists,
                id,
            })
    }

    /// Deletes a list. Its to-dos stay behind with a dangling reference.
    ///
    /// Returns whether a list was actually removed.
    pub fn delete_task_list<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        id: TaskListId,
    ) -> ServiceResult<bool> {
        let caller = self.guard.require_identity(ctx, "deleteTaskList")?;
        if let Some(list) = ctx.store().find_one_task_list(&TaskListFilter::Id(id))? {
            self.guard
                .authorize_task_list(caller, &list, "deleteTaskList")?;
        }

        let ack = ctx.store().delete_task_list(id)?;
        info!(
            "event=task_list_delete module=service status=ok task_list_id={id} deleted={}",
            ack.deleted
        );
        Ok(ack.deleted > 0)
    }

    /// Adds `user_id` to the member set. Idempotent.
    ///
    /// `user_id` is not checked against the users collection; an unknown id
    /// later resolves to a `None` member.
    pub fn add_user_to_task_list<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        task_list_id: TaskListId,
        user_id: UserId,
    ) -> ServiceResult<Option<TaskList>> {
        let caller = self.guard.require_identity(ctx, "addUserToTaskList")?;
        let Some(list) = ctx
            .store()
            .find_one_task_list(&TaskListFilter::Id(task_list_id))?
        else {
            return Ok(None);
        };
        self.guard
            .authorize_task_list(caller, &list, "addUserToTaskList")?;

        if list.is_member(user_id) {
            return Ok(Some(list));
        }

        let patch = TaskListPatch {
            title: None,
            add_member: Some(user_id),
        };
        ctx.store().update_task_list(task_list_id, &patch)?;
        info!(
            "event=task_list_add_member module=service status=ok task_list_id={task_list_id} member_id={user_id}"
        );

        Ok(ctx
            .store()
            .find_one_task_list(&TaskListFilter::Id(task_list_id))?)
    }

    fn load_existing<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        id: TaskListId,
    ) -> ServiceResult<TaskList> {
        ctx.store()
            .find_one_task_list(&TaskListFilter::Id(id))?
            .ok_or(ServiceError::NotFound {
                collection: Collection::TaskLists,
                id,
            })
    }
}
