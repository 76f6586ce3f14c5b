//! To-do mutations.
//!
//! # Invariants
//! - A to-do can only be created under a list that exists at that moment.
//! - Updates never touch the identifier or the parent reference.
//! - Delete reports `true` whether or not the item existed.

use crate::model::task_list::{TaskList, TaskListId};
use crate::model::todo::{NewToDo, ToDo, ToDoId};
use crate::model::user::User;
use crate::repo::{Collection, EntityStore, TaskListFilter, ToDoFilter, ToDoPatch};
use crate::service::context::RequestContext;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::guard::{AccessPolicy, AuthorizationGuard};
use log::info;

/// To-do use-cases over any entity store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToDoService {
    guard: AuthorizationGuard,
}

impl ToDoService {
    pub fn new(guard: AuthorizationGuard) -> Self {
        Self { guard }
    }

    /// Creates an open to-do under `task_list_id`.
    pub fn create_todo<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        content: &str,
        task_list_id: TaskListId,
    ) -> ServiceResult<ToDo> {
        let caller = self.guard.require_identity(ctx, "createToDo")?;
        let list = ctx
            .store()
            .find_one_task_list(&TaskListFilter::Id(task_list_id))?
            .ok_or(ServiceError::NotFound {
                collection: Collection::TaskLists,
                id: task_list_id,
            })?;
        self.guard.authorize_task_list(caller, &list, "createToDo")?;

        let id = ctx
            .store()
            .insert_todo(&NewToDo::new(content, task_list_id))?;
        info!("event=todo_create module=service status=ok todo_id={id} task_list_id={task_list_id}");

        ctx.store()
            .find_one_todo(&ToDoFilter::Id(id))?
            .ok_or(ServiceError::InconsistentState(
                "created todo not found in read-back",
            ))
    }

    /// Merges the provided fields and returns the current state.
    pub fn update_todo<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        id: ToDoId,
        patch: ToDoPatch,
    ) -> ServiceResult<ToDo> {
        let caller = self.guard.require_identity(ctx, "updateToDo")?;
        let todo = ctx
            .store()
            .find_one_todo(&ToDoFilter::Id(id))?
            .ok_or(ServiceError::NotFound {
                collection: Collection::ToDos,
                id,
            })?;
        self.authorize(ctx, caller, &todo, "updateToDo")?;

        let ack = ctx.store().update_todo(id, &patch)?;
        info!(
            "event=todo_update module=service status=ok todo_id={id} modified={}",
            ack.modified
        );

        ctx.store()
            .find_one_todo(&ToDoFilter::Id(id))?
            .ok_or(ServiceError::NotFound {
                collection: Collection::ToDos,
                id,
            })
    }

    /// Deletes a to-do. Always `true` once the delete was issued.
    pub fn delete_todo<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        id: ToDoId,
    ) -> ServiceResult<bool> {
        let caller = self.guard.require_identity(ctx, "deleteToDo")?;
        if let Some(todo) = ctx.store().find_one_todo(&ToDoFilter::Id(id))? {
            self.authorize(ctx, caller, &todo, "deleteToDo")?;
        }

        let ack = ctx.store().delete_todo(id)?;
        info!(
            "event=todo_delete module=service status=ok todo_id={id} deleted={}",
            ack.deleted
        );
        Ok(true)
    }

    fn authorize<S: EntityStore + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        caller: &User,
        todo: &ToDo,
        operation: &'static str,
    ) -> ServiceResult<()> {
        if self.guard.policy() == AccessPolicy::Authenticated {
            return Ok(());
        }
        let parent: Option<TaskList> = ctx
            .store()
            .find_one_task_list(&TaskListFilter::Id(todo.task_list_id))?;
        self.guard
            .authorize_todo_parent(caller, parent.as_ref(), todo.id, operation)
    }
}
