//! Relationship resolver for derived and related fields.
//!
//! # Responsibility
//! - Resolve `TaskList.progress`, `TaskList.users`, `TaskList.todos` and
//!   `ToDo.taskList` on demand.
//!
//! # Invariants
//! - Every field is computed fresh from the store on each call; nothing is
//!   stored or shared between fields except the optional user cache.
//! - Dangling references resolve to `None` instead of failing.

use crate::model::task_list::TaskList;
use crate::model::todo::ToDo;
use crate::model::user::User;
use crate::repo::{EntityStore, TaskListFilter, ToDoFilter};
use crate::service::context::RequestContext;
use crate::service::error::ServiceResult;

/// Field resolver bound to one request context.
pub struct Resolver<'c, 's, S: ?Sized> {
    ctx: &'c RequestContext<'s, S>,
}

impl<'c, 's, S: EntityStore + ?Sized> Resolver<'c, 's, S> {
    pub fn new(ctx: &'c RequestContext<'s, S>) -> Self {
        Self { ctx }
    }

    /// Completion percentage of `list` in `0.0..=100.0`.
    pub fn progress(&self, list: &TaskList) -> ServiceResult<f64> {
        let todos = self
            .ctx
            .store()
            .find_todos(&ToDoFilter::TaskList(list.id))?;
        Ok(progress_of(&todos))
    }

    /// Member users in stored member order; unknown ids become `None`.
    pub fn users(&self, list: &TaskList) -> ServiceResult<Vec<Option<User>>> {
        let mut users = Vec::with_capacity(list.user_ids.len());
        for user_id in &list.user_ids {
            users.push(self.ctx.find_user(*user_id)?);
        }
        Ok(users)
    }

    /// All to-dos referencing `list`, in store order.
    pub fn todos(&self, list: &TaskList) -> ServiceResult<Vec<ToDo>> {
        Ok(self
            .ctx
            .store()
            .find_todos(&ToDoFilter::TaskList(list.id))?)
    }

    /// Parent list of `todo`, or `None` when it was deleted.
    pub fn task_list(&self, todo: &ToDo) -> ServiceResult<Option<TaskList>> {
        Ok(self
            .ctx
            .store()
            .find_one_task_list(&TaskListFilter::Id(todo.task_list_id))?)
    }
}

/// `100 * completed / total`, or 0 for an empty list. Not rounded.
pub fn progress_of(todos: &[ToDo]) -> f64 {
    if todos.is_empty() {
        return 0.0;
    }
    let completed = todos.iter().filter(|todo| todo.is_completed).count();
    100.0 * completed as f64 / todos.len() as f64
}
