//! Authorization guard.
//!
//! # Responsibility
//! - Gate every operation except sign-up/sign-in on an authenticated identity.
//! - Apply the configured membership policy to task lists and their to-dos.
//!
//! # Invariants
//! - Checks run in order: identity, authentication, membership.
//! - The guard never touches the store; callers load the target first.

use crate::model::task_list::TaskList;
use crate::model::user::User;
use crate::repo::Collection;
use crate::service::context::RequestContext;
use crate::service::error::{ServiceError, ServiceResult};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which identities may act on an existing task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Any authenticated identity. Matches the historical behavior, where
    /// fetching or mutating a list did not check membership.
    #[default]
    Authenticated,
    /// Only members of the list (for to-dos: of the parent list).
    MemberScoped,
}

impl AccessPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::MemberScoped => "member",
        }
    }
}

/// Unknown policy name in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAccessPolicy(pub String);

impl Display for UnknownAccessPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown access policy `{}`; expected authenticated|member",
            self.0
        )
    }
}

impl Error for UnknownAccessPolicy {}

impl FromStr for AccessPolicy {
    type Err = UnknownAccessPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "authenticated" => Ok(Self::Authenticated),
            "member" | "member_scoped" => Ok(Self::MemberScoped),
            other => Err(UnknownAccessPolicy(other.to_string())),
        }
    }
}

/// Stateless policy evaluator shared by the list and to-do services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationGuard {
    policy: AccessPolicy,
}

impl AuthorizationGuard {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Returns the caller or fails with an authentication error.
    pub fn require_identity<'c, S: ?Sized>(
        &self,
        ctx: &'c RequestContext<'_, S>,
        operation: &'static str,
    ) -> ServiceResult<&'c User> {
        ctx.identity().ok_or_else(|| {
            warn!("event=access_denied module=guard operation={operation} reason=anonymous");
            ServiceError::unauthenticated()
        })
    }

    /// Checks that `caller` may act on `list` under the active policy.
    pub fn authorize_task_list(
        &self,
        caller: &User,
        list: &TaskList,
        operation: &'static str,
    ) -> ServiceResult<()> {
        match self.policy {
            AccessPolicy::Authenticated => Ok(()),
            AccessPolicy::MemberScoped if list.is_member(caller.id) => Ok(()),
            AccessPolicy::MemberScoped => {
                warn!(
                    "event=access_denied module=guard operation={operation} reason=not_member user_id={} task_list_id={}",
                    caller.id, list.id
                );
                Err(ServiceError::Forbidden {
                    collection: Collection::TaskLists,
                    id: list.id,
                })
            }
        }
    }

    /// Like [`Self::authorize_task_list`] for a to-do whose parent list may
    /// be gone. Orphaned to-dos have no members, so only the permissive
    /// policy lets anyone act on them.
    pub fn authorize_todo_parent(
        &self,
        caller: &User,
        parent: Option<&TaskList>,
        todo_id: uuid::Uuid,
        operation: &'static str,
    ) -> ServiceResult<()> {
        match (self.policy, parent) {
            (AccessPolicy::Authenticated, _) => Ok(()),
            (AccessPolicy::MemberScoped, Some(list)) => {
                self.authorize_task_list(caller, list, operation)
            }
            (AccessPolicy::MemberScoped, None) => {
                warn!(
                    "event=access_denied module=guard operation={operation} reason=orphaned_todo user_id={} todo_id={todo_id}",
                    caller.id
                );
                Err(ServiceError::Forbidden {
                    collection: Collection::ToDos,
                    id: todo_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessPolicy, AuthorizationGuard};
    use crate::model::task_list::TaskList;
    use crate::model::user::User;
    use crate::repo::Collection;
    use crate::service::context::RequestContext;
    use crate::service::error::ServiceError;
    use uuid::Uuid;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: String::new(),
            avatar: None,
        }
    }

    fn list_of(members: &[&User]) -> TaskList {
        TaskList {
            id: Uuid::new_v4(),
            title: "Groceries".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            user_ids: members.iter().map(|member| member.id).collect(),
        }
    }

    #[test]
    fn anonymous_context_fails_identity_requirement() {
        let guard = AuthorizationGuard::default();
        let ctx = RequestContext::<()>::anonymous(&());
        assert_eq!(
            guard.require_identity(&ctx, "myTaskLists").err(),
            Some(ServiceError::unauthenticated())
        );
    }

    #[test]
    fn authenticated_policy_ignores_membership() {
        let guard = AuthorizationGuard::new(AccessPolicy::Authenticated);
        let owner = user("alice");
        let stranger = user("mallory");
        let list = list_of(&[&owner]);

        assert!(guard.authorize_task_list(&stranger, &list, "getTaskList").is_ok());
        assert!(guard
            .authorize_todo_parent(&stranger, None, Uuid::new_v4(), "deleteToDo")
            .is_ok());
    }

    #[test]
    fn member_scoped_policy_rejects_non_members() {
        let guard = AuthorizationGuard::new(AccessPolicy::MemberScoped);
        let owner = user("alice");
        let stranger = user("mallory");
        let list = list_of(&[&owner]);

        assert!(guard.authorize_task_list(&owner, &list, "getTaskList").is_ok());
        assert_eq!(
            guard
                .authorize_task_list(&stranger, &list, "getTaskList")
                .err(),
            Some(ServiceError::Forbidden {
                collection: Collection::TaskLists,
                id: list.id,
            })
        );

        let orphan = Uuid::new_v4();
        assert_eq!(
            guard
                .authorize_todo_parent(&owner, None, orphan, "updateToDo")
                .err(),
            Some(ServiceError::Forbidden {
                collection: Collection::ToDos,
                id: orphan,
            })
        );
    }

    #[test]
    fn policy_parses_from_config_values() {
        assert_eq!(
            "Authenticated".parse::<AccessPolicy>(),
            Ok(AccessPolicy::Authenticated)
        );
        assert_eq!("member".parse::<AccessPolicy>(), Ok(AccessPolicy::MemberScoped));
        assert!("owner".parse::<AccessPolicy>().is_err());
    }
}
