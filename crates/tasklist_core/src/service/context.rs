//! Request-scoped context: store handle, resolved identity and lookup cache.
//!
//! # Responsibility
//! - Resolve the bearer token of one request into an identity.
//! - Carry the shared store handle explicitly through every operation.
//!
//! # Invariants
//! - A context never outlives the request it was built for.
//! - An invalid token fails context construction; a missing or stale one
//!   yields an anonymous context.

use crate::auth::{bearer_token, CredentialService};
use crate::model::user::{User, UserId};
use crate::repo::{RepoResult, UserFilter, UserRepository};
use crate::service::error::ServiceResult;
use log::{debug, info};
use std::cell::RefCell;
use std::collections::HashMap;

/// Per-request memo of user lookups.
///
/// Users are never modified by the core, so a cached entry cannot go stale
/// within one request.
#[derive(Debug, Default)]
pub struct LookupCache {
    users: RefCell<HashMap<UserId, Option<User>>>,
}

impl LookupCache {
    pub fn cached_users(&self) -> usize {
        self.users.borrow().len()
    }
}

/// Everything one operation needs besides its arguments.
pub struct RequestContext<'s, S: ?Sized> {
    store: &'s S,
    identity: Option<User>,
    cache: Option<LookupCache>,
}

impl<'s, S: ?Sized> RequestContext<'s, S> {
    pub fn anonymous(store: &'s S) -> Self {
        Self {
            store,
            identity: None,
            cache: None,
        }
    }

    pub fn with_identity(store: &'s S, identity: Option<User>) -> Self {
        Self {
            store,
            identity,
            cache: None,
        }
    }

    /// Enables per-request memoization of user lookups.
    pub fn with_lookup_cache(mut self) -> Self {
        self.cache = Some(LookupCache::default());
        self
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    pub fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    pub fn lookup_cache(&self) -> Option<&LookupCache> {
        self.cache.as_ref()
    }
}

impl<'s, S: UserRepository + ?Sized> RequestContext<'s, S> {
    /// Builds the context for one request from its `Authorization` header.
    pub fn from_authorization_header(
        store: &'s S,
        credentials: &CredentialService,
        header: Option<&str>,
    ) -> ServiceResult<Self> {
        let identity = resolve_identity(store, credentials, bearer_token(header))?;
        Ok(Self::with_identity(store, identity))
    }

    /// Looks up one user by id, going through the cache when enabled.
    pub fn find_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let Some(cache) = self.cache.as_ref() else {
            return self.store.find_one_user(&UserFilter::Id(id));
        };

        if let Some(hit) = cache.users.borrow().get(&id) {
            return Ok(hit.clone());
        }
        let loaded = self.store.find_one_user(&UserFilter::Id(id))?;
        cache.users.borrow_mut().insert(id, loaded.clone());
        Ok(loaded)
    }
}

/// Resolves an optional bearer token to a user.
///
/// - no token: `Ok(None)`
/// - invalid, expired or badly signed token: authentication error
/// - valid token naming no existing user: `Ok(None)`
pub fn resolve_identity<S: UserRepository + ?Sized>(
    store: &S,
    credentials: &CredentialService,
    token: Option<&str>,
) -> ServiceResult<Option<User>> {
    let Some(token) = token else {
        return Ok(None);
    };

    let Some(user_id) = credentials.token_subject(token)? else {
        debug!("event=identity_resolve module=service status=anonymous reason=no_subject");
        return Ok(None);
    };

    let user = store.find_one_user(&UserFilter::Id(user_id))?;
    match user.as_ref() {
        Some(user) => debug!(
            "event=identity_resolve module=service status=ok user_id={}",
            user.id
        ),
        None => info!(
            "event=identity_resolve module=service status=anonymous reason=stale_token user_id={user_id}"
        ),
    }
    Ok(user)
}
