//! Sign-up and sign-in use-cases.
//!
//! # Invariants
//! - Passwords are hashed before they reach the store.
//! - Sign-in failures are indistinguishable to the caller, in value and in
//!   the number of password verifications performed.
//! - Duplicate emails are rejected by the store constraint, not pre-checked.

use crate::auth::CredentialService;
use crate::model::user::{NewUser, User};
use crate::repo::{UserFilter, UserRepository};
use crate::service::context::RequestContext;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Sign-up request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpInput {
    pub email: String,
    pub name: String,
    pub password: String,
    pub avatar: Option<String>,
}

/// Sign-in request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Authenticated user plus a fresh bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// Account use-cases. Both are open to anonymous callers.
pub struct AccountService<'cred> {
    credentials: &'cred CredentialService,
}

impl<'cred> AccountService<'cred> {
    pub fn new(credentials: &'cred CredentialService) -> Self {
        Self { credentials }
    }

    /// Creates a user and signs them in.
    pub fn sign_up<S: UserRepository + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        input: SignUpInput,
    ) -> ServiceResult<AuthPayload> {
        let password_hash = self.credentials.hash_password(&input.password)?;
        let new_user = NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            avatar: input.avatar,
        };

        let user_id = ctx.store().insert_user(&new_user)?;
        let user = ctx
            .store()
            .find_one_user(&UserFilter::Id(user_id))?
            .ok_or(ServiceError::InconsistentState(
                "created user not found in read-back",
            ))?;

        info!("event=sign_up module=service status=ok user_id={}", user.id);
        let token = self.credentials.issue_token(&user)?;
        Ok(AuthPayload { user, token })
    }

    /// Verifies email and password and issues a new token.
    pub fn sign_in<S: UserRepository + ?Sized>(
        &self,
        ctx: &RequestContext<'_, S>,
        input: SignInInput,
    ) -> ServiceResult<AuthPayload> {
        let Some(user) = ctx
            .store()
            .find_one_user(&UserFilter::Email(input.email))?
        else {
            self.credentials.verify_against_decoy(&input.password);
            warn!("event=sign_in module=service status=rejected");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self
            .credentials
            .verify_password(&input.password, &user.password_hash)
        {
            warn!("event=sign_in module=service status=rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        info!("event=sign_in module=service status=ok user_id={}", user.id);
        let token = self.credentials.issue_token(&user)?;
        Ok(AuthPayload { user, token })
    }
}
