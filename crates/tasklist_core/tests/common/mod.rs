//! Shared fixtures for integration tests.
//!
//! Every test opens its own in-memory store, so tests never share state.

// Not every test file uses every helper.
#![allow(dead_code)]

use tasklist_core::{
    AccountService, AuthPayload, CredentialService, PasswordSettings, RequestContext, SignUpInput,
    User, UserRepository,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Credentials with the cheapest valid Argon2 parameters.
pub fn credentials() -> CredentialService {
    CredentialService::new(
        TEST_SECRET,
        PasswordSettings {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        },
    )
    .unwrap()
}

pub fn password_for(name: &str) -> String {
    format!("{name}-correct-horse")
}

pub fn email_for(name: &str) -> String {
    format!("{name}@example.com")
}

/// Signs up `name` with predictable email and password.
pub fn sign_up<S: UserRepository + ?Sized>(
    store: &S,
    credentials: &CredentialService,
    name: &str,
) -> AuthPayload {
    let ctx = RequestContext::anonymous(store);
    AccountService::new(credentials)
        .sign_up(
            &ctx,
            SignUpInput {
                email: email_for(name),
                name: name.to_string(),
                password: password_for(name),
                avatar: None,
            },
        )
        .unwrap()
}

/// Context acting as `user`.
pub fn as_user<'s, S: ?Sized>(store: &'s S, user: &User) -> RequestContext<'s, S> {
    RequestContext::with_identity(store, Some(user.clone()))
}
