//! Credential service: password hashing and signed identity tokens.
//!
//! # Responsibility
//! - Hash and verify passwords (Argon2id, PHC strings).
//! - Issue and validate HS256 bearer tokens carrying a user id.
//!
//! # Invariants
//! - Every hash uses a fresh random salt.
//! - Tokens expire 30 days after issue.
//! - Passwords, hashes and tokens never appear in log events.
//! - A sign-in for an unknown email costs the same single verification as
//!   one with a wrong password.

use crate::model::user::{User, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod password;
pub mod token;

pub use password::{Argon2Hasher, PasswordSettings};
pub use token::{bearer_token, TokenClaims, TokenIssuer, TOKEN_VALIDITY_DAYS};

pub type CredentialResult<T> = Result<T, CredentialError>;

const DECOY_PASSWORD: &str = "tasklist-decoy-password";

/// Errors raised by hashing and token primitives.
#[derive(Debug)]
pub enum CredentialError {
    /// Argon2 cost parameters or token secret are unusable.
    InvalidSettings(String),
    /// Salt generation or hashing failed.
    Hashing(String),
    /// Token failed signature, expiry or shape checks.
    InvalidToken(String),
    /// Token could not be signed.
    TokenEncoding(jsonwebtoken::errors::Error),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSettings(message) => write!(f, "invalid credential settings: {message}"),
            Self::Hashing(message) => write!(f, "password hashing failed: {message}"),
            Self::InvalidToken(message) => write!(f, "invalid token: {message}"),
            Self::TokenEncoding(err) => write!(f, "token signing failed: {err}"),
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TokenEncoding(err) => Some(err),
            _ => None,
        }
    }
}

/// Process-wide credential primitives, built once from configuration.
pub struct CredentialService {
    passwords: Argon2Hasher,
    tokens: TokenIssuer,
    /// Hashed with the configured cost at startup; never matches a user.
    decoy_hash: String,
}

impl CredentialService {
    pub fn new(token_secret: &[u8], password_settings: PasswordSettings) -> CredentialResult<Self> {
        let passwords = Argon2Hasher::new(password_settings)?;
        let decoy_hash = passwords.hash(DECOY_PASSWORD)?;
        Ok(Self {
            passwords,
            tokens: TokenIssuer::new(token_secret)?,
            decoy_hash,
        })
    }

    pub fn hash_password(&self, plain: &str) -> CredentialResult<String> {
        self.passwords.hash(plain)
    }

    pub fn verify_password(&self, plain: &str, hash: &str) -> bool {
        self.passwords.verify(plain, hash)
    }

    /// Runs one full verification against the decoy hash and discards the
    /// outcome. Used when a sign-in names no user.
    pub fn verify_against_decoy(&self, plain: &str) {
        let _ = self.passwords.verify(plain, &self.decoy_hash);
    }

    /// Issues a token for `user`, valid for 30 days from now.
    pub fn issue_token(&self, user: &User) -> CredentialResult<String> {
        self.tokens.issue(user.id)
    }

    /// Validates `token` and returns the user id it carries.
    ///
    /// `Ok(None)` means the token is valid but names no user.
    pub fn token_subject(&self, token: &str) -> CredentialResult<Option<UserId>> {
        self.tokens.subject(token)
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}
