//! Service-level error taxonomy.

use crate::auth::CredentialError;
use crate::repo::{Collection, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Why an operation could not be tied to an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// No identity on the request (anonymous or stale token).
    MissingIdentity,
    /// A token was supplied but failed validation.
    InvalidToken(String),
}

/// Errors surfaced by queries and mutations.
///
/// Not-found outcomes on read and delete paths are `None`/`false`, not
/// errors; `NotFound` is only used where the operation must return an
/// entity.
#[derive(Debug)]
pub enum ServiceError {
    Authentication(AuthFailure),
    /// Same value for unknown email and wrong password.
    InvalidCredentials,
    /// Caller is authenticated but not a member of the target list.
    Forbidden { collection: Collection, id: Uuid },
    NotFound { collection: Collection, id: Uuid },
    InvalidId(String),
    Credential(CredentialError),
    Repo(RepoError),
    /// A write succeeded but its read-back came back empty.
    InconsistentState(&'static str),
}

impl ServiceError {
    pub fn unauthenticated() -> Self {
        Self::Authentication(AuthFailure::MissingIdentity)
    }
}

impl PartialEq for ServiceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Authentication(left), Self::Authentication(right)) => left == right,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (
                Self::Forbidden {
                    collection: lc,
                    id: li,
                },
                Self::Forbidden {
                    collection: rc,
                    id: ri,
                },
            )
            | (
                Self::NotFound {
                    collection: lc,
                    id: li,
                },
                Self::NotFound {
                    collection: rc,
                    id: ri,
                },
            ) => lc == rc && li == ri,
            (Self::InvalidId(left), Self::InvalidId(right)) => left == right,
            (Self::InconsistentState(left), Self::InconsistentState(right)) => left == right,
            _ => false,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication(AuthFailure::MissingIdentity) => {
                write!(f, "Authentication Error. Please sign in")
            }
            Self::Authentication(AuthFailure::InvalidToken(reason)) => {
                write!(f, "Authentication Error. Invalid token: {reason}")
            }
            Self::InvalidCredentials => write!(f, "Invalid credentials!"),
            Self::Forbidden { collection, id } => {
                write!(f, "access denied to {collection} entry {id}")
            }
            Self::NotFound { collection, id } => write!(f, "{collection} entry not found: {id}"),
            Self::InvalidId(value) => write!(f, "invalid identifier: `{value}`"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Credential(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        match value {
            CredentialError::InvalidToken(reason) => {
                Self::Authentication(AuthFailure::InvalidToken(reason))
            }
            other => Self::Credential(other),
        }
    }
}

/// Parses a transport-level identifier string.
pub fn parse_id(value: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| ServiceError::InvalidId(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_id, AuthFailure, ServiceError};
    use crate::auth::CredentialError;
    use uuid::Uuid;

    #[test]
    fn authentication_and_credential_messages_are_stable() {
        assert_eq!(
            ServiceError::unauthenticated().to_string(),
            "Authentication Error. Please sign in"
        );
        assert_eq!(
            ServiceError::InvalidCredentials.to_string(),
            "Invalid credentials!"
        );
    }

    #[test]
    fn invalid_token_maps_to_authentication_error() {
        let err = ServiceError::from(CredentialError::InvalidToken("ExpiredSignature".into()));
        assert_eq!(
            err,
            ServiceError::Authentication(AuthFailure::InvalidToken("ExpiredSignature".into()))
        );
    }

    #[test]
    fn parse_id_accepts_uuid_and_rejects_garbage() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).expect("valid id"), id);
        assert_eq!(
            parse_id("42").expect_err("garbage id"),
            ServiceError::InvalidId("42".to_string())
        );
    }
}
