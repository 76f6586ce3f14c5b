//! User account record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned user identifier.
pub type UserId = Uuid;

/// Persisted user account.
///
/// The password hash is kept for credential checks but never serialized,
/// so a `User` can be handed to any outward-facing layer as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across users; uniqueness is enforced by the store.
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// Insert document for a user. The store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}
