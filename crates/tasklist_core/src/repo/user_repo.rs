//! Users collection.
//!
//! Users are created by sign-up and never updated or deleted by the core,
//! so the contract is find + insert only.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::{parse_uuid, RepoResult, SqliteStore};
use rusqlite::{params, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT id, name, email, password_hash, avatar FROM users";

/// Filters accepted by user finds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(UserId),
    /// Exact, case-sensitive email match.
    Email(String),
}

/// Data access contract for the users collection.
pub trait UserRepository {
    fn find_users(&self, filter: &UserFilter) -> RepoResult<Vec<User>>;
    fn find_one_user(&self, filter: &UserFilter) -> RepoResult<Option<User>>;
    /// Inserts a user and returns the store-assigned id.
    ///
    /// Fails with a store error when the email is already taken.
    fn insert_user(&self, user: &NewUser) -> RepoResult<UserId>;
}

impl UserRepository for SqliteStore {
    fn find_users(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        let (clause, value) = user_filter_clause(filter);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([value])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn find_one_user(&self, filter: &UserFilter) -> RepoResult<Option<User>> {
        let (clause, value) = user_filter_clause(filter);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE {clause} ORDER BY rowid ASC LIMIT 1;"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn insert_user(&self, user: &NewUser) -> RepoResult<UserId> {
        let id = Uuid::new_v4();
        self.lock()?.execute(
            "INSERT INTO users (id, name, email, password_hash, avatar)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                user.name.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.avatar.as_deref(),
            ],
        )?;
        Ok(id)
    }
}

fn user_filter_clause(filter: &UserFilter) -> (&'static str, String) {
    match filter {
        UserFilter::Id(id) => ("id = ?1", id.to_string()),
        UserFilter::Email(email) => ("email = ?1", email.clone()),
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        avatar: row.get("avatar")?,
    })
}
