use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A stored user account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Database-assigned identifier, used in URLs
    pub id: i64,
    pub name: String,
    /// Always stored lower-cased
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `actor_id` may edit this account, given the actor's admin flag
    pub fn editable_by(&self, actor_id: i64, actor_is_admin: bool) -> bool {
        actor_is_admin || self.id == actor_id
    }
}

/// Field values for a user that has not been inserted yet
#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password_digest: String,
    pub(crate) is_admin: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum UserSearchField {
    Id(i64),
    Email(String),
}

impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSearchField::Id(id) => write!(f, "id={id}"),
            UserSearchField::Email(email) => write!(f, "email={email}"),
        }
    }
}
