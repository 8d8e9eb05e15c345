use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email has already been taken")]
    EmailTaken,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => UserError::EmailTaken,
            _ => UserError::Storage(err.to_string()),
        }
    }
}
