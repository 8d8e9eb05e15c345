use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::storage::validate_postgres_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{NewUser, User, UserSearchField},
};

use super::config::DB_TABLE_USERS;

pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_digest TEXT NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("id", "bigint"),
        ("name", "text"),
        ("email", "text"),
        ("password_digest", "text"),
        ("is_admin", "boolean"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn count_users_postgres(pool: &Pool<Postgres>) -> Result<i64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name}"))
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub(super) async fn get_users_page_postgres(
    pool: &Pool<Postgres>,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} ORDER BY id ASC LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub(super) async fn get_user_by_field_postgres(
    pool: &Pool<Postgres>,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let user = match field {
        UserSearchField::Id(id) => {
            sqlx::query_as::<_, User>(&format!("SELECT * FROM {table_name} WHERE id = $1"))
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        UserSearchField::Email(email) => {
            sqlx::query_as::<_, User>(&format!("SELECT * FROM {table_name} WHERE email = $1"))
                .bind(email)
                .fetch_optional(pool)
                .await?
        }
    };

    Ok(user)
}

pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    user: NewUser,
) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let now = Utc::now();

    let created = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name} (name, email, password_digest, is_admin, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_digest)
    .bind(user.is_admin)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    user: User,
) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE {table_name}
        SET name = $1, email = $2, password_digest = $3, is_admin = $4, updated_at = $5
        WHERE id = $6
        RETURNING *
        "#
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_digest)
    .bind(user.is_admin)
    .bind(Utc::now())
    .bind(user.id)
    .fetch_optional(pool)
    .await?
    .ok_or(UserError::NotFound)
}

pub(super) async fn delete_user_postgres(pool: &Pool<Postgres>, id: i64) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(UserError::NotFound);
    }

    Ok(())
}
