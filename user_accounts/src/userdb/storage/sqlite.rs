use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::storage::validate_sqlite_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{NewUser, User, UserSearchField},
};

use super::config::DB_TABLE_USERS;

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_digest TEXT NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("id", "INTEGER"),
        ("name", "TEXT"),
        ("email", "TEXT"),
        ("password_digest", "TEXT"),
        ("is_admin", "BOOLEAN"),
        ("created_at", "TIMESTAMP"),
        ("updated_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn count_users_sqlite(pool: &Pool<Sqlite>) -> Result<i64, UserError> {
    // Tables may not exist yet for a fresh in-memory database
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name}"))
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub(super) async fn get_users_page_sqlite(
    pool: &Pool<Sqlite>,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} ORDER BY id ASC LIMIT ? OFFSET ?
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub(super) async fn get_user_by_field_sqlite(
    pool: &Pool<Sqlite>,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let user = match field {
        UserSearchField::Id(id) => {
            sqlx::query_as::<_, User>(&format!("SELECT * FROM {table_name} WHERE id = ?"))
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        UserSearchField::Email(email) => {
            sqlx::query_as::<_, User>(&format!("SELECT * FROM {table_name} WHERE email = ?"))
                .bind(email)
                .fetch_optional(pool)
                .await?
        }
    };

    Ok(user)
}

pub(super) async fn insert_user_sqlite(
    pool: &Pool<Sqlite>,
    user: NewUser,
) -> Result<User, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();
    let now = Utc::now();

    let created = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name} (name, email, password_digest, is_admin, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_digest)
    .bind(user.is_admin)
    .bind(now) // created_at
    .bind(now) // updated_at
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub(super) async fn update_user_sqlite(pool: &Pool<Sqlite>, user: User) -> Result<User, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE {table_name}
        SET name = ?, email = ?, password_digest = ?, is_admin = ?, updated_at = ?
        WHERE id = ?
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

pub(super) async fn delete_user_sqlite(pool: &Pool<Sqlite>, id: i64) -> Result<(), UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE id = ?"))
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(UserError::NotFound);
    }

    Ok(())
}
