use crate::storage::GENERIC_DATA_STORE;
use crate::userdb::{
    errors::UserError,
    types::{NewUser, User, UserSearchField},
};

use super::postgres::*;
use super::sqlite::*;

pub(crate) struct UserStore;

impl UserStore {
    /// Initialize the user database tables
    pub(crate) async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    pub(crate) async fn count_users() -> Result<i64, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            count_users_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            count_users_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Users ordered by id, `limit` rows starting at `offset`
    #[tracing::instrument]
    pub(crate) async fn get_users_page(limit: i64, offset: i64) -> Result<Vec<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_users_page_sqlite(pool, limit, offset).await
        } else if let Some(pool) = store.as_postgres() {
            get_users_page_postgres(pool, limit, offset).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    #[tracing::instrument(fields(user_field = %field))]
    pub(crate) async fn get_user_by(field: UserSearchField) -> Result<Option<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            get_user_by_field_sqlite(pool, &field).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_field_postgres(pool, &field).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(Some(_)) => tracing::debug!(found = true, "User lookup completed"),
            Ok(None) => tracing::debug!(found = false, "User lookup completed - not found"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    #[tracing::instrument(skip(user), fields(user_email = %user.email))]
    pub(crate) async fn insert_user(user: NewUser) -> Result<User, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            insert_user_sqlite(pool, user).await
        } else if let Some(pool) = store.as_postgres() {
            insert_user_postgres(pool, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(user) => tracing::info!(
                user_id = user.id,
                is_admin = user.is_admin,
                "User created"
            ),
            Err(e) => tracing::warn!(error = %e, "User insert failed"),
        }

        result
    }

    #[tracing::instrument(skip(user), fields(user_id = user.id))]
    pub(crate) async fn update_user(user: User) -> Result<User, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            update_user_sqlite(pool, user).await
        } else if let Some(pool) = store.as_postgres() {
            update_user_postgres(pool, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    #[tracing::instrument]
    pub(crate) async fn delete_user(id: i64) -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            delete_user_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            delete_user_postgres(pool, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}
