use crate::session::User as SessionUser;
use crate::userdb::{UserError, UserStore};

use super::errors::CoordinationError;

/// Delete an account on behalf of an administrator
///
/// Administrators cannot delete their own account.
pub async fn delete_user(actor: &SessionUser, user_id: i64) -> Result<(), CoordinationError> {
    if !actor.is_admin {
        tracing::debug!("User {} is not authorized to delete users", actor.id);
        return Err(CoordinationError::Unauthorized.log());
    }

    if actor.id == user_id {
        return Err(CoordinationError::SelfDeletion.log());
    }

    UserStore::delete_user(user_id).await.map_err(|e| match e {
        UserError::NotFound => CoordinationError::user_not_found(user_id).log(),
        e => CoordinationError::from(e),
    })?;

    tracing::info!("Admin {} deleted user {}", actor.id, user_id);
    Ok(())
}
