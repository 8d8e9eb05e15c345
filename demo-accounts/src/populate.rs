//! Sample data for trying the application out

use user_accounts::{CoordinationError, UserParams, count_users, register_user};

const SAMPLE_PASSWORD: &str = "password";

fn params(name: String, email: String, password: &str) -> UserParams {
    UserParams {
        name,
        email,
        password: password.to_string(),
        password_confirmation: password.to_string(),
    }
}

fn sample_user(n: usize) -> UserParams {
    params(
        format!("Example User {n}"),
        format!("example-{n}@railstutorial.org"),
        SAMPLE_PASSWORD,
    )
}

#[derive(Debug, PartialEq, Eq)]
enum Registration {
    Created,
    AlreadyRegistered,
    Rejected,
}

/// Register an account unless its email is already in use
async fn register_if_absent(
    params: &UserParams,
    is_admin: bool,
) -> Result<Registration, CoordinationError> {
    match register_user(params, is_admin).await {
        Ok(_) => Ok(Registration::Created),
        Err(CoordinationError::Validation(errors)) if errors.email_taken() => {
            if is_admin {
                tracing::warn!(
                    "{} is already registered; its admin flag is left unchanged",
                    params.email
                );
            } else {
                tracing::debug!("Skipping {}: already registered", params.email);
            }
            Ok(Registration::AlreadyRegistered)
        }
        Err(CoordinationError::Validation(errors)) => {
            tracing::warn!("Not registering {}: {}", params.email, errors);
            Ok(Registration::Rejected)
        }
        Err(e) => Err(e),
    }
}

/// Create the administrator from `ADMIN_EMAIL` / `ADMIN_PASSWORD` when both are set
pub(crate) async fn ensure_admin() -> Result<(), CoordinationError> {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Example User".to_string());
    if register_if_absent(&params(name, email.clone(), &password), true).await?
        == Registration::Created
    {
        tracing::info!("Created administrator {}", email);
    }
    Ok(())
}

/// Add `POPULATE_SAMPLE_USERS` numbered example accounts
pub(crate) async fn populate_sample_users() -> Result<(), CoordinationError> {
    let Some(count) = std::env::var("POPULATE_SAMPLE_USERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
    else {
        return Ok(());
    };

    let mut created = 0;
    for n in 1..=count {
        if register_if_absent(&sample_user(n), false).await? == Registration::Created {
            created += 1;
        }
    }

    tracing::info!(
        "Created {} sample users, {} accounts in total",
        created,
        count_users().await?
    );
    Ok(())
}
