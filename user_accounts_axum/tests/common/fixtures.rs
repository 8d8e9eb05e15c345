use std::sync::atomic::{AtomicU64, Ordering};

use user_accounts::{DbUser, UserParams, register_user};

pub const TEST_PASSWORD: &str = "foobar";

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Email that no other test in this process uses
pub fn unique_email(tag: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{tag}-{}-{n}@example.com", std::process::id()).to_lowercase()
}

pub async fn create_user(name: &str, is_admin: bool) -> DbUser {
    let params = UserParams {
        name: name.to_string(),
        email: unique_email(name.split_whitespace().next().unwrap_or("user")),
        password: TEST_PASSWORD.to_string(),
        password_confirmation: TEST_PASSWORD.to_string(),
    };
    register_user(&params, is_admin)
        .await
        .expect("Failed to create test user")
}

/// Number of `<li>` entries in the user listing
pub fn listed_users(body: &str) -> usize {
    body.matches(r#"class="gravatar""#).count()
}
