//! Shared setup for tests that touch the global stores
//!
//! Store-backed tests run against a SQLite file in the temp directory and the
//! in-memory cache store. Environment is prepared once per test binary,
//! before any `LazyLock` store is touched.

use std::sync::Once;
use std::sync::atomic::{AtomicU32, Ordering};

use http::header::{HeaderMap, SET_COOKIE};

use crate::userdb::{NewUser, User, UserStore, hash_password};

pub(crate) const TEST_PASSWORD: &str = "foobar";

pub(crate) async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        let db_path = std::env::temp_dir().join(format!(
            "user_accounts_unit_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&db_path);

        unsafe {
            std::env::set_var("GENERIC_DATA_STORE_TYPE", "sqlite");
            std::env::set_var(
                "GENERIC_DATA_STORE_URL",
                format!("sqlite:{}", db_path.display()),
            );
            std::env::set_var("GENERIC_CACHE_STORE_TYPE", "memory");
            std::env::set_var("GENERIC_CACHE_STORE_URL", "memory");
            std::env::set_var("COOKIE_SECURE", "false");
        }
    });

    if let Err(e) = crate::storage::init().await {
        eprintln!("Warning: Failed to initialize storage: {e}");
    }
    if let Err(e) = UserStore::init().await {
        eprintln!("Warning: Failed to initialize UserStore: {e}");
    }
}

/// An email address no other test has used in this run
pub(crate) fn unique_email(tag: &str) -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!(
        "{tag}-{}-{n}@example.com",
        chrono::Utc::now().timestamp_micros()
    )
}

/// Insert a user whose password is `TEST_PASSWORD`
pub(crate) async fn create_test_user(tag: &str, is_admin: bool) -> User {
    let password_digest = hash_password(TEST_PASSWORD).expect("hash test password");
    UserStore::insert_user(NewUser {
        name: format!("Test User {tag}"),
        email: unique_email(tag),
        password_digest,
        is_admin,
    })
    .await
    .expect("insert test user")
}

/// Turn the first `Set-Cookie` header into the `name=value` pair a browser would send back
pub(crate) fn cookie_pair_from_set_cookie(headers: &HeaderMap) -> String {
    headers
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("set-cookie header")
        .to_string()
}
