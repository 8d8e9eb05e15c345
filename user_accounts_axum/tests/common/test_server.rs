use std::sync::Once;

use tokio::task::JoinHandle;

/// Set the environment before any store or config `LazyLock` is touched
fn load_test_environment() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();

        if dotenvy::from_filename(".env_test").is_ok() {
            println!("Loaded test configuration from .env_test");
        }

        let db_path = std::env::temp_dir().join(format!(
            "user_accounts_axum_it_{}.db",
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
            std::env::set_var("USERS_PER_PAGE", "30");
            std::env::set_var("APP_NAME", "Sample App");
        }
    });
}

/// Application server on a random local port
///
/// Each test starts its own server inside its own runtime; the stores are
/// process-wide and shared between them.
pub struct TestServer {
    server_handle: JoinHandle<()>,
    pub base_url: String,
}

impl TestServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        load_test_environment();
        user_accounts_axum::init().await?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{addr}");

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, user_accounts_axum::app_router()).await {
                eprintln!("Test server error: {e}");
            }
        });

        Ok(Self {
            server_handle,
            base_url,
        })
    }

    pub fn shutdown(self) {
        self.server_handle.abort();
    }
}
