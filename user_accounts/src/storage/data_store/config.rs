//! Relational store selection

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

const DEFAULT_STORE_TYPE: &str = "sqlite";
const DEFAULT_STORE_URL: &str = "sqlite:file:user_accounts?mode=memory&cache=shared";

static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").unwrap_or_else(|_| DEFAULT_STORE_TYPE.to_string())
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string())
});

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();
    let store_url = GENERIC_DATA_STORE_URL.as_str();

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            }) as Box<dyn DataStore>
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }) as Box<dyn DataStore>,
        t => panic!("Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"),
    };

    Mutex::new(store)
});

/// Prefix shared by every table this crate creates
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "ua_".to_string()));
