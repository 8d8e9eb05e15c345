mod populate;
mod server;

use server::{init_tracing, spawn_http_server, spawn_https_server};
use user_accounts_axum::app_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install default CryptoProvider for rustls to prevent errors
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install default CryptoProvider")?;

    dotenvy::dotenv().ok();
    init_tracing("demo_accounts");

    user_accounts_axum::init().await?;

    populate::ensure_admin().await?;
    populate::populate_sample_users().await?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let app = app_router();
    let mut servers = vec![spawn_http_server(port, app.clone())];

    if let (Ok(cert_path), Ok(key_path)) = (
        std::env::var("TLS_CERT_PATH"),
        std::env::var("TLS_KEY_PATH"),
    ) {
        let https_port = std::env::var("HTTPS_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3443);
        servers.push(spawn_https_server(https_port, app, &cert_path, &key_path).await?);
    }

    for server in servers {
        server.await?;
    }
    Ok(())
}
