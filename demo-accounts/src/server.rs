use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) fn spawn_http_server(port: u16, app: Router) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("HTTP server listening on {}", addr);
        if let Err(e) = axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTP server failed: {}", e);
        }
    })
}

pub(crate) async fn spawn_https_server(
    port: u16,
    app: Router,
    cert_path: &str,
    key_path: &str,
) -> Result<JoinHandle<()>, std::io::Error> {
    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HTTPS server listening on {}", addr);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTPS server failed: {}", e);
        }
    }))
}

pub(crate) fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("user_accounts_axum=trace,user_accounts=trace,{app_name}=trace,info").into()
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = app_name;
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    #[cfg(debug_assertions)]
    tracing::info!("Debug mode enabled - showing detailed logs by default");
    tracing::info!("You can increase verbosity by setting the RUST_LOG environment variable.");
    tracing::info!("Example: RUST_LOG=debug ./demo-accounts");
}
