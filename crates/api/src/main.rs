use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crm_api::config::{BackendConfig, ServerConfig};
use crm_api::router::build_app_router;
use crm_api::state::AppState;
use crm_db::http::{HttpBackend, HttpBackendConfig};
use crm_db::memory::MemoryBackend;
use crm_db::SharedBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crm_api=debug,crm_db=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Record backend ---
    let backend = build_backend(&config.backend).await;
    tracing::info!(backend = config.backend.name(), "Record backend ready");

    // --- App state ---
    let state = AppState::new(backend, config.clone());

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Construct the configured record backend, seeding the memory store when
/// a seed file is configured.
async fn build_backend(config: &BackendConfig) -> SharedBackend {
    match config {
        BackendConfig::Memory { seed_file } => {
            let backend = MemoryBackend::new();
            if let Some(path) = seed_file {
                let count = crm_db::seed::load_seed_file(&backend, Path::new(path))
                    .await
                    .expect("Failed to load seed file");
                tracing::info!(path = %path, count, "Seeded memory backend");
            }
            Arc::new(backend)
        }
        BackendConfig::Http {
            base_url,
            project_id,
            public_key,
        } => Arc::new(HttpBackend::new(HttpBackendConfig {
            base_url: base_url.clone(),
            project_id: project_id.clone(),
            public_key: public_key.clone(),
        })),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
