use dotenvy::dotenv;
use rust_scan_backend::config::ScanConfig;
use rust_scan_backend::infrastructure::{scanner, storage};
use rust_scan_backend::services::poller::AnalysisPoller;
use rust_scan_backend::services::workflow::ScanWorkflow;
use rust_scan_backend::{AppState, create_app};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_scan_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Rust Scan Backend...");

    let config = ScanConfig::from_env();
    info!(
        "🛡️  Scan Config: Client={}, Poll Interval={:?}, Max Attempts={}, Max Size={}MB",
        config.scan_client_type,
        config.poll_interval,
        if config.max_poll_attempts == 0 {
            "unbounded".to_string()
        } else {
            config.max_poll_attempts.to_string()
        },
        config.max_file_size / 1024 / 1024
    );

    // Setup Infrastructure
    let storage_service = storage::setup_storage(&config).await?;
    let scanner_service = scanner::setup_scanner(&config).await;

    let workflow = Arc::new(ScanWorkflow::new(
        storage_service.clone(),
        scanner_service.clone(),
        AnalysisPoller::from_config(&config),
    ));

    let state = AppState {
        storage: storage_service,
        scanner: scanner_service,
        workflow,
        config: config.clone(),
    };

    let app = create_app(state)
        .layer(
            TraceLayer::new_for_http()
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    info!("📥 {} {}", request.method(), request.uri());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        info!(
                            "📤 Finished in {:?} with status {}",
                            latency,
                            response.status()
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(config.max_file_size));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
