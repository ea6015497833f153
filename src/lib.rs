pub mod api;
pub mod config;
pub mod infrastructure;
pub mod services;

use crate::config::ScanConfig;
use crate::services::scanner::AnalysisClient;
use crate::services::storage::TempStorage;
use crate::services::workflow::ScanWorkflow;
use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::scan::upload_and_scan,
        api::handlers::scan::uploads_placeholder,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::scan::ScanResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "scan", description = "File upload and malware analysis"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<TempStorage>,
    pub scanner: Arc<dyn AnalysisClient>,
    pub workflow: Arc<ScanWorkflow>,
    pub config: ScanConfig,
}

pub fn create_app(state: AppState) -> Router {
    // API is consumed from arbitrary frontend origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ]);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/upload", post(api::handlers::scan::upload_and_scan))
        .route("/uploads", post(api::handlers::scan::uploads_placeholder))
        .route("/health", get(api::handlers::health::health_check))
        .layer(cors)
        .with_state(state)
}
