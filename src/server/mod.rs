//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::identity::GatewayTokenValidator;
use crate::middleware::{normalize_error_response, ObservabilityLayer, SanitizedMakeSpan};
use crate::openapi::ApiDoc;
use crate::repository::StudentRepositoryImpl;
use crate::service::StudentService;
use crate::state::HasServices;
use crate::telemetry;
use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub student_service: Arc<StudentService<StudentRepositoryImpl>>,
    pub token_validator: Arc<GatewayTokenValidator>,
}

impl AppState {
    pub fn new(config: Config, db_pool: MySqlPool) -> Result<Self> {
        let student_repo = Arc::new(StudentRepositoryImpl::new(db_pool.clone()));
        let token_validator = GatewayTokenValidator::new(&config.oauth)
            .context("Failed to build identity gateway client")?;

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            student_service: Arc::new(StudentService::new(student_repo)),
            token_validator: Arc::new(token_validator),
        })
    }
}

impl HasServices for AppState {
    type StudentRepo = StudentRepositoryImpl;
    type Validator = GatewayTokenValidator;

    fn config(&self) -> &Config {
        &self.config
    }

    fn student_service(&self) -> &StudentService<Self::StudentRepo> {
        &self.student_service
    }

    fn token_validator(&self) -> &Self::Validator {
        &self.token_validator
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the HTTP server until Ctrl-C / SIGTERM
pub async fn run(config: Config, metrics_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if metrics_handle.is_some() {
        telemetry::metrics::spawn_pool_metrics_task(db_pool.clone(), Duration::from_secs(15));
    }

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool.clone())?;
    info!(gateway = %state.config.oauth.validate_url(), "Token validation via identity gateway");

    let app = build_router(state).merge(metrics_router(metrics_handle));

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server listening on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Build the application router over any [`HasServices`] implementation.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let config = state.config();
    let cors = build_cors(config);
    let timeout = request_timeout(config);
    let swagger = !config.is_production();

    let students = Router::new()
        .route(
            "/students",
            get(api::student::list::<S>).post(api::student::create::<S>),
        )
        .route(
            "/students/{id}",
            get(api::student::get::<S>)
                .put(api::student::update::<S>)
                .patch(api::student::patch::<S>)
                .delete(api::student::delete::<S>),
        )
        .route(
            "/students/{id}/phone-numbers",
            get(api::phone_number::list::<S>).post(api::phone_number::add::<S>),
        )
        .route(
            "/students/{id}/phone-numbers/{index}",
            get(api::phone_number::get::<S>)
                .put(api::phone_number::replace::<S>)
                .patch(api::phone_number::merge::<S>)
                .delete(api::phone_number::remove::<S>),
        );

    let mut router = Router::new()
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .nest(api::API_PREFIX, students)
        .with_state(state);

    if swagger {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()));
    }

    router
        .layer(timeout)
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(cors)
        .layer(ObservabilityLayer)
}

/// Requests running past `request_timeout_secs` answer 408.
fn request_timeout(config: &Config) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.request_timeout_secs),
    )
}

/// `/metrics` in Prometheus text format, absent when metrics are disabled.
fn metrics_router(handle: Option<PrometheusHandle>) -> Router {
    match handle {
        Some(handle) => Router::new().route(
            "/metrics",
            get(move || std::future::ready(handle.render())),
        ),
        None => Router::new(),
    }
}

fn build_cors(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ];

    if config.cors_allowed_origins.is_empty() {
        if config.is_production() {
            warn!("CORS_ALLOWED_ORIGINS not set in production; cross-origin requests are refused");
            return CorsLayer::new();
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
