use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Repository;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;

/// Shared, immutable request context handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub repository: Arc<dyn Repository>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn Repository>) -> Self {
        let tokens = TokenService::new(&config.security);
        // Build the unknown-user placeholder hash before the first login needs it
        crate::auth::password::dummy_hash();
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            repository,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected item routes
        .merge(item_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/register", post(auth::register_post))
        .route("/login", post(auth::login_post))
}

fn item_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::items;

    Router::new()
        .route("/Items", get(items::collection_get))
        .route("/Item", post(items::record_post))
        .route(
            "/Item/:id",
            get(items::record_get)
                .put(items::record_put)
                .delete(items::record_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn root() -> &'static str {
    "Welcome to Todo API"
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "environment": state.config.environment,
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
