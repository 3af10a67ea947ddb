use axum::{
    middleware,
    routing::get,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_docs::ApiDoc;
use crate::handlers::{auth, categories, products};
use crate::middleware::jwt_auth_middleware;

/// Shared application state. The pool is the only cross-request state; each
/// request builds its own unit of work on top of it.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Versioned API groups; v2 adds the anonymous state endpoint
        .nest("/api/v1", version_group(false))
        .nest("/api/v2", version_group(true))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn version_group(with_state_probe: bool) -> Router<AppState> {
    let authentication = if with_state_probe {
        Router::new().route("/Authentication", post(auth::authenticate).get(auth::state))
    } else {
        Router::new().route("/Authentication", post(auth::authenticate))
    };

    let catalog = Router::new()
        .merge(category_routes())
        .merge(product_routes())
        // Bearer token required on all catalog endpoints
        .route_layer(middleware::from_fn(jwt_auth_middleware));

    authentication.merge(catalog)
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/Categories", get(categories::list).post(categories::create))
        .route("/Categories/products", get(categories::list_with_products))
        .route(
            "/Categories/:id",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::remove),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/Products", get(products::list).post(products::create))
        .route("/Products/price", get(products::list_by_price))
        .route(
            "/Products/:id",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::remove),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Catalog API",
        "version": version,
        "description": "Product catalog CRUD API with JWT auth and pagination",
        "endpoints": {
            "authentication": "POST /api/v{1,2}/Authentication (public), GET /api/v2/Authentication (public)",
            "categories": "/api/v{1,2}/Categories[/{id}], /api/v{1,2}/Categories/products (bearer token)",
            "products": "/api/v{1,2}/Products[/{id}], /api/v{1,2}/Products/price (bearer token)",
            "docs": "/swagger-ui (public)",
            "health": "/health (public)"
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::context::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
