use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use bazaar_api::handlers::{self, AppState};
use bazaar_api::middleware::jwt_auth_middleware;
use bazaar_api::{config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Bazaar API in {:?} mode", config.environment);

    let pool = database::connect().await?;
    let app = app(AppState { pool });

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(4000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/categories", get(handlers::categories::list))
        .route("/api/ads", get(handlers::listings::search))
        .route("/api/ads/:id", get(handlers::listings::get_one))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(handlers::auth::me))
        .route("/api/ads", post(handlers::listings::create))
        .route("/api/ads/:id", delete(handlers::listings::archive))
        .route("/api/my/ads", get(handlers::listings::my_ads))
        .route(
            "/api/ads/:id/favorite",
            post(handlers::favorites::add).delete(handlers::favorites::remove),
        )
        .route("/api/favorites", get(handlers::favorites::list))
        .route("/api/moderation/pending", get(handlers::moderation::pending))
        .route("/api/moderation/:id/approve", post(handlers::moderation::approve))
        .route("/api/moderation/:id/reject", post(handlers::moderation::reject))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Bazaar API",
            "version": version,
            "description": "Classifieds marketplace backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/register, /api/login (public), /api/user (protected)",
                "categories": "/api/categories (public)",
                "ads": "/api/ads[?criteria] (public search), /api/ads/:id (public), POST /api/ads (protected)",
                "my": "/api/my/ads (protected)",
                "favorites": "/api/ads/:id/favorite, /api/favorites (protected)",
                "moderation": "/api/moderation/* (protected, admin role)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": { "status": "degraded", "timestamp": now, "database_error": e.to_string() }
            })),
        ),
    }
}
