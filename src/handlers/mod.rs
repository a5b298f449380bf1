use sqlx::PgPool;

pub mod auth;
pub mod categories;
pub mod favorites;
pub mod listings;
pub mod moderation;

/// Shared application state; the pool is owned here and passed to handlers
/// through axum state rather than a module-level handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
