use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod checks;
pub mod config;
pub mod error;
pub mod handlers;
pub mod platform;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use config::AppConfig;
pub use state::AppState;

/// Full route table with global middleware
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Compliance checks
        .nest("/security", security_routes())
        .fallback(handlers::not_found)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn security_routes() -> Router<AppState> {
    use handlers::security;

    Router::new()
        .route("/mfa", get(security::mfa_get))
        .route("/rls", get(security::rls_get))
        .route("/pitr", get(security::pitr_get))
}
