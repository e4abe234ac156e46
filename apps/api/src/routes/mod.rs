pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::content::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-content",
            post(handlers::handle_generate_content)
                .options(handlers::handle_generate_content_options),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The dashboard is served from arbitrary origins; the API carries no credentials.
        .layer(CorsLayer::permissive())
}
