pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::rate_limit;
use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Rate limiting runs before the body limit so rejected clients are
    // turned away without their upload being read.
    let parse_routes = Router::new()
        .route("/api/parse", post(handlers::handle_parse))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(parse_routes)
        .with_state(state)
}
