use crate::interface_adapters::handlers::{create_pix, home};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

pub fn app(state: AppState) -> Router {
    // The front end is served from another origin.
    Router::new()
        .route("/", get(home))
        .route("/api/pix", post(create_pix))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
