use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers;
use crate::tts::TtsService;

pub struct AppState {
    pub tts: TtsService,
    pub debug: bool,
}

pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/voices", get(handlers::list_voices))
        .route("/health", get(handlers::health));

    Router::new()
        .route("/", get(handlers::render_form).post(handlers::synthesize))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        .route("/qr", get(handlers::qr_generator))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
