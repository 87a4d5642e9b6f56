use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    ai_handler, flux_handler, gemini_handler, generate_handler, genimage_handler, health_handler,
    nsfi_handler, tts_handler, yt_download_handler, yt_search_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Uploads may be as large as any artifact the store accepts.
    let upload_limit = usize::try_from(state.lifecycle.store().max_size_bytes())
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health_handler))
        .route("/yt/search", get(yt_search_handler))
        .route("/yt/download", post(yt_download_handler))
        .route("/flux", post(flux_handler))
        .route("/genimage", post(genimage_handler))
        .route("/generate", post(generate_handler))
        .route("/tts", post(tts_handler))
        .route("/ai", post(ai_handler))
        .route("/gemini", post(gemini_handler))
        .route("/nsfi", post(nsfi_handler))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
