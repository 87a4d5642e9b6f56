use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub device: String,
    pub models_loaded: ModelsLoaded,
}

#[derive(Serialize)]
pub struct ModelsLoaded {
    pub image: bool,
    pub cinematic: bool,
}

pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            device: "API".to_string(),
            models_loaded: ModelsLoaded {
                image: true,
                cinematic: true,
            },
        }),
    )
}
