use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub struct RootController;

impl RootController {
    /// Liveness only; never touches the store.
    pub async fn health_check() -> impl IntoResponse {
        (StatusCode::OK, Json(json!({ "status": "OK" })))
    }
}
