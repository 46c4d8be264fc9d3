use axum::Json;

/// GET /: liveness probe.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "status": "ok" }))
}
