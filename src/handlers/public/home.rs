use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "data": {
            "name": "MyGram API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "users": "/users/register, /users/login (public); /users[/:id] (protected)",
                "photos": "/photos[/:id] (protected)",
                "comments": "/comments[/:id] (protected)",
                "socialmedias": "/socialmedias[/:id] (protected)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(database) = state.database.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({ "data": { "status": "ok", "timestamp": now, "database": "not configured" } })),
        );
    };

    match database.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "data": { "status": "ok", "timestamp": now, "database": "ok" } })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let mut body = json!({
                "message": "database unavailable",
                "data": { "status": "degraded", "timestamp": now }
            });
            if !crate::is_production!() {
                body["data"]["database_error"] = json!(e.to_string());
            }
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
