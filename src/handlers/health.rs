// src/handlers/health.rs
use log::debug;
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

pub async fn health_check() -> Result<Json, Rejection> {
    debug!("Health check");
    Ok(warp::reply::json(&json!({
        "status": "healthy",
        "message": "Rental analyzer API is running",
    })))
}
