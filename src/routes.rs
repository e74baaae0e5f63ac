// src/routes.rs
use log::{error, info};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::analyze::{analyze_property, project_property};
use crate::handlers::error::ApiError;
use crate::handlers::health::health_check;

const MAX_BODY_BYTES: u64 = 16 * 1024;

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message: String;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(body_error) = err.find::<BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = format!("Invalid request body: {}", body_error);
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "Request body too large".to_string();
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        code = StatusCode::LENGTH_REQUIRED;
        message = "Content-Length header is required".to_string();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Expected a JSON body".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        error!("Unhandled rejection: {:?}", err);
        let fallback = ApiError::new("Internal Server Error");
        code = fallback.status;
        message = fallback.message;
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "success": false,
            "error": message,
        })),
        code,
    ))
}

pub fn routes() -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let health_route = warp::path!("api" / "health")
        .and(warp::get())
        .and_then(health_check);

    let analyze_route = warp::path!("api" / "analyze")
        .and(warp::post())
        .and(json_body())
        .and_then(analyze_property);

    let projection_route = warp::path!("api" / "projection")
        .and(warp::post())
        .and(json_body())
        .and_then(project_property);

    info!("All routes configured successfully.");

    health_route
        .or(analyze_route)
        .or(projection_route)
        .recover(handle_rejection)
}
