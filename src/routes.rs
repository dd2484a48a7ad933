// src/routes.rs
use log::info;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reject::{MethodNotAllowed, Rejection};
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::metrics::get_room_metrics;
use crate::state::AppState;

// Renders every rejection as `{"error": message}`.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.as_str();
    } else if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found";
    } else if err.find::<MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed";
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error";
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let room_metrics_route = warp::path::param::<String>()
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter)
        .and_then(get_room_metrics);

    info!("All routes configured successfully.");

    room_metrics_route
        .recover(handle_rejection)
        .with(warp::log("room_metrics_api"))
}
