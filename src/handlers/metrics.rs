// src/handlers/metrics.rs
use warp::reply::Json;
use warp::Rejection;
use log::{error, info};

use crate::services::calculations::calculate_room_metrics;
use crate::state::AppState;
use super::error::ApiError;

/// Parses the raw path segment, which warp hands over still percent-encoded.
fn parse_room_id(segment: &str) -> Option<i64> {
    urlencoding::decode(segment).ok()?.parse().ok()
}

pub async fn get_room_metrics(room_id: String, state: AppState) -> Result<Json, Rejection> {
    let room_id = parse_room_id(&room_id).ok_or_else(|| {
        info!("Rejecting invalid room_id {:?}", room_id);
        warp::reject::custom(ApiError::invalid_room_id())
    })?;

    info!("Handling request for metrics of room {}", room_id);

    let room = match state.store.get_room(room_id).await {
        Ok(Some(room)) => room,
        Ok(None) => {
            info!("Room {} not found", room_id);
            return Err(warp::reject::custom(ApiError::room_not_found()));
        }
        Err(e) => {
            error!("Failed to fetch room {}: {:#}", room_id, e);
            return Err(warp::reject::custom(ApiError::room_not_found()));
        }
    };

    let metrics = calculate_room_metrics(state.now(), &room);
    Ok(warp::reply::json(&metrics))
}
