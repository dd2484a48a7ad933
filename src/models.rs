// src/models.rs
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: i64,
    pub rate_per_night: f64,
    pub max_guests: i32,
    /// Raw `YYYY-MM-DD` strings as stored; entries that fail to parse are ignored.
    pub available_dates: Vec<String>,
}

/// Occupancy percentage keyed by `YYYY-MM`, ordered chronologically.
pub type OccupancyReport = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    pub average_rate: Option<f64>,
    pub highest_rate: Option<f64>,
    pub lowest_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMetrics {
    pub occupancy_percentage: OccupancyReport,
    pub rates_next_30_days: RateSummary,
}
