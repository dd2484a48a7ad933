// src/state.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::services::db::RoomStore;

pub type Clock = fn() -> DateTime<Utc>;

/// Handles shared by every request: the room store and the time source.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store, clock: Utc::now }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
