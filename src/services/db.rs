// src/services/db.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use log::debug;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::models::Room;

/// Read access to stored rooms.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn get_room(&self, room_id: i64) -> Result<Option<Room>>;
}

#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    room_id: i64,
    rate_per_night: BigDecimal,
    max_guests: i32,
    available_dates: Option<Vec<String>>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            room_id: row.room_id,
            rate_per_night: row.rate_per_night.to_f64().unwrap_or(0.0),
            max_guests: row.max_guests,
            available_dates: row.available_dates.unwrap_or_default(),
        }
    }
}

pub struct DbStore {
    pub(crate) pool: PgPool,
}

impl DbStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl RoomStore for DbStore {
    async fn get_room(&self, room_id: i64) -> Result<Option<Room>> {
        debug!("Fetching room {}", room_id);
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT room_id, rate_per_night, max_guests, available_dates FROM rooms WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Room::from))
    }
}
