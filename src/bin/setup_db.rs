// src/bin/setup_db.rs
use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use csv::{Reader, StringRecord};
use dotenv::dotenv;
use sqlx::PgPool;
use std::env;
use std::fs::File;
use std::str::FromStr;

#[derive(Debug)]
struct RoomRecord {
    room_id: i64,
    rate_per_night: BigDecimal,
    max_guests: i32,
    available_dates: Vec<String>,
}

impl RoomRecord {
    fn from_record(record: &StringRecord) -> Result<Self> {
        let room_id: i64 = record.get(0).context("missing column room_id")?.trim().parse()?;
        let rate_per_night =
            BigDecimal::from_str(record.get(1).context("missing column rate_per_night")?.trim())?;
        let max_guests: i32 = record.get(2).context("missing column max_guests")?.trim().parse()?;
        let available_dates: Vec<String> = record
            .get(3)
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            room_id,
            rate_per_night,
            max_guests,
            available_dates,
        })
    }
}

/// Applies migrations and upserts rooms from a CSV file
/// (`room_id,rate_per_night,max_guests,available_dates`, dates `;`-separated).
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let csv_path = env::args().nth(1).unwrap_or_else(|| "data/rooms.csv".to_string());

    let pool = PgPool::connect(&database_url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations applied");

    let file = File::open(&csv_path).with_context(|| format!("Failed to open {}", csv_path))?;
    let mut rdr = Reader::from_reader(file);

    let mut count = 0;
    for result in rdr.records() {
        let record = result?;
        let row = RoomRecord::from_record(&record)?;

        sqlx::query(
            r#"
            INSERT INTO rooms (room_id, rate_per_night, max_guests, available_dates)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (room_id) DO UPDATE SET
                rate_per_night = EXCLUDED.rate_per_night,
                max_guests = EXCLUDED.max_guests,
                available_dates = EXCLUDED.available_dates
            "#,
        )
        .bind(row.room_id)
        .bind(row.rate_per_night)
        .bind(row.max_guests)
        .bind(row.available_dates)
        .execute(&pool)
        .await?;
        count += 1;
    }

    println!("Database setup complete! {} rooms loaded from {}", count, csv_path);
    Ok(())
}
