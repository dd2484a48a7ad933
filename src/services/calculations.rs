// src/services/calculations.rs
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use log::{debug, log_enabled, Level};

use crate::models::{OccupancyReport, RateSummary, Room, RoomMetrics};

/// Number of calendar months covered by the occupancy series, current month included.
pub const OCCUPANCY_MONTHS: i32 = 5;
/// Length of the rate window starting at `now`.
pub const RATE_WINDOW_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a single `YYYY-MM-DD` entry, returning `None` for anything else.
///
/// chrono tolerates unpadded fields, leading whitespace and a signed year, so the
/// parsed date must format back to exactly the input.
pub fn parse_available_date(value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) if date.format(DATE_FORMAT).to_string() == value => Some(date),
        Ok(_) => {
            debug!("Skipping non-canonical available date {:?}", value);
            None
        }
        Err(e) => {
            debug!("Skipping unparseable available date {:?}: {}", value, e);
            None
        }
    }
}

fn parse_available_dates(dates: &[String]) -> Vec<NaiveDate> {
    dates
        .iter()
        .filter_map(|d| parse_available_date(d))
        .collect()
}

/// Days in the given month, or 0 when `(year, month)` is not a real month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(end)) => (end - start).num_days() as u32,
        _ => 0,
    }
}

/// Moves `(year, month)` forward by `offset` months, rolling the year over.
fn add_months(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + offset;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Counts entries falling in the given month. Duplicates are counted every time.
pub fn count_available_days(dates: &[NaiveDate], year: i32, month: u32) -> u32 {
    dates
        .iter()
        .filter(|d| d.year() == year && d.month() == month)
        .count() as u32
}

fn occupancy_percentage(total_days: u32, available_days: u32) -> f64 {
    // Unreachable for real months; days_in_month only yields 0 for invalid input.
    if total_days == 0 {
        return 0.0;
    }
    let occupied_days = total_days as f64 - available_days as f64;
    occupied_days / total_days as f64 * 100.0
}

pub fn occupancy_by_month(now: DateTime<Utc>, available_dates: &[String]) -> OccupancyReport {
    let parsed = parse_available_dates(available_dates);
    let mut report = OccupancyReport::new();

    for i in 0..OCCUPANCY_MONTHS {
        let (year, month) = add_months(now.year(), now.month(), i);
        let total_days = days_in_month(year, month);
        let available_days = count_available_days(&parsed, year, month);
        let percentage = occupancy_percentage(total_days, available_days);

        let key = format!("{}-{:02}", year, month);
        debug!(
            "Month: {} | Total Days: {} | Available Days: {} | Occupancy: {:.2}%",
            key, total_days, available_days, percentage
        );
        report.insert(key, percentage);
    }

    report
}

/// Rate statistics over dates strictly after `now` and strictly before `now + 30 days`.
/// Every qualifying date contributes the room-level rate.
pub fn rate_summary(now: DateTime<Utc>, room: &Room) -> RateSummary {
    let window_end = now + Duration::days(RATE_WINDOW_DAYS);

    let rates: Vec<f64> = parse_available_dates(&room.available_dates)
        .into_iter()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .filter(|instant| *instant > now && *instant < window_end)
        .map(|instant| {
            debug!("Adding rate for date: {}", instant.date_naive());
            room.rate_per_night
        })
        .collect();

    if rates.is_empty() {
        return RateSummary::default();
    }

    let average = rates.iter().sum::<f64>() / rates.len() as f64;
    let highest = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = rates.iter().copied().fold(f64::INFINITY, f64::min);

    RateSummary {
        average_rate: Some(average),
        highest_rate: Some(highest),
        lowest_rate: Some(lowest),
    }
}

pub fn calculate_room_metrics(now: DateTime<Utc>, room: &Room) -> RoomMetrics {
    if log_enabled!(Level::Debug) {
        debug!("Room Details: {:?}", room);
    }

    RoomMetrics {
        occupancy_percentage: occupancy_by_month(now, &room.available_dates),
        rates_next_30_days: rate_summary(now, room),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn room(rate: f64, dates: &[&str]) -> Room {
        Room {
            room_id: 1,
            rate_per_night: rate,
            max_guests: 2,
            available_dates: dates.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
        assert_eq!(days_in_month(2024, 0), 0);
    }

    #[test]
    fn test_zero_total_days_is_zero_occupancy() {
        assert_eq!(occupancy_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_no_available_dates_is_fully_occupied() {
        let report = occupancy_by_month(at(2024, 6, 1, 0), &[]);
        assert_eq!(report.len(), 5);
        assert!(report.values().all(|p| *p == 100.0));
    }

    #[test]
    fn test_whole_month_available_is_empty() {
        let june: Vec<String> = (1..=30).map(|d| format!("2024-06-{:02}", d)).collect();
        let report = occupancy_by_month(at(2024, 6, 10, 8), &june);
        assert_eq!(report["2024-06"], 0.0);
        assert_eq!(report["2024-07"], 100.0);
    }

    #[test]
    fn test_partial_month() {
        let dates: Vec<String> = ["2024-07-01", "2024-07-02", "2024-07-03", "2024-06-30"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        let report = occupancy_by_month(at(2024, 6, 1, 0), &dates);
        assert_close(report["2024-07"], 28.0 / 31.0 * 100.0);
        assert_close(report["2024-06"], 29.0 / 30.0 * 100.0);
    }

    #[test]
    fn test_keys_roll_over_year_end() {
        let report = occupancy_by_month(at(2024, 11, 15, 12), &[]);
        let keys: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]);
    }

    #[test]
    fn test_month_end_does_not_skip_february() {
        let report = occupancy_by_month(at(2025, 1, 31, 23), &[]);
        let keys: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2025-01", "2025-02", "2025-03", "2025-04", "2025-05"]);
    }

    #[test]
    fn test_malformed_dates_are_not_counted() {
        let dates: Vec<String> = [
            "not-a-date",
            "2024-06-31",
            "2024-6",
            "",
            "2024-6-5",
            "2024-06-5",
            " 2024-06-05",
            "+2024-06-05",
            "2024-06-15",
        ]
        .iter()
        .map(|d| d.to_string())
        .collect();
        let report = occupancy_by_month(at(2024, 6, 1, 0), &dates);
        assert_close(report["2024-06"], 29.0 / 30.0 * 100.0);
    }

    #[test]
    fn test_parse_requires_padded_dates() {
        assert_eq!(parse_available_date("2024-06-05"), NaiveDate::from_ymd_opt(2024, 6, 5));
        assert_eq!(parse_available_date("2024-6-5"), None);
        assert_eq!(parse_available_date("2024-06-5"), None);
        assert_eq!(parse_available_date(" 2024-06-05"), None);
        assert_eq!(parse_available_date("+2024-06-05"), None);
    }

    #[test]
    fn test_unpadded_dates_leave_rates_empty() {
        let summary = rate_summary(at(2024, 6, 1, 0), &room(100.0, &["2024-6-5", "2024-6-6"]));
        assert_eq!(summary, RateSummary::default());

        let report = occupancy_by_month(at(2024, 6, 1, 0), &["2024-6-5".to_string(), "2024-6-6".to_string()]);
        assert_eq!(report["2024-06"], 100.0);
    }

    #[test]
    fn test_duplicate_dates_are_each_counted() {
        let dates = vec!["2024-06-10".to_string(), "2024-06-10".to_string()];
        let report = occupancy_by_month(at(2024, 6, 1, 0), &dates);
        assert_close(report["2024-06"], 28.0 / 30.0 * 100.0);
    }

    #[test]
    fn test_rate_summary_example() {
        let summary = rate_summary(at(2024, 6, 1, 0), &room(100.0, &["2024-06-05", "2024-06-20"]));
        assert_eq!(summary.average_rate, Some(100.0));
        assert_eq!(summary.highest_rate, Some(100.0));
        assert_eq!(summary.lowest_rate, Some(100.0));
    }

    #[test]
    fn test_rate_window_bounds_are_exclusive() {
        let now = at(2024, 6, 1, 0);
        // Midnight of today equals now; 2024-07-01 is exactly now + 30 days.
        let summary = rate_summary(now, &room(80.0, &["2024-06-01", "2024-07-01"]));
        assert_eq!(summary, RateSummary::default());

        let summary = rate_summary(now, &room(80.0, &["2024-06-30"]));
        assert_eq!(summary.average_rate, Some(80.0));
    }

    #[test]
    fn test_rate_window_follows_time_of_day() {
        let now = at(2024, 6, 1, 12);
        let summary = rate_summary(now, &room(55.5, &["2024-06-01"]));
        assert_eq!(summary.average_rate, None);

        let summary = rate_summary(now, &room(55.5, &["2024-07-01"]));
        assert_eq!(summary.lowest_rate, Some(55.5));
    }

    #[test]
    fn test_no_dates_in_window_reports_nothing() {
        let summary = rate_summary(at(2024, 6, 1, 0), &room(100.0, &["2023-01-01", "2024-09-01", "garbage"]));
        assert_eq!(summary.average_rate, None);
        assert_eq!(summary.highest_rate, None);
        assert_eq!(summary.lowest_rate, None);
    }

    #[test]
    fn test_metrics_serialize_missing_rates_as_null() {
        let metrics = calculate_room_metrics(at(2024, 6, 1, 0), &room(100.0, &[]));
        let json = serde_json::to_value(&metrics).unwrap();

        let rates = &json["rates_next_30_days"];
        assert!(rates["average_rate"].is_null());
        assert!(rates["highest_rate"].is_null());
        assert!(rates["lowest_rate"].is_null());
        assert_eq!(rates.as_object().unwrap().len(), 3);
        assert_eq!(json["occupancy_percentage"]["2024-10"], 100.0);
    }
}
