//! Wire types for the tempdash sensor dashboard.
//!
//! This crate provides the request and response shapes of the dashboard
//! backend API, shared by the HTTP client (tempdash-core) and the terminal
//! front end (tempdash-cli).
//!
//! # Features
//!
//! - Device, statistics, telemetry and analysis payloads
//! - Lenient telemetry value parsing (strings, numbers, `null`)
//! - History query parameters
//! - Error types for payload parsing
//!
//! # Example
//!
//! ```
//! use tempdash_types::TelemetrySeries;
//!
//! let series: TelemetrySeries =
//!     serde_json::from_str(r#"{"temperature":[{"ts":1,"value":"21.5"}]}"#).unwrap();
//! assert_eq!(series.chart_points().len(), 1);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    Aggregation, AskReply, AskResponse, ChartPoint, DailyStats, Device, HOURLY_INTERVAL_MS,
    HistoryQuery, NewDevice, PeriodStats, StatsSnapshot, TEMPERATURE_KEY, TelemetryPoint,
    TelemetrySeries, TelemetryValue, WeekStats, parse_value,
};

#[cfg(test)]
mod tests {
    use super::*;

    // --- Device ---

    #[test]
    fn test_device_list_with_missing_id() {
        let json = r#"[{"id":"d1","name":"MyTempSensor"},{"id":null,"name":"Ghost"}]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();

        assert_eq!(devices.len(), 2);
        assert!(devices[0].is_selectable());
        assert_eq!(devices[1].id, "");
        assert!(!devices[1].is_selectable());
    }

    // --- Telemetry values ---

    #[test]
    fn test_value_from_string() {
        let json = r#"{"temperature":[{"value":"23.456"}]}"#;
        let series: TelemetrySeries = serde_json::from_str(json).unwrap();

        let first = series.first().unwrap();
        assert_eq!(first.ts, None);
        assert_eq!(first.value.as_f64(), Some(23.456));
    }

    #[test]
    fn test_value_from_number_and_null() {
        let json = r#"{"temperature":[{"ts":1,"value":21},{"ts":2,"value":null},{"ts":3}]}"#;
        let series: TelemetrySeries = serde_json::from_str(json).unwrap();

        assert_eq!(series.temperature[0].value, TelemetryValue::Number(21.0));
        assert_eq!(series.temperature[1].value, TelemetryValue::Null);
        assert_eq!(series.temperature[2].value, TelemetryValue::Null);
        assert_eq!(series.temperature[1].value.parse(), Err(ParseError::Missing));
    }

    #[test]
    fn test_value_other_json_is_not_numeric() {
        let value: TelemetryValue = serde_json::from_str("true").unwrap();
        assert!(matches!(value, TelemetryValue::Other(_)));
        assert!(value.as_f64().is_none());
    }

    #[test]
    fn test_empty_object_is_empty_series() {
        let series: TelemetrySeries = serde_json::from_str("{}").unwrap();
        assert!(series.temperature.is_empty());
        assert!(series.first().is_none());
    }

    #[test]
    fn test_parse_value_prefixes() {
        assert_eq!(parse_value("23.456"), Ok(23.456));
        assert_eq!(parse_value("-4"), Ok(-4.0));
        assert_eq!(parse_value("+1.5e2xyz"), Ok(150.0));
        assert_eq!(parse_value("7."), Ok(7.0));
        assert_eq!(parse_value(".5"), Ok(0.5));
        assert_eq!(parse_value("12e"), Ok(12.0));
        assert_eq!(parse_value("  19.9 °C"), Ok(19.9));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert!(parse_value("").is_err());
        assert!(parse_value("-").is_err());
        assert!(parse_value(".").is_err());
        assert!(parse_value("N/A").is_err());
        assert!(parse_value("1e999").is_err());
    }

    // --- Chart points ---

    #[test]
    fn test_chart_points_drop_non_numeric() {
        let json = r#"{"temperature":[
            {"ts":1000,"value":"20.0"},
            {"ts":2000,"value":"oops"},
            {"ts":3000,"value":22.5},
            {"ts":4000,"value":null}
        ]}"#;
        let series: TelemetrySeries = serde_json::from_str(json).unwrap();
        let points = series.chart_points();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], ChartPoint { x: 1000.0, y: 20.0 });
        assert_eq!(points[1], ChartPoint { x: 3000.0, y: 22.5 });
    }

    #[test]
    fn test_chart_points_newest_first_come_out_ascending() {
        let json = r#"{"temperature":[
            {"ts":604800000,"value":"21.0"},
            {"ts":302400000,"value":"20.0"},
            {"ts":0,"value":"19.0"}
        ]}"#;
        let series: TelemetrySeries = serde_json::from_str(json).unwrap();
        let points = series.chart_points();

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 302_400_000.0, 604_800_000.0]);
        assert_eq!(points[0].y, 19.0);
        assert_eq!(series.first().and_then(|p| p.ts), Some(604_800_000));
    }

    // --- Statistics ---

    #[test]
    fn test_stats_full_payload() {
        let json = r#"{
            "today": {"max": 25.1, "min": 18.2, "avg": 21.7},
            "week": {"max": 26.0, "min": 15.0, "avg": 20.5, "diff": 11.0},
            "month_avg": 20.9,
            "daily_breakdown": [
                {"date": "2026-10-16", "avg": 21.7, "max": 25.1, "min": 18.2, "diff": 6.9},
                {"date": "2026-10-15", "avg": 20.0, "max": 24.0, "min": 16.0, "diff": 8.0}
            ]
        }"#;
        let stats: StatsSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(stats.today.unwrap().avg, 21.7);
        assert_eq!(stats.week.unwrap().diff, 11.0);
        assert_eq!(stats.month_avg, Some(20.9));
        assert_eq!(stats.daily_breakdown.len(), 2);
        assert_eq!(stats.daily_breakdown[0].date, "2026-10-16");
    }

    #[test]
    fn test_stats_sparse_payload() {
        let stats: StatsSnapshot =
            serde_json::from_str(r#"{"week":{"max":1,"min":0,"avg":0.5,"diff":1},"daily_breakdown":null}"#)
                .unwrap();

        assert!(stats.today.is_none());
        assert!(stats.month_avg.is_none());
        assert!(stats.daily_breakdown.is_empty());
    }

    // --- Ask ---

    #[test]
    fn test_ask_reply_prefers_analysis() {
        let resp: AskResponse = serde_json::from_str(r#"{"ai_analysis":"All good"}"#).unwrap();
        assert_eq!(AskReply::from(resp), AskReply::Analysis("All good".to_string()));

        let resp: AskResponse = serde_json::from_str(r#"{"error":"no data"}"#).unwrap();
        assert_eq!(AskReply::from(resp), AskReply::Error(Some("no data".to_string())));

        let resp: AskResponse = serde_json::from_str(r#"{"ai_analysis":""}"#).unwrap();
        assert_eq!(AskReply::from(resp), AskReply::Error(None));
    }

    // --- History query ---

    #[test]
    fn test_history_query_pairs() {
        let pairs = HistoryQuery::hourly_temperature().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("key", "temperature".to_string()),
                ("agg", "AVG".to_string()),
                ("interval", "3600000".to_string()),
            ]
        );

        let pairs = HistoryQuery::default().with_days(Some(3)).to_query_pairs();
        assert_eq!(pairs.last(), Some(&("days", "3".to_string())));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_value_never_panics(s in "\\PC*") {
            let _ = parse_value(&s);
        }

        #[test]
        fn parse_value_roundtrips_formatted_floats(v in -1.0e6f64..1.0e6f64) {
            let text = format!("{v}");
            let parsed = parse_value(&text).unwrap();
            prop_assert_eq!(parsed, v);
        }

        #[test]
        fn parse_value_ignores_trailing_text(v in -1000i32..1000i32, suffix in "[a-zA-Z °]{0,8}") {
            let text = format!("{v}{suffix}");
            // an 'e'/'E' suffix without digits is not an exponent
            prop_assert_eq!(parse_value(&text), Ok(f64::from(v)));
        }
    }
}
