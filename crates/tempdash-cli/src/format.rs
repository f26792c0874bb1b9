//! Output formatting for text and JSON output.
//!
//! The display helpers at the top are shared with the TUI so both front ends
//! render readings and statistics identically.

use anyhow::Result;
use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use serde::Serialize;
use tempdash_types::{AskReply, ChartPoint, Device, StatsSnapshot, TelemetrySeries};

use crate::style;

/// Shown when a latest-reading payload has no samples.
pub const NO_DATA: &str = "無數據";

/// Shown when a value is missing or not numeric.
pub const NOT_AVAILABLE: &str = "N/A";

/// Single row shown when the daily breakdown is empty.
pub const NO_DAILY_DATA: &str = "無每日數據";

/// Prefix of an analysis refusal.
pub const ASK_ERROR_PREFIX: &str = "發生錯誤: ";

/// Used when a refusal carries no message.
pub const ASK_UNKNOWN_ERROR: &str = "未知錯誤";

// ============================================================================
// Shared display helpers
// ============================================================================

/// Two decimals with ties rounded away from zero.
fn two_decimals(v: f64) -> String {
    format!("{:.2}", (v * 100.0).round() / 100.0)
}

/// Text for the latest temperature: two decimals, `N/A` or `無數據`.
///
/// Only the first sample of the series is considered.
#[must_use]
pub fn format_latest(series: &TelemetrySeries) -> String {
    match series.first() {
        None => NO_DATA.to_string(),
        Some(point) => match point.value.as_f64() {
            Some(v) => format!("{} °C", two_decimals(v)),
            None => NOT_AVAILABLE.to_string(),
        },
    }
}

/// Text for a statistics value, printed as the backend sent it.
#[must_use]
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{} °C", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Text of an analysis reply.
#[must_use]
pub fn format_ask_reply(reply: &AskReply) -> String {
    match reply {
        AskReply::Analysis(text) => text.clone(),
        AskReply::Error(Some(error)) => format!("{}{}", ASK_ERROR_PREFIX, error),
        AskReply::Error(None) => format!("{}{}", ASK_ERROR_PREFIX, ASK_UNKNOWN_ERROR),
    }
}

/// Local date and time of an epoch-millisecond timestamp.
#[must_use]
pub fn format_timestamp_ms(ms: i64, pattern: &str) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&Local).format(pattern).to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// The eight scalar statistics fields in display order.
#[must_use]
pub fn stat_fields(stats: &StatsSnapshot) -> [(&'static str, String); 8] {
    let today = stats.today;
    let week = stats.week;
    [
        ("今日最高", format_stat(today.map(|t| t.max))),
        ("今日最低", format_stat(today.map(|t| t.min))),
        ("今日平均", format_stat(today.map(|t| t.avg))),
        ("本週最高", format_stat(week.map(|w| w.max))),
        ("本週最低", format_stat(week.map(|w| w.min))),
        ("本週平均", format_stat(week.map(|w| w.avg))),
        ("本週溫差", format_stat(week.map(|w| w.diff))),
        ("本月平均", format_stat(stats.month_avg)),
    ]
}

// ============================================================================
// Command output
// ============================================================================

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    /// Serialize value to pretty JSON.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    }

    fn title(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("{}", text.bold())
        }
    }
}

#[must_use]
pub fn format_devices_text(devices: &[Device], opts: &FormatOptions) -> String {
    use tabled::{Table, Tabled};

    if devices.is_empty() {
        return "No devices found.\n".to_string();
    }

    #[derive(Tabled)]
    struct DeviceRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "ID")]
        id: String,
    }

    let rows: Vec<DeviceRow> = devices
        .iter()
        .map(|d| DeviceRow {
            name: if opts.no_color {
                d.name.clone()
            } else {
                format!("{}", d.name.cyan())
            },
            id: if d.is_selectable() {
                d.id.clone()
            } else {
                "-".to_string()
            },
        })
        .collect();

    let mut table = Table::new(rows);
    style::apply_table_style(&mut table);
    format!("Found {} device(s)\n\n{}\n", devices.len(), table)
}

pub fn format_devices_json(devices: &[Device], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&devices)
}

#[derive(Serialize)]
struct LatestJson<'a> {
    device_id: &'a str,
    temperature: Option<f64>,
    raw: Option<String>,
    ts: Option<i64>,
}

#[must_use]
pub fn format_latest_text(device: &Device, series: &TelemetrySeries, opts: &FormatOptions) -> String {
    let value = format_latest(series);
    let value = if opts.no_color || series.first().and_then(|p| p.value.as_f64()).is_none() {
        value
    } else {
        format!("{}", value.green().bold())
    };

    let mut output = format!("{}: {}\n", opts.title(&device.name), value);
    if let Some(ts) = series.first().and_then(|p| p.ts) {
        output.push_str(&format!(
            "最後更新: {}\n",
            format_timestamp_ms(ts, "%Y-%m-%d %H:%M:%S")
        ));
    }
    output
}

pub fn format_latest_json(
    device: &Device,
    series: &TelemetrySeries,
    opts: &FormatOptions,
) -> Result<String> {
    let first = series.first();
    opts.as_json(&LatestJson {
        device_id: &device.id,
        temperature: first.and_then(|p| p.value.as_f64()),
        raw: first.map(|p| p.value.to_string()),
        ts: first.and_then(|p| p.ts),
    })
}

#[must_use]
pub fn format_stats_text(device: &Device, stats: &StatsSnapshot, opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record(["統計", "數值"]);
    for (label, value) in stat_fields(stats) {
        builder.push_record([label.to_string(), value]);
    }
    let mut summary = builder.build();
    style::apply_table_style(&mut summary);

    let mut builder = Builder::default();
    builder.push_record(["日期", "平均", "最高", "最低", "溫差"]);
    if stats.daily_breakdown.is_empty() {
        builder.push_record([NO_DAILY_DATA, "", "", "", ""]);
    } else {
        for day in &stats.daily_breakdown {
            builder.push_record([
                day.date.clone(),
                format_stat(Some(day.avg)),
                format_stat(Some(day.max)),
                format_stat(Some(day.min)),
                format_stat(Some(day.diff)),
            ]);
        }
    }
    let mut breakdown = builder.build();
    style::apply_table_style(&mut breakdown);

    format!(
        "{}\n{}\n\n{}\n{}\n",
        opts.title(&device.name),
        summary,
        opts.title("每日統計"),
        breakdown
    )
}

pub fn format_stats_json(stats: &StatsSnapshot, opts: &FormatOptions) -> Result<String> {
    opts.as_json(stats)
}

#[must_use]
pub fn format_history_text(device: &Device, points: &[ChartPoint], opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    if points.is_empty() {
        return format!("No history for {}.\n", device.name);
    }

    let mut builder = Builder::default();
    builder.push_record(["時間", "溫度"]);
    for point in points {
        builder.push_record([
            format_timestamp_ms(point.x as i64, "%Y-%m-%d %H:%M"),
            format!("{} °C", two_decimals(point.y)),
        ]);
    }
    let mut table = builder.build();
    style::apply_table_style(&mut table);

    format!(
        "{} ({} points)\n{}\n",
        opts.title(&device.name),
        points.len(),
        table
    )
}

pub fn format_history_json(points: &[ChartPoint], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&points)
}

#[derive(Serialize)]
struct AskJson<'a> {
    device_id: &'a str,
    question: &'a str,
    ai_analysis: Option<&'a str>,
    error: Option<&'a str>,
}

#[must_use]
pub fn format_ask_text(reply: &AskReply, opts: &FormatOptions) -> String {
    let text = format_ask_reply(reply);
    match reply {
        AskReply::Error(_) if !opts.no_color => format!("{}\n", text.red()),
        _ => format!("{}\n", text),
    }
}

pub fn format_ask_json(
    device: &Device,
    question: &str,
    reply: &AskReply,
    opts: &FormatOptions,
) -> Result<String> {
    let (ai_analysis, error) = match reply {
        AskReply::Analysis(text) => (Some(text.as_str()), None),
        AskReply::Error(e) => (None, Some(e.as_deref().unwrap_or(ASK_UNKNOWN_ERROR))),
    };
    opts.as_json(&AskJson {
        device_id: &device.id,
        question,
        ai_analysis,
        error,
    })
}

#[cfg(test)]
mod tests {
    use tempdash_types::{DailyStats, PeriodStats, TelemetryPoint, TelemetryValue, WeekStats};

    use super::*;

    fn series(values: &[TelemetryValue]) -> TelemetrySeries {
        TelemetrySeries {
            temperature: values
                .iter()
                .map(|v| TelemetryPoint::new(None, v.clone()))
                .collect(),
        }
    }

    fn plain() -> FormatOptions {
        FormatOptions::new(true)
    }

    #[test]
    fn test_format_latest_rounds_to_two_decimals() {
        let s = series(&[TelemetryValue::Text("23.456".to_string())]);
        assert_eq!(format_latest(&s), "23.46 °C");
    }

    #[test]
    fn test_format_latest_rounds_ties_up() {
        let s = series(&[TelemetryValue::Text("23.125".to_string())]);
        assert_eq!(format_latest(&s), "23.13 °C");

        let s = series(&[TelemetryValue::Number(-0.125)]);
        assert_eq!(format_latest(&s), "-0.13 °C");

        // 1.005 is stored just below the tie.
        let s = series(&[TelemetryValue::Number(1.005)]);
        assert_eq!(format_latest(&s), "1.00 °C");
    }

    #[test]
    fn test_format_latest_uses_first_sample_only() {
        let s = series(&[
            TelemetryValue::Number(20.0),
            TelemetryValue::Text("abc".to_string()),
        ]);
        assert_eq!(format_latest(&s), "20.00 °C");
    }

    #[test]
    fn test_format_latest_unparsable() {
        let s = series(&[TelemetryValue::Text("abc".to_string())]);
        assert_eq!(format_latest(&s), "N/A");
        let s = series(&[TelemetryValue::Null]);
        assert_eq!(format_latest(&s), "N/A");
    }

    #[test]
    fn test_format_latest_empty() {
        assert_eq!(format_latest(&TelemetrySeries::default()), "無數據");
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(Some(21.5)), "21.5 °C");
        assert_eq!(format_stat(Some(22.0)), "22 °C");
        assert_eq!(format_stat(Some(0.0)), "0 °C");
        assert_eq!(format_stat(None), "N/A");
    }

    #[test]
    fn test_format_ask_reply() {
        assert_eq!(
            format_ask_reply(&AskReply::Analysis("ok".to_string())),
            "ok"
        );
        assert_eq!(
            format_ask_reply(&AskReply::Error(Some("no data".to_string()))),
            "發生錯誤: no data"
        );
        assert_eq!(format_ask_reply(&AskReply::Error(None)), "發生錯誤: 未知錯誤");
    }

    #[test]
    fn test_stat_fields_missing_periods() {
        let fields = stat_fields(&StatsSnapshot::default());
        assert!(fields.iter().all(|(_, v)| v == "N/A"));
        assert_eq!(fields[0].0, "今日最高");
        assert_eq!(fields[7].0, "本月平均");
    }

    #[test]
    fn test_stat_fields_order() {
        let stats = StatsSnapshot {
            today: Some(PeriodStats {
                min: 18.0,
                max: 25.5,
                avg: 21.2,
            }),
            week: Some(WeekStats {
                min: 17.0,
                max: 26.0,
                avg: 21.0,
                diff: 9.0,
            }),
            month_avg: Some(20.4),
            daily_breakdown: vec![],
        };
        let values: Vec<String> = stat_fields(&stats).into_iter().map(|(_, v)| v).collect();
        assert_eq!(
            values,
            [
                "25.5 °C", "18 °C", "21.2 °C", "26 °C", "17 °C", "21 °C", "9 °C", "20.4 °C"
            ]
        );
    }

    #[test]
    fn test_stats_text_empty_breakdown_placeholder() {
        let device = Device::new("d1", "Lab");
        let text = format_stats_text(&device, &StatsSnapshot::default(), &plain());
        assert_eq!(text.matches("無每日數據").count(), 1);
    }

    #[test]
    fn test_stats_text_breakdown_in_order() {
        let day = |date: &str| DailyStats {
            date: date.to_string(),
            avg: 20.0,
            max: 22.0,
            min: 18.0,
            diff: 4.0,
        };
        let stats = StatsSnapshot {
            daily_breakdown: vec![day("2024-05-03"), day("2024-05-01"), day("2024-05-02")],
            ..StatsSnapshot::default()
        };
        let text = format_stats_text(&Device::new("d1", "Lab"), &stats, &plain());
        let a = text.find("2024-05-03").unwrap();
        let b = text.find("2024-05-01").unwrap();
        let c = text.find("2024-05-02").unwrap();
        assert!(a < b && b < c);
        assert!(!text.contains("無每日數據"));
    }

    #[test]
    fn test_devices_text() {
        let devices = vec![Device::new("d1", "MyTempSensor"), Device::new("", "Ghost")];
        let text = format_devices_text(&devices, &plain());
        assert!(text.contains("Found 2 device(s)"));
        assert!(text.contains("MyTempSensor"));
        assert!(text.contains("d1"));
        assert_eq!(format_devices_text(&[], &plain()), "No devices found.\n");
    }

    #[test]
    fn test_latest_json() {
        let device = Device::new("d1", "Lab");
        let s = series(&[TelemetryValue::Text("21.5".to_string())]);
        let json = format_latest_json(&device, &s, &plain()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["device_id"], "d1");
        assert_eq!(value["temperature"], 21.5);
        assert_eq!(value["raw"], "21.5");
    }

    #[test]
    fn test_history_text() {
        let device = Device::new("d1", "Lab");
        assert_eq!(
            format_history_text(&device, &[], &plain()),
            "No history for Lab.\n"
        );

        let points = vec![ChartPoint { x: 0.0, y: 20.125 }];
        let text = format_history_text(&device, &points, &plain());
        assert!(text.contains("(1 points)"));
        assert!(text.contains("20.13 °C"), "{}", text);
    }

    #[test]
    fn test_ask_json_refusal() {
        let device = Device::new("d1", "Lab");
        let json = format_ask_json(&device, "q", &AskReply::Error(None), &plain()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"], "未知錯誤");
        assert!(value["ai_analysis"].is_null());
    }
}
