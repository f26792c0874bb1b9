//! Core types for the dashboard backend API.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ParseError, ParseResult};

/// Telemetry key used by every temperature query.
pub const TEMPERATURE_KEY: &str = "temperature";

/// One hour, the bucket width used for the dashboard chart.
pub const HOURLY_INTERVAL_MS: u64 = 3_600_000;

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A sensor source known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque backend identifier. Empty when the backend did not report one.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Device {
    /// Create a device from an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether the device can be selected (the backend sometimes omits ids).
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Request body for registering a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
}

/// A raw telemetry value as the backend reports it.
///
/// The backend forwards values from its time-series store, which may encode
/// them as strings, numbers, or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum TelemetryValue {
    Number(f64),
    Text(String),
    #[default]
    Null,
    Other(serde_json::Value),
}

impl TelemetryValue {
    /// Interpret the value as a finite number.
    ///
    /// Text values use leading-prefix parsing, so `"23.4abc"` yields `23.4`.
    pub fn parse(&self) -> ParseResult<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Ok(*n),
            Self::Number(n) => Err(ParseError::NotNumeric(n.to_string())),
            Self::Text(s) => parse_value(s),
            Self::Null => Err(ParseError::Missing),
            Self::Other(v) => Err(ParseError::NotNumeric(v.to_string())),
        }
    }

    /// Like [`parse`](Self::parse), discarding the error.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.parse().ok()
    }
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Parse the longest numeric prefix of `raw`.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an
/// optional fractional part, and an optional exponent. Non-finite results are
/// rejected.
///
/// # Examples
///
/// ```
/// use tempdash_types::parse_value;
///
/// assert_eq!(parse_value("23.456"), Ok(23.456));
/// assert_eq!(parse_value(" 21.5 C"), Ok(21.5));
/// assert!(parse_value("abc").is_err());
/// ```
pub fn parse_value(raw: &str) -> ParseResult<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return Err(ParseError::NotNumeric(raw.to_string()));
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::NotNumeric(raw.to_string())),
    }
}

/// A single timestamped telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    /// Epoch milliseconds. The latest-reading endpoint may omit it.
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(default)]
    pub value: TelemetryValue,
}

impl TelemetryPoint {
    pub fn new(ts: Option<i64>, value: TelemetryValue) -> Self {
        Self { ts, value }
    }
}

/// Response of the latest-reading and history endpoints.
///
/// The backend answers `{}` when its store returns nothing, so the series
/// defaults to empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySeries {
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature: Vec<TelemetryPoint>,
}

impl TelemetrySeries {
    /// First sample of the series, which the backend orders newest first.
    #[must_use]
    pub fn first(&self) -> Option<&TelemetryPoint> {
        self.temperature.first()
    }

    /// Chart points for every sample with a timestamp and a numeric value,
    /// oldest first.
    #[must_use]
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        let mut points: Vec<ChartPoint> = self
            .temperature
            .iter()
            .filter_map(|p| {
                let x = p.ts? as f64;
                let y = p.value.as_f64()?;
                Some(ChartPoint { x, y })
            })
            .collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        points
    }
}

/// A plotted point: x is epoch milliseconds, y the bucket value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl From<ChartPoint> for (f64, f64) {
    fn from(p: ChartPoint) -> Self {
        (p.x, p.y)
    }
}

/// Min/max/avg for a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Weekly statistics, which also carry the max-min spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub diff: f64,
}

/// One row of the daily breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    pub diff: f64,
}

/// Aggregate statistics for one device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub today: Option<PeriodStats>,
    #[serde(default)]
    pub week: Option<WeekStats>,
    #[serde(default)]
    pub month_avg: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_breakdown: Vec<DailyStats>,
}

/// Raw body of the `/ask` endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub ai_analysis: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Interpreted answer from the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskReply {
    /// The analysis text.
    Analysis(String),
    /// The backend declined with a message (or none at all).
    Error(Option<String>),
}

impl From<AskResponse> for AskReply {
    fn from(resp: AskResponse) -> Self {
        match resp.ai_analysis {
            Some(text) if !text.is_empty() => Self::Analysis(text),
            _ => Self::Error(resp.error),
        }
    }
}

/// Aggregation function for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    #[default]
    Avg,
    Min,
    Max,
    Sum,
    Count,
    None,
}

impl Aggregation {
    /// Query-string spelling expected by the backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Sum => "SUM",
            Self::Count => "COUNT",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a bucketed history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub key: String,
    pub agg: Aggregation,
    pub interval_ms: u64,
    /// Lookback in days. `None` leaves the range to the backend (7 days).
    pub days: Option<u32>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::hourly_temperature()
    }
}

impl HistoryQuery {
    /// Hourly averages of the temperature key, the dashboard chart query.
    #[must_use]
    pub fn hourly_temperature() -> Self {
        Self {
            key: TEMPERATURE_KEY.to_string(),
            agg: Aggregation::Avg,
            interval_ms: HOURLY_INTERVAL_MS,
            days: None,
        }
    }

    /// Set the lookback window.
    #[must_use]
    pub fn with_days(mut self, days: Option<u32>) -> Self {
        self.days = days;
        self
    }

    /// Query parameters in request order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("key", self.key.clone()),
            ("agg", self.agg.as_str().to_string()),
            ("interval", self.interval_ms.to_string()),
        ];
        if let Some(days) = self.days {
            pairs.push(("days", days.to_string()));
        }
        pairs
    }
}
