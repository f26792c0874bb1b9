//! History command implementation.

use anyhow::{Context, Result};
use tempdash_core::DashboardApi;
use tempdash_types::HistoryQuery;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_history_json, format_history_text};
use crate::util::{require_device, write_output};

/// Arguments for the history command.
pub struct HistoryArgs<'a> {
    pub device: Option<&'a str>,
    pub default_device: Option<&'a str>,
    pub query: HistoryQuery,
    pub format: OutputFormat,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_history(api: &dyn DashboardApi, args: HistoryArgs<'_>) -> Result<()> {
    let content = history_output(api, args).await?;
    write_output(&content)
}

async fn history_output(api: &dyn DashboardApi, args: HistoryArgs<'_>) -> Result<String> {
    let HistoryArgs {
        device,
        default_device,
        query,
        format,
        quiet,
        opts,
    } = args;
    let device = require_device(api, device, default_device).await?;

    let series = api
        .history(&device.id, &query)
        .await
        .with_context(|| format!("Failed to load history of {}", device.name))?;

    let points = series.chart_points();
    let dropped = series.temperature.len() - points.len();
    if dropped > 0 && !quiet {
        eprintln!("Skipped {} non-numeric sample(s).", dropped);
    }

    match format {
        OutputFormat::Json => format_history_json(&points, opts),
        OutputFormat::Text => Ok(format_history_text(&device, &points, opts)),
    }
}

#[cfg(test)]
mod tests {
    use tempdash_core::{ApiCall, MockApi};
    use tempdash_types::{Device, TelemetryPoint, TelemetrySeries, TelemetryValue};

    use super::*;

    #[tokio::test]
    async fn test_history_drops_non_numeric() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        api.set_history(
            "d1",
            TelemetrySeries {
                temperature: vec![
                    TelemetryPoint::new(Some(1_000), TelemetryValue::Text("20.5".to_string())),
                    TelemetryPoint::new(Some(2_000), TelemetryValue::Text("oops".to_string())),
                    TelemetryPoint::new(Some(3_000), TelemetryValue::Number(21.0)),
                ],
            },
        )
        .await;

        let opts = FormatOptions::new(true);
        let query = HistoryQuery::hourly_temperature().with_days(Some(3));
        let out = history_output(
            &api,
            HistoryArgs {
                device: Some("d1"),
                default_device: None,
                query: query.clone(),
                format: OutputFormat::Json,
                quiet: true,
                opts: &opts,
            },
        )
        .await
        .unwrap();

        let points: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1]["y"], 21.0);
        assert!(
            api.calls()
                .contains(&ApiCall::History("d1".to_string(), query))
        );
    }
}
