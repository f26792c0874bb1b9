//! Stats command implementation.

use anyhow::{Result, anyhow};
use tempdash_core::{ClientError, DashboardApi, STATS_FALLBACK_ERROR};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_stats_json, format_stats_text};
use crate::util::{require_device, write_output};

pub async fn cmd_stats(
    api: &dyn DashboardApi,
    device: Option<&str>,
    default_device: Option<&str>,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<()> {
    let content = stats_output(api, device, default_device, format, opts).await?;
    write_output(&content)
}

async fn stats_output(
    api: &dyn DashboardApi,
    device: Option<&str>,
    default_device: Option<&str>,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    let device = require_device(api, device, default_device).await?;
    let stats = api.stats(&device.id).await.map_err(|e| match e {
        ClientError::ApiError { ref message, .. } if !message.is_empty() => {
            anyhow!("{}", message)
        }
        other => anyhow!(other).context(STATS_FALLBACK_ERROR),
    })?;

    match format {
        OutputFormat::Json => format_stats_json(&stats, opts),
        OutputFormat::Text => Ok(format_stats_text(&device, &stats, opts)),
    }
}

#[cfg(test)]
mod tests {
    use tempdash_core::MockApi;
    use tempdash_types::{Device, PeriodStats, StatsSnapshot};

    use super::*;

    #[tokio::test]
    async fn test_stats_text() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        api.set_stats(
            "d1",
            StatsSnapshot {
                today: Some(PeriodStats {
                    min: 18.0,
                    max: 24.5,
                    avg: 21.0,
                }),
                ..StatsSnapshot::default()
            },
        )
        .await;

        let out = stats_output(&api, Some("Lab"), None, OutputFormat::Text, &FormatOptions::new(true))
            .await
            .unwrap();
        assert!(out.contains("24.5 °C"));
        assert!(out.contains("無每日數據"));
    }

    #[tokio::test]
    async fn test_stats_backend_message() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        let err = stats_output(&api, Some("d1"), None, OutputFormat::Text, &FormatOptions::new(true))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "過去7天內沒有找到溫度數據");
    }
}
