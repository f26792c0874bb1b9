//! Latest command implementation.

use anyhow::{Context, Result};
use tempdash_core::DashboardApi;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_latest_json, format_latest_text};
use crate::util::{require_device, write_output};

pub async fn cmd_latest(
    api: &dyn DashboardApi,
    device: Option<&str>,
    default_device: Option<&str>,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<()> {
    let content = latest_output(api, device, default_device, format, opts).await?;
    write_output(&content)
}

async fn latest_output(
    api: &dyn DashboardApi,
    device: Option<&str>,
    default_device: Option<&str>,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    let device = require_device(api, device, default_device).await?;
    let series = api
        .latest(&device.id)
        .await
        .with_context(|| format!("Failed to read latest temperature of {}", device.name))?;

    match format {
        OutputFormat::Json => format_latest_json(&device, &series, opts),
        OutputFormat::Text => Ok(format_latest_text(&device, &series, opts)),
    }
}

#[cfg(test)]
mod tests {
    use tempdash_core::MockApi;
    use tempdash_types::Device;

    use super::*;

    #[tokio::test]
    async fn test_latest_text() {
        let api = MockApi::with_devices(vec![Device::new("d1", "MyTempSensor")]);
        api.set_latest_value("d1", "23.456").await;

        let out = latest_output(
            &api,
            None,
            Some("MyTempSensor"),
            OutputFormat::Text,
            &FormatOptions::new(true),
        )
        .await
        .unwrap();
        assert!(out.contains("MyTempSensor: 23.46 °C"));
    }

    #[tokio::test]
    async fn test_latest_no_data() {
        let api = MockApi::with_devices(vec![Device::new("d1", "Lab")]);
        let out = latest_output(&api, Some("d1"), None, OutputFormat::Text, &FormatOptions::new(true))
            .await
            .unwrap();
        assert!(out.contains("無數據"));
    }
}
