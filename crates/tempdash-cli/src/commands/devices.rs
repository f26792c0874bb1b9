//! Devices command implementation.

use anyhow::{Context, Result};
use tempdash_core::DashboardApi;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_devices_json, format_devices_text};
use crate::util::write_output;

pub async fn cmd_devices(
    api: &dyn DashboardApi,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<()> {
    let content = devices_output(api, format, opts).await?;
    write_output(&content)
}

async fn devices_output(
    api: &dyn DashboardApi,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<String> {
    let devices = api
        .list_devices()
        .await
        .context("Failed to load device list")?;

    match format {
        OutputFormat::Json => format_devices_json(&devices, opts),
        OutputFormat::Text => Ok(format_devices_text(&devices, opts)),
    }
}

#[cfg(test)]
mod tests {
    use tempdash_core::MockApi;
    use tempdash_types::Device;

    use super::*;

    #[tokio::test]
    async fn test_devices_json_lists_all() {
        let api = MockApi::with_devices(vec![Device::new("d1", "A"), Device::new("d2", "B")]);
        let out = devices_output(&api, OutputFormat::Json, &FormatOptions::new(true))
            .await
            .unwrap();
        let devices: Vec<Device> = serde_json::from_str(&out).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].name, "B");
    }

    #[tokio::test]
    async fn test_devices_failure_has_context() {
        let api = MockApi::new();
        api.set_should_fail(true, None).await;
        let err = devices_output(&api, OutputFormat::Text, &FormatOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load device list"));
    }
}
