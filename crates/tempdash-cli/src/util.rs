//! Utility functions for CLI operations.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tempdash_core::DashboardApi;
use tempdash_types::Device;

/// Resolve the device a command targets.
///
/// An explicit id or name wins over the configured default. Names are
/// resolved through the device list, so the backend must be reachable.
pub async fn require_device(
    api: &dyn DashboardApi,
    requested: Option<&str>,
    default_name: Option<&str>,
) -> Result<Device> {
    let Some(wanted) = requested.filter(|d| !d.is_empty()).or(default_name) else {
        bail!(
            "No device specified. Use --device <ID|NAME> or set TEMPDASH_DEVICE environment variable.\n\
             Run 'tempdash devices' to list devices, or 'tempdash config set-device <NAME>' to set a default."
        );
    };

    let device = api
        .find_device(wanted)
        .await
        .context("Failed to load device list")?;

    match device {
        Some(device) => {
            tracing::debug!(device_id = %device.id, name = %device.name, "Resolved device");
            Ok(device)
        }
        None => bail!(
            "Device '{}' not found.\nRun 'tempdash devices' to list known devices.",
            wanted
        ),
    }
}

/// Write command output to stdout.
pub fn write_output(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
