//! Add-device command implementation.

use anyhow::{Context, Result, bail};
use tempdash_core::DashboardApi;

pub async fn cmd_add_device(api: &dyn DashboardApi, name: &str, quiet: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("請輸入設備名稱");
    }

    api.add_device(name)
        .await
        .with_context(|| format!("設備新增失敗！ ({})", name))?;
    tracing::info!(name, "Device registered");

    if !quiet {
        println!("設備新增成功！");
    }
    Ok(())
}
