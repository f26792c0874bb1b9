//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tempdash_core::DashboardClient;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, config: &mut Config, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            print!("{}", content);
        }
        ConfigAction::SetUrl { url } => {
            set_url(config, &url)?;
            config.save_to(path)?;
            println!("Set backend_url = {}", config.backend_url);
        }
        ConfigAction::SetDevice { name } => {
            set_device(config, &name)?;
            config.save_to(path)?;
            println!("Set default_device = {}", name.trim());
        }
    }
    Ok(())
}

fn set_url(config: &mut Config, url: &str) -> Result<()> {
    let client = DashboardClient::new(url).context("Invalid backend URL")?;
    config.backend_url = client.base_url().to_string();
    Ok(())
}

fn set_device(config: &mut Config, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Device name cannot be empty");
    }
    config.default_device = Some(name.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_url_normalizes_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        cmd_config(
            ConfigAction::SetUrl {
                url: "http://10.0.0.5:5001/".to_string(),
            },
            &mut config,
            &path,
        )
        .unwrap();

        assert_eq!(Config::load_from(&path).backend_url, "http://10.0.0.5:5001");
    }

    #[test]
    fn test_set_url_rejects_garbage() {
        let mut config = Config::default();
        assert!(set_url(&mut config, "ftp://nope").is_err());
        assert_eq!(config.backend_url, "http://localhost:5001");
    }

    #[test]
    fn test_set_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        cmd_config(
            ConfigAction::SetDevice {
                name: " Lab ".to_string(),
            },
            &mut config,
            &path,
        )
        .unwrap();
        assert_eq!(Config::load_from(&path).default_device_name(), Some("Lab"));

        assert!(set_device(&mut config, "  ").is_err());
    }
}
