use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tempdash_cli::cli::{Cli, Commands};
use tempdash_cli::commands::{
    AskArgs, HistoryArgs, cmd_add_device, cmd_ask, cmd_config, cmd_devices, cmd_history,
    cmd_latest, cmd_stats,
};
use tempdash_cli::config::Config;
use tempdash_cli::format::FormatOptions;
use tempdash_core::DashboardClient;

fn env_filter(cli: &Cli) -> EnvFilter {
    if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Log file used while the dashboard owns the terminal.
fn tui_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("tempdash").join("tempdash.log"))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::options().create(true).append(true).open(path)
}

fn init_tracing(cli: &Cli, to_file: bool) {
    let filter = env_filter(cli);

    if to_file && let Some(path) = tui_log_path() {
        match open_log_file(&path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Failed to open log file {}: {}", path.display(), e);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "tui")]
fn is_dashboard(command: Option<&Commands>) -> bool {
    matches!(command, None | Some(Commands::Tui))
}

#[cfg(not(feature = "tui"))]
fn is_dashboard(_command: Option<&Commands>) -> bool {
    false
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load();

    init_tracing(&cli, is_dashboard(cli.command.as_ref()));

    // Config commands never talk to the backend.
    let command = match cli.command {
        Some(Commands::Config { action }) => {
            return cmd_config(action, &mut config, &Config::path());
        }
        other => other,
    };

    let url = config.resolve_url(cli.url.as_deref());
    let client = DashboardClient::with_timeout(&url, config.request_timeout())
        .with_context(|| format!("Invalid backend URL: {}", url))?;
    tracing::debug!(url = %client.base_url(), "Using backend");

    let opts = FormatOptions::new(cli.no_color);
    let default_device = config.default_device_name();

    match command {
        #[cfg(feature = "tui")]
        None | Some(Commands::Tui) => {
            let api: std::sync::Arc<dyn tempdash_core::DashboardApi> = std::sync::Arc::new(client);
            tempdash_cli::tui::run(&config, api).await?;
        }
        #[cfg(not(feature = "tui"))]
        None => {
            <Cli as clap::CommandFactory>::command().print_help()?;
        }
        Some(Commands::Devices) => {
            cmd_devices(&client, cli.format, &opts).await?;
        }
        Some(Commands::AddDevice { name }) => {
            cmd_add_device(&client, &name, cli.quiet).await?;
        }
        Some(Commands::Latest { device }) => {
            cmd_latest(
                &client,
                device.device.as_deref(),
                default_device,
                cli.format,
                &opts,
            )
            .await?;
        }
        Some(Commands::Stats { device }) => {
            cmd_stats(
                &client,
                device.device.as_deref(),
                default_device,
                cli.format,
                &opts,
            )
            .await?;
        }
        Some(Commands::History { device, days }) => {
            let query = config.history_query().with_days(days.or(config.history_days));
            cmd_history(
                &client,
                HistoryArgs {
                    device: device.device.as_deref(),
                    default_device,
                    query,
                    format: cli.format,
                    quiet: cli.quiet,
                    opts: &opts,
                },
            )
            .await?;
        }
        Some(Commands::Ask { device, question }) => {
            cmd_ask(
                &client,
                AskArgs {
                    device: device.device.as_deref(),
                    default_device,
                    question: &question,
                    format: cli.format,
                    quiet: cli.quiet,
                    opts: &opts,
                },
            )
            .await?;
        }
        Some(Commands::Config { .. }) => {
            // Already handled above
        }
    }

    Ok(())
}
