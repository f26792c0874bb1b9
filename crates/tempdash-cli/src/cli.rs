//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable device selection arguments
#[derive(Debug, Clone, Default, Args)]
pub struct DeviceArgs {
    /// Device id or name, or use TEMPDASH_DEVICE env var (defaults to the configured device)
    #[arg(short, long, env = "TEMPDASH_DEVICE")]
    pub device: Option<String>,
}

#[derive(Parser)]
#[command(name = "tempdash")]
#[command(author, version, about = "Dashboard client for temperature sensors", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = "TEMPDASH_URL")]
    pub url: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal dashboard (default)
    #[cfg(feature = "tui")]
    Tui,

    /// List devices known to the backend
    Devices,

    /// Register a new device
    AddDevice {
        /// Display name of the new device
        name: String,
    },

    /// Show the latest temperature of a device
    Latest {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Show today/week/month statistics and the daily breakdown
    Stats {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Show hourly-averaged temperature history
    History {
        #[command(flatten)]
        device: DeviceArgs,

        /// Days to look back (backend default: 7)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=365))]
        days: Option<u32>,
    },

    /// Ask the analysis endpoint a question about a device
    Ask {
        #[command(flatten)]
        device: DeviceArgs,

        /// The question (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show configuration file path
    Path,

    /// Show current configuration
    Show,

    /// Set the backend base URL
    SetUrl {
        /// Base URL (e.g., http://localhost:5001)
        url: String,
    },

    /// Set the device selected on startup
    SetDevice {
        /// Device name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["tempdash"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_ask_joins_words() {
        let cli =
            Cli::try_parse_from(["tempdash", "ask", "-d", "d1", "今天", "熱嗎"]).unwrap();
        match cli.command {
            Some(Commands::Ask { device, question }) => {
                assert_eq!(device.device.as_deref(), Some("d1"));
                assert_eq!(question.join(" "), "今天 熱嗎");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["tempdash", "ask"]).is_err());
    }

    #[test]
    fn test_history_days_range() {
        let cli = Cli::try_parse_from(["tempdash", "history", "--days", "30"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History { days: Some(30), .. })
        ));
        assert!(Cli::try_parse_from(["tempdash", "history", "--days", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tempdash",
            "devices",
            "--format",
            "json",
            "--url",
            "http://example:5001",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.url.as_deref(), Some("http://example:5001"));
    }
}
