//! Terminal dashboard and command-line client for the tempdash backend.
//!
//! The backend stores temperature telemetry for named devices and answers
//! statistics, history and free-form analysis questions. This crate offers two
//! ways to look at it:
//!
//! - **Dashboard** (`tui` feature, default): device selector, live temperature,
//!   statistics with a daily breakdown, a weekly trend chart and an analysis chat
//! - **Commands**: one-shot queries suitable for scripts
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tui` | Interactive dashboard (also the default with no command) |
//! | `devices` | List devices known to the backend |
//! | `add-device` | Register a new device |
//! | `latest` | Latest temperature of a device |
//! | `stats` | Today/week/month statistics |
//! | `history` | Hourly-averaged history |
//! | `ask` | Ask the analysis endpoint a question |
//! | `config` | Manage CLI configuration |
//!
//! # Output Formats
//!
//! - **Text** (default): Human-readable tables
//! - **JSON**: Machine-readable JSON
//!
//! # Configuration
//!
//! Settings live in `~/.config/tempdash/config.toml` (or platform equivalent):
//! backend URL, default device, polling periods, chart window and the
//! suggested questions.
//!
//! # Environment Variables
//!
//! - `TEMPDASH_URL`: Backend base URL (overridden by `--url`)
//! - `TEMPDASH_DEVICE`: Device name or id (overridden by `--device`)
//! - `NO_COLOR`: Disable colored output when set
//!
//! # Examples
//!
//! ```bash
//! tempdash --url http://localhost:5001
//! tempdash stats --device MyTempSensor
//! tempdash ask --device MyTempSensor 本週溫度有異常嗎？
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod style;
pub mod util;

#[cfg(feature = "tui")]
pub mod tui;

pub use tempdash_core;
pub use tempdash_types;
