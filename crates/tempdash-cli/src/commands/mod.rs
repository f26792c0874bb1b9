//! Command implementations for the CLI.

mod add_device;
mod ask;
mod config;
mod devices;
mod history;
mod latest;
mod stats;

pub use add_device::cmd_add_device;
pub use ask::{AskArgs, cmd_ask};
pub use config::cmd_config;
pub use devices::cmd_devices;
pub use history::{HistoryArgs, cmd_history};
pub use latest::cmd_latest;
pub use stats::cmd_stats;
