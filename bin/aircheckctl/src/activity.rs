//! ---
//! act_section: "06-cli"
//! act_subsection: "binary"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Operator CLI for AirCheck TH dataset generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use anyhow::Result;
use clap::Args;

use aircheck_access::{AccessControl, DEFAULT_TAIL_LIMIT};
use aircheck_common::config::AppConfig;

/// Options for the usage activity view.
#[derive(Debug, Args)]
pub struct ActivityCommand {
    /// Username requesting the view (must resolve to an administrator).
    #[arg(long, value_name = "NAME", env = "AIRCHECK_USER")]
    user: String,

    /// How many recent events to show.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TAIL_LIMIT)]
    limit: usize,
}

/// Print the most recent usage events, oldest first.
pub fn run(command: ActivityCommand, config: &AppConfig) -> Result<()> {
    let mut access = AccessControl::open(&config.access)?;
    let session = access.login(&command.user)?;
    let events = access.recent_activity(&session, command.limit)?;
    if events.is_empty() {
        println!("No activity recorded yet");
        return Ok(());
    }
    for event in &events {
        println!(
            "{:>5}  {}  {:<16} {:<8} {}",
            event.sequence,
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.username,
            event.action,
            event.detail
        );
    }
    Ok(())
}
