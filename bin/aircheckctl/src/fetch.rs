//! ---
//! act_section: "06-cli"
//! act_subsection: "binary"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Operator CLI for AirCheck TH dataset generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde_json::json;
use tokio::runtime::Runtime;

use aircheck_access::AccessControl;
use aircheck_common::config::AppConfig;
use aircheck_reference::ReferenceService;
use aircheck_sim::Province;

/// Options for a standalone reference fetch.
#[derive(Debug, Args)]
pub struct FetchCommand {
    /// Province to fetch the baseline for.
    #[arg(long, value_name = "PROVINCE")]
    province: Province,

    /// Username the fetch is recorded under.
    #[arg(long, value_name = "NAME", env = "AIRCHECK_USER")]
    user: String,
}

/// Fetch today's reference baseline and print it as YAML.
pub fn run(command: FetchCommand, config: &AppConfig) -> Result<()> {
    let mut access = AccessControl::open(&config.access)?;
    let session = access.login(&command.user)?;

    let today = Utc::now().date_naive();
    let service = ReferenceService::from_config(&config.reference)?;
    let runtime = Runtime::new()?;
    let baseline = runtime.block_on(service.baseline(command.province, today, today));

    access.record_fetch(
        &session,
        json!({
            "province": command.province,
            "weather_source": baseline.weather_source,
            "pollutant_source": baseline.pollutant_source,
        }),
    )?;

    let preview =
        serde_yaml::to_string(&baseline).context("failed to serialise reference baseline")?;
    println!(
        "Reference baseline for {} ({}):",
        command.province.query_name(),
        today
    );
    print!("{preview}");
    Ok(())
}
