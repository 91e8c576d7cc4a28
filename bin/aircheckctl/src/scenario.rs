//! ---
//! act_section: "06-cli"
//! act_subsection: "binary"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Operator CLI for AirCheck TH dataset generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use aircheck_common::config::AppConfig;
use aircheck_sim::{Province, RunScenario};

/// Scenario file helpers.
#[derive(Debug, Subcommand)]
pub enum ScenarioCommand {
    /// Write a starter scenario for the given province and date range.
    Template(TemplateCommand),
    /// Check a scenario file against the configured limits.
    Validate(ValidateCommand),
}

/// Dispatch entry point for scenario subcommands.
pub fn run(command: ScenarioCommand, config: &AppConfig) -> Result<()> {
    match command {
        ScenarioCommand::Template(cmd) => cmd.execute(config),
        ScenarioCommand::Validate(cmd) => cmd.execute(config),
    }
}

#[derive(Debug, Args)]
pub struct TemplateCommand {
    /// Province the scenario simulates.
    #[arg(long, value_name = "PROVINCE")]
    province: Province,

    /// First simulated date (YYYY-MM-DD).
    #[arg(long = "start-date", value_name = "DATE")]
    start_date: NaiveDate,

    /// Number of days to template.
    #[arg(long, value_name = "N", default_value_t = 3)]
    days: u32,

    /// Write to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl TemplateCommand {
    fn execute(self, config: &AppConfig) -> Result<()> {
        if self.days == 0 || self.days > config.simulation.max_days {
            anyhow::bail!(
                "days must be between 1 and {}",
                config.simulation.max_days
            );
        }
        let scenario = RunScenario::template(self.province, self.start_date, self.days);
        let body =
            serde_yaml::to_string(&scenario).context("failed to serialise scenario template")?;
        match &self.output {
            Some(path) => {
                fs::write(path, &body)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Scenario template written to {}", path.display());
            }
            None => print!("{body}"),
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Scenario file to check.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl ValidateCommand {
    fn execute(self, config: &AppConfig) -> Result<()> {
        let scenario = RunScenario::load(&self.file)?;
        scenario.validate(config.simulation.max_days)?;
        println!(
            "Scenario OK: {} covering {} day(s), {} variable(s), stem {}",
            scenario.province,
            scenario.days.len(),
            scenario.requested_variables().len(),
            scenario.file_stem()
        );
        Ok(())
    }
}
