//! ---
//! act_section: "06-cli"
//! act_subsection: "binary"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Operator CLI for AirCheck TH dataset generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use aircheck_common::config::{AppConfig, LoadedAppConfig};
use aircheck_common::{init_tracing, VersionInfo};

mod activity;
mod fetch;
mod generate;
mod scenario;
mod users;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "AirCheck TH scenario simulation and dataset export utility",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print extended version information and exit"
    )]
    version: bool,
    /// Configuration file (AIRCHECK_CONFIG and configs/ are tried when absent).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run a scenario and export the dataset")]
    Generate(generate::GenerateCommand),
    #[command(about = "Fetch the reference baseline for a province")]
    Fetch(fetch::FetchCommand),
    #[command(subcommand, about = "Scenario file helpers")]
    Scenario(scenario::ScenarioCommand),
    #[command(subcommand, about = "User management")]
    Users(users::UsersCommand),
    #[command(about = "Show recent usage activity (admin only)")]
    Activity(activity::ActivityCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", VersionInfo::current().extended());
        return Ok(());
    }
    let Some(command) = cli.command else {
        anyhow::bail!("no command given; run with --help for usage");
    };

    let loaded = load_config(cli.config.as_ref())?;
    init_tracing("aircheckctl", &loaded.config.logging)?;

    match command {
        Commands::Generate(cmd) => generate::run(cmd, &loaded.config)?,
        Commands::Fetch(cmd) => fetch::run(cmd, &loaded.config)?,
        Commands::Scenario(cmd) => scenario::run(cmd, &loaded.config)?,
        Commands::Users(cmd) => users::run(cmd, &loaded.config)?,
        Commands::Activity(cmd) => activity::run(cmd, &loaded.config)?,
    }
    Ok(())
}

fn load_config(flag: Option<&PathBuf>) -> Result<LoadedAppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = flag {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/aircheck.toml"));
    candidates.push(PathBuf::from("configs/example.dev.toml"));
    AppConfig::load_with_source(&candidates)
}
