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
use clap::{Args, Subcommand, ValueEnum};

use aircheck_access::{Role, UserStore};
use aircheck_common::config::AppConfig;

/// User management subcommands.
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List stored users.
    List,
    /// Add a user.
    Add(AddCommand),
    /// Change a stored user's role.
    Role(RoleCommand),
}

#[derive(Debug, Args)]
pub struct AddCommand {
    /// Username to add.
    #[arg(value_name = "NAME")]
    username: String,

    /// Role for the new user.
    #[arg(long, value_enum, default_value_t = RoleArg::User)]
    role: RoleArg,
}

#[derive(Debug, Args)]
pub struct RoleCommand {
    /// Username to update.
    #[arg(value_name = "NAME")]
    username: String,

    /// New role.
    #[arg(value_name = "ROLE", value_enum)]
    role: RoleArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

/// Execute the supplied user management command.
pub fn run(command: UsersCommand, config: &AppConfig) -> Result<()> {
    let mut store = UserStore::open(&config.access)?;
    match command {
        UsersCommand::List => {
            if store.is_empty() {
                println!("No users stored");
                return Ok(());
            }
            println!("{:<20} {:<6} CREATED", "USERNAME", "ROLE");
            for user in store.users() {
                println!(
                    "{:<20} {:<6} {}",
                    user.username,
                    user.role,
                    user.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        UsersCommand::Add(cmd) => {
            let record = store.add(&cmd.username, cmd.role.into())?;
            println!("Added {} with role {}", record.username, record.role);
        }
        UsersCommand::Role(cmd) => {
            let record = store.set_role(&cmd.username, cmd.role.into())?;
            println!("{} is now {}", record.username, record.role);
        }
    }
    Ok(())
}
