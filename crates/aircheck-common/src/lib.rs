//! ---
//! act_section: "01-core-functionality"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Shared primitives and utilities for the AirCheck TH workspace."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Core shared primitives for the AirCheck TH workspace.
//! This crate exposes configuration loading, logging bootstrap, and
//! version metadata utilities consumed across the workspace.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{
    AccessConfig, AppConfig, ExportConfig, ExportFormat, LoadedAppConfig, LoggingConfig,
    ReferenceConfig, RulesConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat};
pub use version::VersionInfo;
