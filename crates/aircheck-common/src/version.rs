//! ---
//! act_section: "01-core-functionality"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Shared primitives and utilities for the AirCheck TH workspace."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use serde::Serialize;

/// Compile-time version metadata for AirCheck TH binaries.
///
/// The `VERGEN_*` variables are populated by release builds; local builds
/// fall back to `UNKNOWN` placeholders.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Workspace semantic version.
    pub semver: String,
    /// Git commit hash captured at build time.
    pub git_sha: String,
    /// Build timestamp from the compilation environment.
    pub build_timestamp: String,
    /// Target triple used for the build.
    pub target: String,
}

impl VersionInfo {
    /// Construct a new [`VersionInfo`] instance using environment metadata.
    #[must_use]
    pub fn current() -> Self {
        Self {
            semver: env!("CARGO_PKG_VERSION").to_owned(),
            git_sha: option_env!("VERGEN_GIT_SHA")
                .unwrap_or("UNKNOWN")
                .to_owned(),
            build_timestamp: option_env!("VERGEN_BUILD_TIMESTAMP")
                .unwrap_or("UNKNOWN")
                .to_owned(),
            target: option_env!("VERGEN_CARGO_TARGET_TRIPLE")
                .unwrap_or("UNKNOWN")
                .to_owned(),
        }
    }

    /// Human readable banner used in logging surfaces.
    #[must_use]
    pub fn banner(&self) -> String {
        format!("AirCheck TH v{} (git {})", self.semver, self.git_sha)
    }

    /// Extended string containing build metadata suitable for `--version` flags.
    #[must_use]
    pub fn extended(&self) -> String {
        format!(
            "{banner}\nBuilt: {built}\nTarget: {target}",
            banner = self.banner(),
            built = self.build_timestamp,
            target = self.target
        )
    }
}
