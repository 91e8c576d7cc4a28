//! ---
//! act_section: "01-core-functionality"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Shared primitives and utilities for the AirCheck TH workspace."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;
use url::Url;

use crate::logging::LogFormat;

fn default_openweather_base() -> String {
    "https://api.openweathermap.org".to_owned()
}

fn default_air4thai_base() -> String {
    "http://air4thai.pcd.go.th/webV2/history/api/data.php".to_owned()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(3600)
}

fn default_simulation_seed() -> u64 {
    0x4149_5243u64
}

fn default_max_days() -> u32 {
    8
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target/datasets")
}

fn default_export_format() -> ExportFormat {
    ExportFormat::Csv
}

fn default_users_path() -> PathBuf {
    PathBuf::from("target/access/users.toml")
}

fn default_usage_log_path() -> PathBuf {
    PathBuf::from("target/access/usage.jsonl")
}

fn default_admin_username() -> String {
    "siwanon".to_owned()
}

fn default_seed_admin() -> bool {
    true
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_rain_washout_multiplier() -> f64 {
    0.6
}

fn default_rain_cooling_offset() -> f64 {
    -1.0
}

fn default_drizzle_washout_multiplier() -> f64 {
    0.85
}

fn default_strong_sun_multiplier() -> f64 {
    1.1
}

fn default_strong_sun_offset() -> f64 {
    3.0
}

fn default_light_sun_offset() -> f64 {
    2.0
}

fn default_wind_dispersal_multiplier() -> f64 {
    0.8
}

fn default_wind_gust_offset() -> f64 {
    2.5
}

fn default_calm_air_multiplier() -> f64 {
    1.3
}

fn default_calm_air_offset() -> f64 {
    -0.5
}

fn default_extreme_heat_offset() -> f64 {
    4.0
}

fn default_extreme_cold_offset() -> f64 {
    -4.0
}

fn default_odor_multiplier() -> f64 {
    1.2
}

fn default_traffic_multiplier() -> f64 {
    1.4
}

fn default_burning_multiplier() -> f64 {
    1.3
}

fn default_near_road_multiplier() -> f64 {
    1.2
}

fn default_factory_downwind_multiplier() -> f64 {
    1.4
}

fn default_rush_hour_multiplier() -> f64 {
    1.3
}

/// Primary configuration object for the AirCheck TH toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
///
/// `source` is `None` when no configuration file was found and the
/// built-in defaults are in effect.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "AIRCHECK_CONFIG";

    /// Load configuration from disk, respecting the `AIRCHECK_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    ///
    /// Falls back to the built-in defaults when neither the environment
    /// override nor any candidate path exists.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!("no configuration file found, using built-in defaults");
        let config = AppConfig::default();
        config.validate()?;
        Ok(LoadedAppConfig {
            config,
            source: None,
        })
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.reference.validate()?;
        self.simulation.validate()?;
        self.rules.validate()?;
        self.access.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceConfig::default(),
            simulation: SimulationConfig::default(),
            rules: RulesConfig::default(),
            export: ExportConfig::default(),
            access: AccessConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Endpoints and fetch policy for the reference-data clients.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    #[serde(default = "default_openweather_base")]
    pub openweather_base: String,
    #[serde(default)]
    pub openweather_api_key: Option<String>,
    #[serde(default = "default_air4thai_base")]
    pub air4thai_base: String,
    #[serde(default = "default_http_timeout")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub http_timeout: Duration,
    #[serde(default = "default_cache_ttl")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub cache_ttl: Duration,
}

impl ReferenceConfig {
    pub const ENV_OPENWEATHER_KEY: &str = "AIRCHECK_OPENWEATHER_KEY";

    /// Effective OpenWeather API key, preferring the environment override.
    /// `None` means the weather fetch is skipped and static defaults apply.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(Self::ENV_OPENWEATHER_KEY)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.openweather_api_key.clone())
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.openweather_base)
            .with_context(|| format!("invalid openweather_base '{}'", self.openweather_base))?;
        Url::parse(&self.air4thai_base)
            .with_context(|| format!("invalid air4thai_base '{}'", self.air4thai_base))?;
        if self.http_timeout.is_zero() {
            return Err(anyhow!("reference http_timeout must be greater than zero"));
        }
        if self.cache_ttl.is_zero() {
            return Err(anyhow!("reference cache_ttl must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            openweather_base: default_openweather_base(),
            openweather_api_key: None,
            air4thai_base: default_air4thai_base(),
            http_timeout: default_http_timeout(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

/// Run-level knobs for the simulation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_simulation_seed")]
    pub seed: u64,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_days == 0 {
            return Err(anyhow!("simulation max_days must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_simulation_seed(),
            max_days: default_max_days(),
        }
    }
}

/// Multipliers and offsets applied by the situation rule table.
///
/// The defaults reproduce the calibrated values of the planning team;
/// deployments may tune individual rules without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_rain_washout_multiplier")]
    pub rain_washout_multiplier: f64,
    #[serde(default = "default_rain_cooling_offset")]
    pub rain_cooling_offset: f64,
    #[serde(default = "default_drizzle_washout_multiplier")]
    pub drizzle_washout_multiplier: f64,
    #[serde(default = "default_strong_sun_multiplier")]
    pub strong_sun_multiplier: f64,
    #[serde(default = "default_strong_sun_offset")]
    pub strong_sun_offset: f64,
    #[serde(default = "default_light_sun_offset")]
    pub light_sun_offset: f64,
    #[serde(default = "default_wind_dispersal_multiplier")]
    pub wind_dispersal_multiplier: f64,
    #[serde(default = "default_wind_gust_offset")]
    pub wind_gust_offset: f64,
    #[serde(default = "default_calm_air_multiplier")]
    pub calm_air_multiplier: f64,
    #[serde(default = "default_calm_air_offset")]
    pub calm_air_offset: f64,
    #[serde(default = "default_extreme_heat_offset")]
    pub extreme_heat_offset: f64,
    #[serde(default = "default_extreme_cold_offset")]
    pub extreme_cold_offset: f64,
    #[serde(default = "default_odor_multiplier")]
    pub odor_multiplier: f64,
    #[serde(default = "default_traffic_multiplier")]
    pub traffic_multiplier: f64,
    #[serde(default = "default_burning_multiplier")]
    pub burning_multiplier: f64,
    #[serde(default = "default_near_road_multiplier")]
    pub near_road_multiplier: f64,
    #[serde(default = "default_factory_downwind_multiplier")]
    pub factory_downwind_multiplier: f64,
    #[serde(default = "default_rush_hour_multiplier")]
    pub rush_hour_multiplier: f64,
    #[serde(default)]
    pub rush_hour_enabled: bool,
}

impl RulesConfig {
    pub fn validate(&self) -> Result<()> {
        let multipliers = [
            ("rain_washout_multiplier", self.rain_washout_multiplier),
            ("drizzle_washout_multiplier", self.drizzle_washout_multiplier),
            ("strong_sun_multiplier", self.strong_sun_multiplier),
            ("wind_dispersal_multiplier", self.wind_dispersal_multiplier),
            ("calm_air_multiplier", self.calm_air_multiplier),
            ("odor_multiplier", self.odor_multiplier),
            ("traffic_multiplier", self.traffic_multiplier),
            ("burning_multiplier", self.burning_multiplier),
            ("near_road_multiplier", self.near_road_multiplier),
            (
                "factory_downwind_multiplier",
                self.factory_downwind_multiplier,
            ),
            ("rush_hour_multiplier", self.rush_hour_multiplier),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value <= 0.0 {
                return Err(anyhow!(
                    "rule multiplier '{}' must be positive and finite (got {})",
                    name,
                    value
                ));
            }
        }
        let offsets = [
            ("rain_cooling_offset", self.rain_cooling_offset),
            ("strong_sun_offset", self.strong_sun_offset),
            ("light_sun_offset", self.light_sun_offset),
            ("wind_gust_offset", self.wind_gust_offset),
            ("calm_air_offset", self.calm_air_offset),
            ("extreme_heat_offset", self.extreme_heat_offset),
            ("extreme_cold_offset", self.extreme_cold_offset),
        ];
        for (name, value) in offsets {
            if !value.is_finite() {
                return Err(anyhow!("rule offset '{}' must be finite", name));
            }
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rain_washout_multiplier: default_rain_washout_multiplier(),
            rain_cooling_offset: default_rain_cooling_offset(),
            drizzle_washout_multiplier: default_drizzle_washout_multiplier(),
            strong_sun_multiplier: default_strong_sun_multiplier(),
            strong_sun_offset: default_strong_sun_offset(),
            light_sun_offset: default_light_sun_offset(),
            wind_dispersal_multiplier: default_wind_dispersal_multiplier(),
            wind_gust_offset: default_wind_gust_offset(),
            calm_air_multiplier: default_calm_air_multiplier(),
            calm_air_offset: default_calm_air_offset(),
            extreme_heat_offset: default_extreme_heat_offset(),
            extreme_cold_offset: default_extreme_cold_offset(),
            odor_multiplier: default_odor_multiplier(),
            traffic_multiplier: default_traffic_multiplier(),
            burning_multiplier: default_burning_multiplier(),
            near_road_multiplier: default_near_road_multiplier(),
            factory_downwind_multiplier: default_factory_downwind_multiplier(),
            rush_hour_multiplier: default_rush_hour_multiplier(),
            rush_hour_enabled: false,
        }
    }
}

/// Serialization target for exported datasets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Both,
}

impl ExportFormat {
    pub fn wants_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn wants_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }
}

/// Destination and format for dataset exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_export_format")]
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: default_export_format(),
        }
    }
}

/// Locations of the flat-file user store and usage log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,
    #[serde(default = "default_usage_log_path")]
    pub usage_log_path: PathBuf,
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_seed_admin")]
    pub seed_admin: bool,
}

impl AccessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.admin_username.trim().is_empty() {
            return Err(anyhow!("access admin_username must not be empty"));
        }
        Ok(())
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            users_path: default_users_path(),
            usage_log_path: default_usage_log_path(),
            admin_username: default_admin_username(),
            seed_admin: default_seed_admin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.max_days, 8);
        assert_eq!(config.reference.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: AppConfig = r#"
            [simulation]
            seed = 42

            [rules]
            rain_washout_multiplier = 0.5
            rush_hour_enabled = true
        "#
        .parse()
        .expect("partial config parses");
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.simulation.max_days, 8);
        assert_eq!(config.rules.rain_washout_multiplier, 0.5);
        assert!(config.rules.rush_hour_enabled);
        assert_eq!(config.rules.calm_air_multiplier, 1.3);
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let parsed = r#"
            [rules]
            near_road_multiplier = 0.0
        "#
        .parse::<AppConfig>();
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_zero_http_timeout() {
        let parsed = r#"
            [reference]
            http_timeout = 0
        "#
        .parse::<AppConfig>();
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_malformed_endpoint() {
        let parsed = r#"
            [reference]
            openweather_base = "not a url"
        "#
        .parse::<AppConfig>();
        assert!(parsed.is_err());
    }

    #[test]
    fn load_falls_back_to_defaults_without_candidates() {
        let loaded = AppConfig::load_with_source(&[PathBuf::from(
            "target/does-not-exist/aircheck.toml",
        )])
        .expect("defaults load");
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.simulation.max_days, 8);
    }

    #[test]
    fn loads_config_from_candidate_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("aircheck.toml");
        fs::write(&path, "[simulation]\nseed = 7\n").expect("write config");
        let loaded = AppConfig::load_with_source(&[path.clone()]).expect("config loads");
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.simulation.seed, 7);
    }
}
