//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// Fallback temperature in degrees Celsius when no reference is available.
pub const DEFAULT_TEMP_C: f64 = 27.0;
/// Fallback relative humidity in percent when no reference is available.
pub const DEFAULT_RH_PCT: f64 = 65.0;
/// Fallback wind speed in m/s when no reference is available.
pub const DEFAULT_WS_MS: f64 = 2.5;
/// Fallback wind direction in degrees for report columns that require one.
pub const DEFAULT_WD_DEG: f64 = 90.0;

/// Provenance of one half of a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaselineSource {
    /// Live OpenWeather current-conditions response.
    OpenWeather,
    /// Station averages from the Air4Thai public feed.
    Air4Thai,
    /// Built-in static defaults.
    #[default]
    Static,
}

impl fmt::Display for BaselineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BaselineSource::OpenWeather => "openweather",
            BaselineSource::Air4Thai => "air4thai",
            BaselineSource::Static => "static",
        };
        f.write_str(label)
    }
}

/// Per-variable reference values anchoring the simulation.
///
/// Fields are nullable because every upstream provider is best-effort; the
/// accessors substitute the static defaults so the engine never has to care
/// where a number came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReferenceBaseline {
    pub temp_c: Option<f64>,
    pub rh_pct: Option<f64>,
    pub ws_ms: Option<f64>,
    pub wd_deg: Option<f64>,
    #[serde(default)]
    pub pollutants: IndexMap<Variable, f64>,
    #[serde(default)]
    pub weather_source: BaselineSource,
    #[serde(default)]
    pub pollutant_source: BaselineSource,
}

impl ReferenceBaseline {
    /// The all-defaults baseline used when every fetch failed or was skipped.
    pub fn static_defaults() -> Self {
        Self::default()
    }

    pub fn temp_or_default(&self) -> f64 {
        self.temp_c.unwrap_or(DEFAULT_TEMP_C)
    }

    pub fn rh_or_default(&self) -> f64 {
        self.rh_pct.unwrap_or(DEFAULT_RH_PCT)
    }

    pub fn ws_or_default(&self) -> f64 {
        self.ws_ms.unwrap_or(DEFAULT_WS_MS)
    }

    /// Reference concentration for a pollutant, when a provider supplied one.
    pub fn pollutant(&self, variable: Variable) -> Option<f64> {
        self.pollutants.get(&variable).copied()
    }

    /// True when no provider contributed anything.
    pub fn is_static(&self) -> bool {
        self.weather_source == BaselineSource::Static
            && self.pollutant_source == BaselineSource::Static
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_defaults_substitute_documented_constants() {
        let baseline = ReferenceBaseline::static_defaults();
        assert_eq!(baseline.temp_or_default(), 27.0);
        assert_eq!(baseline.rh_or_default(), 65.0);
        assert_eq!(baseline.ws_or_default(), 2.5);
        assert!(baseline.wd_deg.is_none());
        assert!(baseline.is_static());
    }

    #[test]
    fn provider_values_win_over_defaults() {
        let baseline = ReferenceBaseline {
            temp_c: Some(31.4),
            weather_source: BaselineSource::OpenWeather,
            ..ReferenceBaseline::default()
        };
        assert_eq!(baseline.temp_or_default(), 31.4);
        assert_eq!(baseline.rh_or_default(), 65.0);
        assert!(!baseline.is_static());
    }

    #[test]
    fn pollutant_lookup_misses_return_none() {
        let mut baseline = ReferenceBaseline::default();
        baseline.pollutants.insert(Variable::No2, 12.5);
        assert_eq!(baseline.pollutant(Variable::No2), Some(12.5));
        assert_eq!(baseline.pollutant(Variable::So2), None);
    }
}
