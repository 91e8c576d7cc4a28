//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Compass octant labels offered by the planner.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum WindDirection {
    Ne,
    Nw,
    Se,
    Sw,
}

impl WindDirection {
    /// Midpoint azimuth of the octant in degrees.
    pub fn degrees(&self) -> f64 {
        match self {
            WindDirection::Ne => 45.0,
            WindDirection::Se => 135.0,
            WindDirection::Sw => 225.0,
            WindDirection::Nw => 315.0,
        }
    }
}

/// Rain intensity for one day. Ordered from dry to heavy so rules can
/// match with a threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum RainLevel {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SunLevel {
    #[default]
    None,
    Light,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WindLevel {
    #[default]
    None,
    Calm,
    Light,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OdorLevel {
    #[default]
    None,
    Present,
}

/// Subjective temperature bucket reported by the planner. Only the two
/// extremes feed the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HeatLevel {
    #[default]
    None,
    Cold,
    Cool,
    Normal,
    Hot,
    VeryHot,
}

/// Sky cover. Recorded with the day but not consumed by any rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SkyLevel {
    #[default]
    None,
    Clear,
    Cloudy,
    Overcast,
}

/// Local activity near the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LocalEvent {
    #[default]
    None,
    HeavyTraffic,
    OpenBurning,
}

/// Qualitative descriptor for one calendar day. Immutable once entered.
///
/// Every field except the wind direction defaults to its `none` level, so
/// scenario files only spell out what actually happened that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub wind_direction: WindDirection,
    #[serde(default)]
    pub rain: RainLevel,
    #[serde(default)]
    pub sun: SunLevel,
    #[serde(default)]
    pub wind: WindLevel,
    #[serde(default)]
    pub odor: OdorLevel,
    #[serde(default)]
    pub heat: HeatLevel,
    #[serde(default)]
    pub sky: SkyLevel,
    #[serde(default)]
    pub event: LocalEvent,
}

impl Situation {
    /// A day with nothing going on beyond the prevailing wind direction.
    pub fn uneventful(wind_direction: WindDirection) -> Self {
        Self {
            wind_direction,
            rain: RainLevel::None,
            sun: SunLevel::None,
            wind: WindLevel::None,
            odor: OdorLevel::None,
            heat: HeatLevel::None,
            sky: SkyLevel::None,
            event: LocalEvent::None,
        }
    }
}

/// Run-global attributes of the monitored site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    #[serde(default)]
    pub near_road: bool,
    #[serde(default)]
    pub near_factory: bool,
    #[serde(default = "SiteContext::default_factory_direction")]
    pub factory_direction: WindDirection,
}

impl SiteContext {
    fn default_factory_direction() -> WindDirection {
        WindDirection::Ne
    }
}

impl Default for SiteContext {
    fn default() -> Self {
        Self {
            near_road: false,
            near_factory: false,
            factory_direction: Self::default_factory_direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octant_degrees_cover_the_compass() {
        assert_eq!(WindDirection::Ne.degrees(), 45.0);
        assert_eq!(WindDirection::Se.degrees(), 135.0);
        assert_eq!(WindDirection::Sw.degrees(), 225.0);
        assert_eq!(WindDirection::Nw.degrees(), 315.0);
    }

    #[test]
    fn rain_levels_order_by_intensity() {
        assert!(RainLevel::None < RainLevel::Light);
        assert!(RainLevel::Light < RainLevel::Moderate);
        assert!(RainLevel::Moderate < RainLevel::Heavy);
    }

    #[test]
    fn omitted_fields_default_to_none() {
        let situation: Situation =
            serde_yaml::from_str("wind_direction: NE\nrain: heavy\n").unwrap();
        assert_eq!(situation.wind_direction, WindDirection::Ne);
        assert_eq!(situation.rain, RainLevel::Heavy);
        assert_eq!(situation.sun, SunLevel::None);
        assert_eq!(situation.event, LocalEvent::None);
        assert_eq!(situation.sky, SkyLevel::None);
    }

    #[test]
    fn kebab_case_levels_round_trip() {
        let situation: Situation = serde_yaml::from_str(
            "wind_direction: SW\nheat: very-hot\nevent: open-burning\nwind: calm\n",
        )
        .unwrap();
        assert_eq!(situation.heat, HeatLevel::VeryHot);
        assert_eq!(situation.event, LocalEvent::OpenBurning);
        assert_eq!(situation.wind, WindLevel::Calm);
        let yaml = serde_yaml::to_string(&situation).unwrap();
        assert!(yaml.contains("very-hot"));
        assert!(yaml.contains("open-burning"));
    }

    #[test]
    fn site_context_defaults_are_inert() {
        let site = SiteContext::default();
        assert!(!site.near_road);
        assert!(!site.near_factory);
        assert_eq!(site.factory_direction, WindDirection::Ne);
    }
}
