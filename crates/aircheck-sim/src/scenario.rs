//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::situation::{SiteContext, Situation, WindDirection};
use crate::variable::Variable;

/// Provinces covered by the Air4Thai history feed.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Province {
    Rayong,
    Bangkok,
    Ayutthaya,
    Saraburi,
    Ratchaburi,
    Chonburi,
    Chanthaburi,
}

impl Province {
    /// Thai name used by the Air4Thai history endpoint.
    pub fn thai_name(&self) -> &'static str {
        match self {
            Province::Rayong => "ระยอง",
            Province::Bangkok => "กรุงเทพมหานคร",
            Province::Ayutthaya => "พระนครศรีอยุธยา",
            Province::Saraburi => "สระบุรี",
            Province::Ratchaburi => "ราชบุรี",
            Province::Chonburi => "ชลบุรี",
            Province::Chanthaburi => "จันทบุรี",
        }
    }

    /// English place name accepted by the OpenWeather city query.
    pub fn query_name(&self) -> &'static str {
        match self {
            Province::Rayong => "Rayong",
            Province::Bangkok => "Bangkok",
            Province::Ayutthaya => "Phra Nakhon Si Ayutthaya",
            Province::Saraburi => "Saraburi",
            Province::Ratchaburi => "Ratchaburi",
            Province::Chonburi => "Chon Buri",
            Province::Chanthaburi => "Chanthaburi",
        }
    }
}

/// Complete description of one generation run: the site, the date range,
/// the requested variables, and one situation per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunScenario {
    pub province: Province,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub site: SiteContext,
    #[serde(default = "Variable::default_set")]
    pub variables: Vec<Variable>,
    pub days: Vec<Situation>,
}

impl RunScenario {
    /// Load a scenario file, dispatching on the extension.
    pub fn load(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => anyhow::bail!("unsupported scenario format: {}", path.display()),
        }
    }

    fn from_yaml(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read scenario file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid scenario YAML {}", path.display()))
    }

    fn from_json(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read scenario file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid scenario JSON {}", path.display()))
    }

    /// A starter scenario with uneventful days, used by `scenario template`.
    pub fn template(province: Province, start_date: NaiveDate, days: u32) -> Self {
        Self {
            province,
            start_date,
            site: SiteContext::default(),
            variables: Variable::default_set(),
            days: (0..days)
                .map(|_| Situation::uneventful(WindDirection::Ne))
                .collect(),
        }
    }

    /// Structural checks before a run. `max_days` comes from configuration.
    pub fn validate(&self, max_days: u32) -> Result<()> {
        if self.days.is_empty() {
            return Err(anyhow!("scenario must describe at least one day"));
        }
        if self.days.len() > max_days as usize {
            return Err(anyhow!(
                "scenario spans {} days, maximum is {}",
                self.days.len(),
                max_days
            ));
        }
        if self.variables.is_empty() {
            return Err(anyhow!("scenario must request at least one variable"));
        }
        Ok(())
    }

    /// Requested variables with duplicates removed, first occurrence wins.
    pub fn requested_variables(&self) -> Vec<Variable> {
        let mut seen = Vec::with_capacity(self.variables.len());
        for &variable in &self.variables {
            if !seen.contains(&variable) {
                seen.push(variable);
            }
        }
        seen
    }

    /// Last simulated calendar date.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(self.days.len() as i64 - 1)
    }

    /// The simulated dates paired with their situations, in order.
    pub fn dates(&self) -> impl Iterator<Item = (NaiveDate, &Situation)> {
        self.days
            .iter()
            .enumerate()
            .map(move |(index, situation)| {
                (self.start_date + Duration::days(index as i64), situation)
            })
    }

    /// `AirCheck_<province>_<YYYYMMDD>_<YYYYMMDD>`, the stem every export
    /// artifact shares.
    pub fn file_stem(&self) -> String {
        format!(
            "AirCheck_{}_{}_{}",
            self.province,
            self.start_date.format("%Y%m%d"),
            self.end_date().format("%Y%m%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    fn sample_yaml() -> &'static str {
        r#"
province: rayong
start_date: 2024-03-04
site:
  near_road: true
  near_factory: true
  factory_direction: SW
variables: [NO, NO2, NOx, Temp]
days:
  - wind_direction: SW
    rain: heavy
    wind: calm
  - wind_direction: NE
    sun: strong
    event: heavy-traffic
"#
    }

    #[test]
    fn loads_yaml_scenarios() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(sample_yaml().as_bytes()).unwrap();
        file.flush().unwrap();
        let scenario = RunScenario::load(file.path()).unwrap();
        assert_eq!(scenario.province, Province::Rayong);
        assert_eq!(scenario.days.len(), 2);
        assert!(scenario.site.near_road);
        assert_eq!(scenario.site.factory_direction, WindDirection::Sw);
        assert_eq!(
            scenario.end_date(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn loads_json_scenarios() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = r#"{
            "province": "bangkok",
            "start_date": "2024-01-01",
            "days": [{"wind_direction": "NE"}]
        }"#;
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        let scenario = RunScenario::load(file.path()).unwrap();
        assert_eq!(scenario.province, Province::Bangkok);
        // Omitted variable list falls back to the default set.
        assert_eq!(scenario.variables, Variable::default_set());
    }

    #[test]
    fn rejects_unknown_extensions() {
        assert!(RunScenario::load(Path::new("scenario.toml")).is_err());
    }

    #[test]
    fn validate_enforces_day_cap() {
        let scenario = RunScenario::template(
            Province::Rayong,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            9,
        );
        assert!(scenario.validate(8).is_err());
        assert!(scenario.validate(9).is_ok());
    }

    #[test]
    fn validate_rejects_empty_days_and_variables() {
        let mut scenario = RunScenario::template(
            Province::Rayong,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            0,
        );
        assert!(scenario.validate(8).is_err());
        scenario.days.push(Situation::uneventful(WindDirection::Ne));
        scenario.variables.clear();
        assert!(scenario.validate(8).is_err());
    }

    #[test]
    fn requested_variables_drop_duplicates_in_order() {
        let mut scenario = RunScenario::template(
            Province::Rayong,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            1,
        );
        scenario.variables = vec![
            Variable::No2,
            Variable::No,
            Variable::No2,
            Variable::Temp,
            Variable::No,
        ];
        assert_eq!(
            scenario.requested_variables(),
            vec![Variable::No2, Variable::No, Variable::Temp]
        );
    }

    #[test]
    fn file_stem_encodes_location_and_range() {
        let scenario = RunScenario::template(
            Province::Chonburi,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            3,
        );
        assert_eq!(scenario.file_stem(), "AirCheck_chonburi_20240304_20240306");
    }

    #[test]
    fn province_parses_from_kebab_labels() {
        assert_eq!(Province::from_str("rayong").unwrap(), Province::Rayong);
        assert_eq!(
            Province::from_str("chanthaburi").unwrap(),
            Province::Chanthaburi
        );
        assert!(Province::from_str("mars").is_err());
        assert_eq!(Province::Ayutthaya.thai_name(), "พระนครศรีอยุธยา");
        assert_eq!(Province::Chonburi.query_name(), "Chon Buri");
    }

    #[test]
    fn dates_walk_the_range_in_order() {
        let scenario = RunScenario::template(
            Province::Rayong,
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
            3,
        );
        let dates: Vec<NaiveDate> = scenario.dates().map(|(date, _)| date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ]
        );
    }
}
