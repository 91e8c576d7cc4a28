//! ---
//! act_section: "03-reference-data"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Best-effort reference data clients and caching."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use aircheck_common::config::ReferenceConfig;
use aircheck_sim::{Province, Variable};

use crate::error::ReferenceError;

/// Provider of recent pollutant concentrations.
#[async_trait]
pub trait PollutantSource: Send + Sync {
    /// Fetch per-variable baseline concentrations for a province.
    async fn latest_pollutants(
        &self,
        province: Province,
    ) -> Result<IndexMap<Variable, f64>, ReferenceError>;
}

/// Client for the Air4Thai province history feed.
///
/// The feed reports one record per monitoring station; readings are
/// averaged across stations. Offline stations publish negative sentinel
/// values, which are dropped before averaging.
pub struct Air4ThaiClient {
    http: reqwest::Client,
    base: String,
}

impl Air4ThaiClient {
    /// Build a client against the configured history endpoint.
    pub fn new(config: &ReferenceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.air4thai_base.clone(),
        })
    }
}

#[async_trait]
impl PollutantSource for Air4ThaiClient {
    async fn latest_pollutants(
        &self,
        province: Province,
    ) -> Result<IndexMap<Variable, f64>, ReferenceError> {
        let response = self
            .http
            .get(&self.base)
            .query(&[("province", province.thai_name()), ("station", "all")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReferenceError::Status(status.as_u16()));
        }
        let payload: ProvinceFeed = response.json().await?;
        let baselines = payload.station_averages();
        debug!(
            province = %province,
            stations = payload.stations.len(),
            pollutants = baselines.len(),
            "air4thai feed received"
        );
        Ok(baselines)
    }
}

#[derive(Debug, Deserialize)]
struct ProvinceFeed {
    #[serde(default)]
    stations: Vec<Station>,
}

#[derive(Debug, Deserialize)]
struct Station {
    #[serde(rename = "AQILast", default)]
    latest: Option<StationReadings>,
}

#[derive(Debug, Deserialize, Default)]
struct StationReadings {
    #[serde(rename = "NO2", default)]
    no2: Option<PollutantReading>,
    #[serde(rename = "SO2", default)]
    so2: Option<PollutantReading>,
    #[serde(rename = "CO", default)]
    co: Option<PollutantReading>,
    #[serde(rename = "O3", default)]
    o3: Option<PollutantReading>,
}

/// The feed mixes numeric and quoted values, so decode leniently.
#[derive(Debug, Deserialize)]
struct PollutantReading {
    #[serde(default)]
    value: serde_json::Value,
}

impl PollutantReading {
    fn numeric(&self) -> Option<f64> {
        match &self.value {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl ProvinceFeed {
    /// Average each pollutant over the stations that report a usable value.
    fn station_averages(&self) -> IndexMap<Variable, f64> {
        let mut averages = IndexMap::new();
        let channels: [(Variable, fn(&StationReadings) -> Option<&PollutantReading>); 4] = [
            (Variable::No2, |readings| readings.no2.as_ref()),
            (Variable::So2, |readings| readings.so2.as_ref()),
            (Variable::Co, |readings| readings.co.as_ref()),
            (Variable::O3, |readings| readings.o3.as_ref()),
        ];
        for (variable, channel) in channels {
            let values: Vec<f64> = self
                .stations
                .iter()
                .filter_map(|station| station.latest.as_ref())
                .filter_map(channel)
                .filter_map(PollutantReading::numeric)
                .filter(|value| *value >= 0.0)
                .collect();
            if !values.is_empty() {
                averages.insert(variable, values.iter().sum::<f64>() / values.len() as f64);
            }
        }
        averages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(json: &str) -> ProvinceFeed {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn averages_across_stations() {
        let feed = feed(
            r#"{
                "stations": [
                    {"AQILast": {"NO2": {"value": 10.0}, "SO2": {"value": "4.0"}}},
                    {"AQILast": {"NO2": {"value": "14"}, "CO": {"value": 0.6}}}
                ]
            }"#,
        );
        let averages = feed.station_averages();
        assert_eq!(averages.get(&Variable::No2), Some(&12.0));
        assert_eq!(averages.get(&Variable::So2), Some(&4.0));
        assert_eq!(averages.get(&Variable::Co), Some(&0.6));
        assert_eq!(averages.get(&Variable::O3), None);
    }

    #[test]
    fn drops_offline_sentinels_and_junk() {
        let feed = feed(
            r#"{
                "stations": [
                    {"AQILast": {"NO2": {"value": -1}, "O3": {"value": "n/a"}}},
                    {"AQILast": {"NO2": {"value": 8.0}}},
                    {"AQILast": null},
                    {}
                ]
            }"#,
        );
        let averages = feed.station_averages();
        assert_eq!(averages.get(&Variable::No2), Some(&8.0));
        assert_eq!(averages.get(&Variable::O3), None);
    }

    #[test]
    fn empty_feed_yields_no_baselines() {
        let averages = feed(r#"{"stations": []}"#).station_averages();
        assert!(averages.is_empty());
        let averages = feed(r#"{}"#).station_averages();
        assert!(averages.is_empty());
    }
}
