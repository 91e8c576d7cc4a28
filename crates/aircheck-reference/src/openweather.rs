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
use serde::Deserialize;
use tracing::debug;

use aircheck_common::config::ReferenceConfig;
use aircheck_sim::Province;

use crate::error::ReferenceError;

/// Current-conditions snapshot used as the meteorological baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Air temperature in degrees Celsius.
    pub temp_c: f64,
    /// Relative humidity in percent.
    pub rh_pct: f64,
    /// Wind speed in m/s; the upstream wind block is optional.
    pub ws_ms: Option<f64>,
    /// Wind direction in degrees; the upstream wind block is optional.
    pub wd_deg: Option<f64>,
}

/// Provider of the meteorological baseline.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the current conditions for a province.
    async fn current_weather(&self, province: Province)
        -> Result<WeatherObservation, ReferenceError>;
}

/// Thin client for the OpenWeather current-weather endpoint.
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Build a client with the configured base URL, key, and timeout.
    pub fn new(config: &ReferenceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.openweather_base.trim_end_matches('/').to_owned(),
            api_key: config.api_key(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/data/2.5/weather", self.base)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_weather(
        &self,
        province: Province,
    ) -> Result<WeatherObservation, ReferenceError> {
        let Some(api_key) = &self.api_key else {
            return Err(ReferenceError::MissingApiKey);
        };
        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("q", province.query_name()),
                ("appid", api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReferenceError::Status(status.as_u16()));
        }
        let payload: CurrentWeather = response.json().await?;
        debug!(province = %province, temp = payload.main.temp, "openweather observation received");
        Ok(WeatherObservation {
            temp_c: payload.main.temp,
            rh_pct: payload.main.humidity,
            ws_ms: payload.wind.as_ref().and_then(|wind| wind.speed),
            wd_deg: payload.wind.as_ref().and_then(|wind| wind.deg),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainBlock,
    #[serde(default)]
    wind: Option<WindBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    deg: Option<f64>,
}
