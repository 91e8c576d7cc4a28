//! ---
//! act_section: "03-reference-data"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Best-effort reference data clients and caching."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{debug, warn};

use aircheck_common::config::ReferenceConfig;
use aircheck_sim::{BaselineSource, Province, ReferenceBaseline};

use crate::air4thai::{Air4ThaiClient, PollutantSource};
use crate::openweather::{OpenWeatherClient, WeatherSource};

type CacheKey = (Province, NaiveDate, NaiveDate);

struct CachedBaseline {
    baseline: ReferenceBaseline,
    fetched_at: Instant,
}

/// Combines both providers into one best-effort baseline lookup.
///
/// Lookups are cached per (province, date range) for `cache_ttl`; a miss
/// performs one fetch per provider and degrades to the static defaults on
/// any failure. This type never returns an error to its caller.
pub struct ReferenceService {
    weather: Arc<dyn WeatherSource>,
    pollutants: Arc<dyn PollutantSource>,
    cache: Mutex<HashMap<CacheKey, CachedBaseline>>,
    ttl: Duration,
}

impl ReferenceService {
    /// Wire up the real HTTP clients from configuration.
    pub fn from_config(config: &ReferenceConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(OpenWeatherClient::new(config)?),
            Arc::new(Air4ThaiClient::new(config)?),
            config.cache_ttl,
        ))
    }

    /// Assemble a service from explicit sources; tests inject stubs here.
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        pollutants: Arc<dyn PollutantSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            weather,
            pollutants,
            cache: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The baseline for a run. Infallible by design: the worst case is the
    /// all-static baseline.
    pub async fn baseline(
        &self,
        province: Province,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReferenceBaseline {
        let key = (province, start, end);
        if let Some(hit) = self.cached(&key) {
            debug!(province = %province, "reference baseline served from cache");
            return hit;
        }

        let mut baseline = ReferenceBaseline::static_defaults();
        match self.weather.current_weather(province).await {
            Ok(observation) => {
                baseline.temp_c = Some(observation.temp_c);
                baseline.rh_pct = Some(observation.rh_pct);
                baseline.ws_ms = observation.ws_ms;
                baseline.wd_deg = observation.wd_deg;
                baseline.weather_source = BaselineSource::OpenWeather;
            }
            Err(error) => {
                warn!(province = %province, error = %error, "weather fetch failed, using static defaults");
            }
        }
        match self.pollutants.latest_pollutants(province).await {
            Ok(averages) if !averages.is_empty() => {
                baseline.pollutants = averages;
                baseline.pollutant_source = BaselineSource::Air4Thai;
            }
            Ok(_) => {
                debug!(province = %province, "pollutant feed empty, bases stay synthetic");
            }
            Err(error) => {
                warn!(province = %province, error = %error, "pollutant fetch failed, bases stay synthetic");
            }
        }

        self.cache.lock().insert(
            key,
            CachedBaseline {
                baseline: baseline.clone(),
                fetched_at: Instant::now(),
            },
        );
        baseline
    }

    fn cached(&self, key: &CacheKey) -> Option<ReferenceBaseline> {
        let cache = self.cache.lock();
        cache
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.baseline.clone())
    }
}
