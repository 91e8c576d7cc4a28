//! ---
//! act_section: "03-reference-data"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Best-effort reference data clients and caching."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Reference data for anchoring simulations to current conditions.
//!
//! Two upstream providers are consulted once per run: OpenWeather for the
//! meteorological baseline and Air4Thai for recent pollutant levels. Both
//! are strictly best-effort: any failure degrades to the static defaults
//! and is logged, never propagated. Outcomes are cached per
//! (province, date range), degraded ones included, so one run performs at
//! most one attempt per provider.
#![warn(missing_docs)]

pub mod air4thai;
pub mod error;
pub mod openweather;
pub mod service;

pub use air4thai::{Air4ThaiClient, PollutantSource};
pub use error::ReferenceError;
pub use openweather::{OpenWeatherClient, WeatherObservation, WeatherSource};
pub use service::ReferenceService;
