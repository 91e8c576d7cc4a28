//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use rand::prelude::*;

use crate::baseline::ReferenceBaseline;
use crate::rules::{RuleOutcome, RuleTable};
use crate::situation::{SiteContext, Situation};
use crate::variable::Variable;

/// Hard caps applied after the formula; policy, not error conditions.
pub const NO2_CEILING: f64 = 20.0;
pub const RH_CEILING: f64 = 100.0;
pub const WS_CEILING: f64 = 4.0;

/// Pressure is simulated around a fixed sea-level value.
pub const BASE_PRESSURE_HPA: f64 = 1010.0;

// Uniform noise bands, one draw per simulated value. Pollutants lacking a
// reference concentration start from a small random base instead.
const POLLUTANT_BASE_RANGE: (f64, f64) = (2.0, 6.0);
const NO_NOISE: (f64, f64) = (0.5, 2.5);
const NO2_NOISE: (f64, f64) = (0.8, 2.8);
const SO2_NOISE: (f64, f64) = (0.5, 2.5);
const CO_NOISE: (f64, f64) = (0.1, 1.2);
const O3_BASE_RANGE: (f64, f64) = (25.0, 30.0);
const O3_NOISE: (f64, f64) = (5.0, 25.0);
const TEMP_NOISE: (f64, f64) = (-2.0, 2.0);
const RH_NOISE: (f64, f64) = (-10.0, 15.0);
const WS_NOISE: (f64, f64) = (-1.5, 1.5);
const PRESSURE_NOISE: (f64, f64) = (-6.0, 6.0);

/// Round to the two decimal places used throughout the exported tables.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Evaluates the per-variable formulas against a folded rule outcome.
///
/// The random source is injected via the seed so tests can pin a sequence
/// and assert exact range bounds.
#[derive(Debug)]
pub struct SimulationEngine {
    rules: RuleTable,
    rng: StdRng,
}

impl SimulationEngine {
    pub fn new(rules: RuleTable, seed: u64) -> Self {
        Self {
            rules,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// One synthetic value for `variable` under the day's situation.
    ///
    /// Returns `None` for NOx, which is derived from NO and NO2 during
    /// table assembly rather than simulated. All other variables always
    /// produce a value; missing baseline fields fall back to the static
    /// defaults instead of failing.
    pub fn simulate(
        &mut self,
        variable: Variable,
        situation: &Situation,
        hour: u32,
        site: &SiteContext,
        baseline: &ReferenceBaseline,
    ) -> Option<f64> {
        let RuleOutcome { multiplier, offset } = self.rules.fold(variable, situation, hour, site);
        let value = match variable {
            Variable::No => {
                self.pollutant_base(variable, baseline) * multiplier
                    + offset
                    + self.noise(NO_NOISE)
            }
            Variable::No2 => (self.pollutant_base(variable, baseline) * multiplier
                + offset
                + self.noise(NO2_NOISE))
            .min(NO2_CEILING),
            Variable::Nox => return None,
            Variable::So2 => {
                self.pollutant_base(variable, baseline) * multiplier
                    + offset
                    + self.noise(SO2_NOISE)
            }
            Variable::Co => {
                self.pollutant_base(variable, baseline) * multiplier
                    + offset
                    + self.noise(CO_NOISE)
            }
            Variable::O3 => self.noise(O3_BASE_RANGE) + offset + self.noise(O3_NOISE),
            Variable::Ws => {
                (baseline.ws_or_default() * multiplier + offset + self.noise(WS_NOISE))
                    .min(WS_CEILING)
            }
            Variable::Wd => baseline
                .wd_deg
                .unwrap_or_else(|| situation.wind_direction.degrees()),
            Variable::Temp => baseline.temp_or_default() + offset + self.noise(TEMP_NOISE),
            Variable::Rh => {
                (baseline.rh_or_default() + offset + self.noise(RH_NOISE)).min(RH_CEILING)
            }
            Variable::Pressure => BASE_PRESSURE_HPA + self.noise(PRESSURE_NOISE),
        };
        Some(round2(value))
    }

    /// Reference concentration when a provider supplied one, otherwise a
    /// fresh draw from the small pollutant base range.
    fn pollutant_base(&mut self, variable: Variable, baseline: &ReferenceBaseline) -> f64 {
        baseline.pollutant(variable).unwrap_or_else(|| {
            self.rng
                .gen_range(POLLUTANT_BASE_RANGE.0..=POLLUTANT_BASE_RANGE.1)
        })
    }

    fn noise(&mut self, band: (f64, f64)) -> f64 {
        self.rng.gen_range(band.0..=band.1)
    }
}
