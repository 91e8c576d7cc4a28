//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::baseline::ReferenceBaseline;
use crate::engine::{round2, SimulationEngine};
use crate::scenario::RunScenario;
use crate::situation::WindDirection;
use crate::variable::Variable;

pub const HOURS_PER_DAY: u32 = 24;

/// One assembled hourly row. `values` keeps the scenario's variable order;
/// a `None` cell means the variable could not be computed for that hour.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedReading {
    pub date: NaiveDate,
    pub hour: u32,
    pub wind_direction: WindDirection,
    pub values: IndexMap<Variable, Option<f64>>,
}

impl SimulatedReading {
    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values.get(&variable).copied().flatten()
    }

    /// `HH:00` label used in the exported tables.
    pub fn hour_label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Expand a scenario into its full date x hour table.
///
/// Every requested variable is simulated once per hour in request order;
/// NOx is then derived as `round2(NO + NO2)` wherever both summands are
/// present. Rows come out sorted by (date, hour) ascending.
pub fn assemble_table(
    scenario: &RunScenario,
    engine: &mut SimulationEngine,
    baseline: &ReferenceBaseline,
) -> Vec<SimulatedReading> {
    let variables = scenario.requested_variables();
    let mut rows = Vec::with_capacity(scenario.days.len() * HOURS_PER_DAY as usize);
    for (date, situation) in scenario.dates() {
        for hour in 0..HOURS_PER_DAY {
            let mut values: IndexMap<Variable, Option<f64>> =
                IndexMap::with_capacity(variables.len());
            for &variable in &variables {
                let value = engine.simulate(variable, situation, hour, &scenario.site, baseline);
                values.insert(variable, value);
            }
            if values.contains_key(&Variable::Nox) {
                let nox = match (
                    values.get(&Variable::No).copied().flatten(),
                    values.get(&Variable::No2).copied().flatten(),
                ) {
                    (Some(no), Some(no2)) => Some(round2(no + no2)),
                    _ => None,
                };
                values.insert(Variable::Nox, nox);
            }
            rows.push(SimulatedReading {
                date,
                hour,
                wind_direction: situation.wind_direction,
                values,
            });
        }
    }
    debug!(
        rows = rows.len(),
        days = scenario.days.len(),
        province = %scenario.province,
        "assembled simulation table"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTable;
    use crate::scenario::Province;
    use aircheck_common::config::RulesConfig;

    fn engine(seed: u64) -> SimulationEngine {
        SimulationEngine::new(RuleTable::standard(&RulesConfig::default()), seed)
    }

    fn scenario(days: u32) -> RunScenario {
        RunScenario::template(
            Province::Rayong,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            days,
        )
    }

    #[test]
    fn three_days_produce_seventy_two_sorted_rows() {
        let scenario = scenario(3);
        let mut engine = engine(9);
        let rows = assemble_table(&scenario, &mut engine, &ReferenceBaseline::static_defaults());
        assert_eq!(rows.len(), 72);
        for pair in rows.windows(2) {
            assert!((pair[0].date, pair[0].hour) < (pair[1].date, pair[1].hour));
        }
        assert_eq!(rows[0].hour_label(), "00:00");
        assert_eq!(rows[23].hour_label(), "23:00");
        assert_eq!(rows[24].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn nox_is_the_rounded_sum_of_its_parts() {
        let scenario = scenario(1);
        let mut engine = engine(4);
        let rows = assemble_table(&scenario, &mut engine, &ReferenceBaseline::static_defaults());
        for row in &rows {
            let no = row.value(Variable::No).expect("NO simulated");
            let no2 = row.value(Variable::No2).expect("NO2 simulated");
            let nox = row.value(Variable::Nox).expect("NOx derived");
            assert_eq!(nox, round2(no + no2));
        }
    }

    #[test]
    fn nox_stays_null_when_a_summand_is_missing() {
        let mut scenario = scenario(1);
        scenario.variables = vec![Variable::No2, Variable::Nox, Variable::Temp];
        let mut engine = engine(4);
        let rows = assemble_table(&scenario, &mut engine, &ReferenceBaseline::static_defaults());
        for row in &rows {
            assert!(row.value(Variable::No2).is_some());
            assert!(row.value(Variable::Nox).is_none());
            assert!(row.values.contains_key(&Variable::Nox));
        }
    }

    #[test]
    fn unrequested_variables_are_absent_from_rows() {
        let mut scenario = scenario(1);
        scenario.variables = vec![Variable::Temp, Variable::Rh];
        let mut engine = engine(4);
        let rows = assemble_table(&scenario, &mut engine, &ReferenceBaseline::static_defaults());
        for row in &rows {
            assert!(!row.values.contains_key(&Variable::No));
            assert!(row.value(Variable::Temp).is_some());
        }
    }

    #[test]
    fn rows_echo_their_day_wind_direction() {
        let mut scenario = scenario(2);
        scenario.days[0].wind_direction = WindDirection::Se;
        scenario.days[1].wind_direction = WindDirection::Nw;
        let mut engine = engine(4);
        let rows = assemble_table(&scenario, &mut engine, &ReferenceBaseline::static_defaults());
        assert!(rows[..24]
            .iter()
            .all(|row| row.wind_direction == WindDirection::Se));
        assert!(rows[24..]
            .iter()
            .all(|row| row.wind_direction == WindDirection::Nw));
    }

    #[test]
    fn values_keep_request_order() {
        let mut scenario = scenario(1);
        scenario.variables = vec![Variable::Pressure, Variable::No, Variable::Temp];
        let mut engine = engine(4);
        let rows = assemble_table(&scenario, &mut engine, &ReferenceBaseline::static_defaults());
        let keys: Vec<Variable> = rows[0].values.keys().copied().collect();
        assert_eq!(keys, vec![Variable::Pressure, Variable::No, Variable::Temp]);
    }
}
