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

/// Measured variable produced by the simulator.
///
/// The string forms match the column headers of the exported tables, so the
/// same names appear in scenario files, CLI flags, and spreadsheet output.
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
#[strum(ascii_case_insensitive)]
pub enum Variable {
    #[serde(rename = "NO")]
    #[strum(serialize = "NO")]
    No,
    #[serde(rename = "NO2")]
    #[strum(serialize = "NO2")]
    No2,
    #[serde(rename = "NOx")]
    #[strum(serialize = "NOx")]
    Nox,
    #[serde(rename = "SO2")]
    #[strum(serialize = "SO2")]
    So2,
    #[serde(rename = "CO")]
    #[strum(serialize = "CO")]
    Co,
    #[serde(rename = "O3")]
    #[strum(serialize = "O3")]
    O3,
    #[serde(rename = "WS")]
    #[strum(serialize = "WS")]
    Ws,
    #[serde(rename = "WD")]
    #[strum(serialize = "WD")]
    Wd,
    #[serde(rename = "Temp")]
    #[strum(serialize = "Temp")]
    Temp,
    #[serde(rename = "RH")]
    #[strum(serialize = "RH")]
    Rh,
    #[serde(rename = "Pressure")]
    #[strum(serialize = "Pressure")]
    Pressure,
}

impl Variable {
    /// Gas-phase pollutant concentrations, including the derived NOx column.
    pub fn is_pollutant(&self) -> bool {
        matches!(
            self,
            Variable::No
                | Variable::No2
                | Variable::Nox
                | Variable::So2
                | Variable::Co
                | Variable::O3
        )
    }

    /// Weather-like variables that anchor to a reference baseline.
    pub fn is_meteorological(&self) -> bool {
        !self.is_pollutant()
    }

    /// NOx is never simulated directly; it is summed from NO and NO2
    /// during table assembly.
    pub fn is_derived(&self) -> bool {
        matches!(self, Variable::Nox)
    }

    /// The variable list preselected by the planner.
    pub fn default_set() -> Vec<Variable> {
        vec![
            Variable::No,
            Variable::No2,
            Variable::Nox,
            Variable::Ws,
            Variable::Wd,
            Variable::Temp,
            Variable::Rh,
            Variable::Pressure,
        ]
    }
}
