//! ---
//! act_section: "04-dataset-export"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Multi-sheet dataset export for simulation runs."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Sheet planning: which variables land on which sheet.
//!
//! Nitrogen-oxide species share one sheet so the derived NOx column sits
//! next to its inputs, the meteorological variables share another, and the
//! remaining pollutants each get a sheet of their own. Sheets whose
//! variables were not requested are omitted entirely.

use serde::Serialize;

use aircheck_sim::Variable;

/// Canonical nitrogen-oxides sheet membership.
const NITROGEN_GROUP: [Variable; 3] = [Variable::No, Variable::No2, Variable::Nox];
/// Canonical meteorology sheet membership.
const METEOROLOGY_GROUP: [Variable; 5] = [
    Variable::Ws,
    Variable::Wd,
    Variable::Temp,
    Variable::Rh,
    Variable::Pressure,
];
/// Pollutants exported on a sheet of their own.
const SOLO_SHEETS: [Variable; 3] = [Variable::So2, Variable::Co, Variable::O3];

/// One sheet of the export workbook: a name and its column variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    /// Sheet name, used as the CSV file stem inside the run directory.
    pub name: String,
    /// Variables rendered as columns, in canonical order.
    pub variables: Vec<Variable>,
}

impl Sheet {
    fn grouped(name: &str, group: &[Variable], requested: &[Variable]) -> Option<Self> {
        let variables: Vec<Variable> = group
            .iter()
            .copied()
            .filter(|v| requested.contains(v))
            .collect();
        if variables.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            variables,
        })
    }

    fn solo(variable: Variable) -> Self {
        Self {
            name: variable.to_string(),
            variables: vec![variable],
        }
    }
}

/// Split the requested variables into the workbook's sheets.
///
/// Column order inside a sheet follows the canonical group order, not the
/// request order, so reports line up run to run. Variables absent from the
/// request produce no column and an all-absent sheet is dropped.
pub fn plan_sheets(requested: &[Variable]) -> Vec<Sheet> {
    let mut sheets = Vec::new();
    if let Some(sheet) = Sheet::grouped("nitrogen-oxides", &NITROGEN_GROUP, requested) {
        sheets.push(sheet);
    }
    if let Some(sheet) = Sheet::grouped("meteorology", &METEOROLOGY_GROUP, requested) {
        sheets.push(sheet);
    }
    for variable in SOLO_SHEETS {
        if requested.contains(&variable) {
            sheets.push(Sheet::solo(variable));
        }
    }
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_yields_two_sheets() {
        let sheets = plan_sheets(&Variable::default_set());
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["nitrogen-oxides", "meteorology"]);
        assert_eq!(
            sheets[0].variables,
            vec![Variable::No, Variable::No2, Variable::Nox]
        );
        assert_eq!(
            sheets[1].variables,
            vec![
                Variable::Ws,
                Variable::Wd,
                Variable::Temp,
                Variable::Rh,
                Variable::Pressure
            ]
        );
    }

    #[test]
    fn every_variable_yields_five_sheets() {
        use strum::IntoEnumIterator;

        let all: Vec<Variable> = Variable::iter().collect();
        let sheets = plan_sheets(&all);
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["nitrogen-oxides", "meteorology", "SO2", "CO", "O3"]
        );
    }

    #[test]
    fn solo_pollutant_gets_its_own_sheet() {
        let sheets = plan_sheets(&[Variable::So2]);
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "SO2");
        assert_eq!(sheets[0].variables, vec![Variable::So2]);
    }

    #[test]
    fn sheet_columns_use_canonical_order() {
        let sheets = plan_sheets(&[Variable::Nox, Variable::No, Variable::Rh, Variable::Ws]);
        assert_eq!(sheets[0].variables, vec![Variable::No, Variable::Nox]);
        assert_eq!(sheets[1].variables, vec![Variable::Ws, Variable::Rh]);
    }

    #[test]
    fn empty_request_plans_nothing() {
        assert!(plan_sheets(&[]).is_empty());
    }
}
