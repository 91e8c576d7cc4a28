//! ---
//! act_section: "04-dataset-export"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Multi-sheet dataset export for simulation runs."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Workbook assembly and artifact writing.
//!
//! CSV output is a directory named after the run stem with one file per
//! sheet plus `reference.csv`; JSON output is a single document embedding
//! the rows, the sheet plan, and the baseline. The reference sheet always
//! reports effective values: wherever the upstream fetch came back empty
//! the static defaults are substituted and labelled as such.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use aircheck_common::ExportConfig;
use aircheck_sim::baseline::DEFAULT_WD_DEG;
use aircheck_sim::{
    BaselineSource, Province, ReferenceBaseline, RunScenario, SimulatedReading, Variable,
};

use crate::sheet::{plan_sheets, Sheet};
use crate::{ExportError, Result};

/// A finished run bundled for export: sheet plan, rows, and baseline.
#[derive(Debug)]
pub struct DatasetWorkbook<'a> {
    stem: String,
    province: Province,
    start_date: NaiveDate,
    end_date: NaiveDate,
    sheets: Vec<Sheet>,
    rows: &'a [SimulatedReading],
    baseline: &'a ReferenceBaseline,
}

/// Serialized shape of the single-document JSON export.
#[derive(Serialize)]
struct DatasetDocument<'a> {
    province: Province,
    start_date: NaiveDate,
    end_date: NaiveDate,
    generated_at: DateTime<Utc>,
    baseline: &'a ReferenceBaseline,
    sheets: &'a [Sheet],
    rows: &'a [SimulatedReading],
}

impl<'a> DatasetWorkbook<'a> {
    /// Bundle a simulated table for export.
    ///
    /// Fails when the table is empty or when the scenario requested no
    /// variable that maps to a sheet.
    pub fn new(
        scenario: &RunScenario,
        rows: &'a [SimulatedReading],
        baseline: &'a ReferenceBaseline,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(ExportError::EmptyTable);
        }
        let sheets = plan_sheets(&scenario.requested_variables());
        if sheets.is_empty() {
            return Err(ExportError::NoSheets);
        }
        Ok(Self {
            stem: scenario.file_stem(),
            province: scenario.province,
            start_date: scenario.start_date,
            end_date: scenario.end_date(),
            sheets,
            rows,
            baseline,
        })
    }

    /// Run stem shared by every artifact, e.g.
    /// `AirCheck_rayong_20240304_20240306`.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Planned sheets in workbook order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Write one CSV file per sheet plus the reference sheet into
    /// `<output_dir>/<stem>/`, returning the written paths.
    pub fn write_csv(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let run_dir = output_dir.join(&self.stem);
        fs::create_dir_all(&run_dir).map_err(|source| ExportError::CreateDir {
            path: run_dir.clone(),
            source,
        })?;
        let mut written = Vec::with_capacity(self.sheets.len() + 1);
        for sheet in &self.sheets {
            let path = run_dir.join(format!("{}.csv", sheet.name));
            self.write_sheet_csv(&path, sheet)?;
            debug!(sheet = %sheet.name, path = %path.display(), "sheet written");
            written.push(path);
        }
        let reference = run_dir.join("reference.csv");
        self.write_reference_csv(&reference)?;
        written.push(reference);
        info!(
            stem = %self.stem,
            sheets = self.sheets.len(),
            rows = self.rows.len(),
            "csv workbook written"
        );
        Ok(written)
    }

    /// Write the whole run as `<output_dir>/<stem>.json`.
    pub fn write_json(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = output_dir.join(format!("{}.json", self.stem));
        let document = DatasetDocument {
            province: self.province,
            start_date: self.start_date,
            end_date: self.end_date,
            generated_at: Utc::now(),
            baseline: self.baseline,
            sheets: &self.sheets,
            rows: self.rows,
        };
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, &document)?;
        info!(path = %path.display(), rows = self.rows.len(), "json document written");
        Ok(path)
    }

    fn write_sheet_csv(&self, path: &Path, sheet: &Sheet) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header = vec!["Date".to_owned(), "Hour".to_owned(), "Wind".to_owned()];
        header.extend(sheet.variables.iter().map(|v| v.to_string()));
        writer.write_record(&header)?;
        for row in self.rows {
            let mut record = vec![
                row.date.format("%Y-%m-%d").to_string(),
                row.hour_label(),
                row.wind_direction.to_string(),
            ];
            for variable in &sheet.variables {
                record.push(match row.value(*variable) {
                    Some(value) => format!("{value:.2}"),
                    None => String::new(),
                });
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// The reference sheet lists the effective baseline per anchored
    /// variable with its provenance. Missing upstream fields fall back to
    /// the static defaults and are labelled `static` regardless of which
    /// provider answered.
    fn write_reference_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["Variable", "Value", "Source"])?;
        let weather_rows = [
            (Variable::Temp, self.baseline.temp_c, self.baseline.temp_or_default()),
            (Variable::Rh, self.baseline.rh_pct, self.baseline.rh_or_default()),
            (Variable::Ws, self.baseline.ws_ms, self.baseline.ws_or_default()),
            (
                Variable::Wd,
                self.baseline.wd_deg,
                self.baseline.wd_deg.unwrap_or(DEFAULT_WD_DEG),
            ),
        ];
        for (variable, observed, effective) in weather_rows {
            let source = if observed.is_some() {
                self.baseline.weather_source
            } else {
                BaselineSource::Static
            };
            writer.write_record([
                variable.to_string(),
                format!("{effective:.2}"),
                source.to_string(),
            ])?;
        }
        for (variable, value) in &self.baseline.pollutants {
            writer.write_record([
                variable.to_string(),
                format!("{value:.2}"),
                self.baseline.pollutant_source.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Export a finished run according to the configured format, returning
/// every artifact path written.
pub fn export_dataset(
    config: &ExportConfig,
    scenario: &RunScenario,
    rows: &[SimulatedReading],
    baseline: &ReferenceBaseline,
) -> Result<Vec<PathBuf>> {
    let workbook = DatasetWorkbook::new(scenario, rows, baseline)?;
    let mut written = Vec::new();
    if config.format.wants_csv() {
        written.extend(workbook.write_csv(&config.output_dir)?);
    }
    if config.format.wants_json() {
        written.push(workbook.write_json(&config.output_dir)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use indexmap::IndexMap;

    use aircheck_common::config::ExportFormat;
    use aircheck_sim::{SiteContext, Situation, WindDirection};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn scenario_with(variables: Vec<Variable>) -> RunScenario {
        RunScenario {
            province: Province::Rayong,
            start_date: date(2024, 3, 4),
            site: SiteContext::default(),
            variables,
            days: vec![Situation::uneventful(WindDirection::Sw)],
        }
    }

    fn reading(hour: u32, values: &[(Variable, Option<f64>)]) -> SimulatedReading {
        SimulatedReading {
            date: date(2024, 3, 4),
            hour,
            wind_direction: WindDirection::Sw,
            values: values.iter().copied().collect(),
        }
    }

    fn nitrogen_rows() -> Vec<SimulatedReading> {
        vec![
            reading(
                0,
                &[
                    (Variable::No, Some(12.34)),
                    (Variable::No2, Some(8.0)),
                    (Variable::Nox, Some(20.34)),
                ],
            ),
            reading(
                1,
                &[
                    (Variable::No, Some(11.5)),
                    (Variable::No2, Some(7.25)),
                    (Variable::Nox, Some(18.75)),
                ],
            ),
        ]
    }

    #[test]
    fn csv_directory_holds_one_file_per_sheet_plus_reference() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = scenario_with(vec![Variable::No, Variable::No2, Variable::Nox]);
        let rows = nitrogen_rows();
        let baseline = ReferenceBaseline::static_defaults();

        let workbook = DatasetWorkbook::new(&scenario, &rows, &baseline).expect("workbook");
        let written = workbook.write_csv(dir.path()).expect("write");

        let run_dir = dir.path().join("AirCheck_rayong_20240304_20240304");
        assert!(run_dir.is_dir());
        assert_eq!(written.len(), 2);
        assert!(run_dir.join("nitrogen-oxides.csv").is_file());
        assert!(run_dir.join("reference.csv").is_file());

        let body = fs::read_to_string(run_dir.join("nitrogen-oxides.csv")).expect("read");
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("Date,Hour,Wind,NO,NO2,NOx"));
        assert_eq!(lines.next(), Some("2024-03-04,00:00,SW,12.34,8.00,20.34"));
        assert_eq!(lines.next(), Some("2024-03-04,01:00,SW,11.50,7.25,18.75"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn underivable_values_render_as_empty_cells() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = scenario_with(vec![Variable::No, Variable::No2, Variable::Nox]);
        let rows = vec![reading(
            0,
            &[
                (Variable::No, Some(12.34)),
                (Variable::No2, None),
                (Variable::Nox, None),
            ],
        )];
        let baseline = ReferenceBaseline::static_defaults();

        let workbook = DatasetWorkbook::new(&scenario, &rows, &baseline).expect("workbook");
        workbook.write_csv(dir.path()).expect("write");

        let body = fs::read_to_string(
            dir.path()
                .join("AirCheck_rayong_20240304_20240304")
                .join("nitrogen-oxides.csv"),
        )
        .expect("read");
        assert_eq!(body.lines().nth(1), Some("2024-03-04,00:00,SW,12.34,,"));
    }

    #[test]
    fn reference_sheet_substitutes_static_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = scenario_with(Variable::default_set());
        let rows = nitrogen_rows();
        let baseline = ReferenceBaseline::static_defaults();

        let workbook = DatasetWorkbook::new(&scenario, &rows, &baseline).expect("workbook");
        workbook.write_csv(dir.path()).expect("write");

        let body = fs::read_to_string(
            dir.path()
                .join("AirCheck_rayong_20240304_20240304")
                .join("reference.csv"),
        )
        .expect("read");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Variable,Value,Source",
                "Temp,27.00,static",
                "RH,65.00,static",
                "WS,2.50,static",
                "WD,90.00,static",
            ]
        );
    }

    #[test]
    fn reference_sheet_reports_live_sources_per_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = scenario_with(Variable::default_set());
        let rows = nitrogen_rows();
        let mut baseline = ReferenceBaseline::static_defaults();
        baseline.temp_c = Some(31.6);
        baseline.ws_ms = Some(3.1);
        baseline.weather_source = BaselineSource::OpenWeather;
        baseline.pollutants = IndexMap::from([(Variable::No2, 11.0), (Variable::O3, 42.5)]);
        baseline.pollutant_source = BaselineSource::Air4Thai;

        let workbook = DatasetWorkbook::new(&scenario, &rows, &baseline).expect("workbook");
        workbook.write_csv(dir.path()).expect("write");

        let body = fs::read_to_string(
            dir.path()
                .join("AirCheck_rayong_20240304_20240304")
                .join("reference.csv"),
        )
        .expect("read");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Variable,Value,Source",
                "Temp,31.60,openweather",
                "RH,65.00,static",
                "WS,3.10,openweather",
                "WD,90.00,static",
                "NO2,11.00,air4thai",
                "O3,42.50,air4thai",
            ]
        );
    }

    #[test]
    fn json_document_embeds_rows_sheets_and_baseline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = scenario_with(vec![Variable::No, Variable::No2, Variable::Nox]);
        let rows = nitrogen_rows();
        let baseline = ReferenceBaseline::static_defaults();

        let workbook = DatasetWorkbook::new(&scenario, &rows, &baseline).expect("workbook");
        let path = workbook.write_json(dir.path()).expect("write");
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("AirCheck_rayong_20240304_20240304.json")
        );

        let body = fs::read_to_string(&path).expect("read");
        let document: serde_json::Value = serde_json::from_str(&body).expect("parse");
        assert_eq!(document["province"], "rayong");
        assert_eq!(document["start_date"], "2024-03-04");
        assert_eq!(document["end_date"], "2024-03-04");
        assert_eq!(document["sheets"][0]["name"], "nitrogen-oxides");
        assert_eq!(document["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(document["rows"][0]["values"]["NO"], 12.34);
        assert_eq!(document["rows"][0]["wind_direction"], "SW");
        assert_eq!(document["baseline"]["weather_source"], "static");
    }

    #[test]
    fn export_dataset_writes_both_formats() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = scenario_with(vec![Variable::No, Variable::No2, Variable::Nox]);
        let rows = nitrogen_rows();
        let baseline = ReferenceBaseline::static_defaults();
        let config = ExportConfig {
            output_dir: dir.path().to_path_buf(),
            format: ExportFormat::Both,
        };

        let written = export_dataset(&config, &scenario, &rows, &baseline).expect("export");
        // nitrogen sheet + reference sheet + json document
        assert_eq!(written.len(), 3);
        for path in &written {
            assert!(path.exists(), "missing artifact {}", path.display());
        }
    }

    #[test]
    fn empty_table_is_rejected() {
        let scenario = scenario_with(Variable::default_set());
        let baseline = ReferenceBaseline::static_defaults();
        let err = DatasetWorkbook::new(&scenario, &[], &baseline).unwrap_err();
        assert!(matches!(err, ExportError::EmptyTable));
    }

    #[test]
    fn variable_set_without_sheets_is_rejected() {
        let scenario = scenario_with(Vec::new());
        let rows = nitrogen_rows();
        let baseline = ReferenceBaseline::static_defaults();
        let err = DatasetWorkbook::new(&scenario, &rows, &baseline).unwrap_err();
        assert!(matches!(err, ExportError::NoSheets));
    }
}
