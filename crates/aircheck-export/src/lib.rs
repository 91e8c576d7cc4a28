//! ---
//! act_section: "04-dataset-export"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Multi-sheet dataset export for simulation runs."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Dataset export for AirCheck TH simulation runs.
//!
//! A finished run is materialised as a [`workbook::DatasetWorkbook`]: the
//! hourly rows split into themed sheets (nitrogen oxides, meteorology, one
//! sheet per remaining pollutant) plus a reference sheet recording the
//! baseline each run was anchored to. The workbook writes either a
//! directory of per-sheet CSV files, a single JSON document, or both.
#![warn(missing_docs)]

/// Result alias used throughout the export crate.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error type for dataset export failures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The run produced no rows to export.
    #[error("nothing to export: the simulated table is empty")]
    EmptyTable,
    /// The requested variable set maps to no sheet.
    #[error("nothing to export: no sheet covers the requested variables")]
    NoSheets,
    /// Failure creating the per-run export directory.
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Wrapper for IO errors encountered while writing artifacts.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wrapper for CSV serialization issues.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Wrapper for JSON serialization issues.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub mod sheet;
pub mod workbook;

pub use sheet::{plan_sheets, Sheet};
pub use workbook::{export_dataset, DatasetWorkbook};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_failure() {
        assert_eq!(
            format!("{}", ExportError::EmptyTable),
            "nothing to export: the simulated table is empty"
        );
        assert_eq!(
            format!("{}", ExportError::NoSheets),
            "nothing to export: no sheet covers the requested variables"
        );
    }
}
