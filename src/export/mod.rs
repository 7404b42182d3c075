mod csv_file;
mod excel;
mod json;
mod table;

pub use csv_file::{export_to_csv, write_csv};
pub use excel::{DEFAULT_SHEET_NAME, export_to_excel};
pub use json::{export_to_json, to_json_value};
pub use table::{Cell, Exportable, Table};

use crate::{Result, config};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
}

/// Writes `data` in every requested format into a fresh
/// `<output_dir>/<prefix>_<YYYYmmdd_HHMMSS>/` directory and returns it.
///
/// `output_dir` defaults to `~/work/results`. A named collection is written
/// as one CSV per table (`<prefix>_<name>.csv`).
pub fn save_results(
    data: &Exportable,
    prefix: &str,
    output_dir: Option<&Path>,
    formats: &[ExportFormat],
) -> Result<PathBuf> {
    let formats = if formats.is_empty() {
        &[ExportFormat::Csv][..]
    } else {
        formats
    };

    let output_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => config::work_dir_path("results")?,
    };

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let result_dir = output_dir.join(format!("{prefix}_{timestamp}"));
    fs::create_dir_all(&result_dir)?;

    for format in formats {
        match format {
            ExportFormat::Csv => match data {
                Exportable::Single(table) => {
                    export_to_csv(table, result_dir.join(format!("{prefix}.csv")))?;
                }
                Exportable::Named(tables) => {
                    for (name, table) in tables {
                        export_to_csv(table, result_dir.join(format!("{prefix}_{name}.csv")))?;
                    }
                }
            },
            ExportFormat::Excel => {
                export_to_excel(data, result_dir.join(format!("{prefix}.xlsx")), None)?;
            }
            ExportFormat::Json => {
                export_to_json(data, result_dir.join(format!("{prefix}.json")))?;
            }
        }
    }

    info!("Results saved to {}", result_dir.display());
    Ok(result_dir)
}
