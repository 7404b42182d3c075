use super::Exportable;
use crate::Result;
use std::path::{Path, PathBuf};
#[cfg(not(feature = "excel"))]
use tracing::error;

pub const DEFAULT_SHEET_NAME: &str = "Results";

/// Writes a workbook: one sheet named `sheet_name` (default `Results`) for a
/// single table, one sheet per entry for a named collection.
///
/// Returns `Ok(None)` when the crate was built without the `excel` feature.
pub fn export_to_excel(
    data: &Exportable,
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> Result<Option<PathBuf>> {
    let path = path.as_ref();

    #[cfg(feature = "excel")]
    {
        writer::write_workbook(data, path, sheet_name.unwrap_or(DEFAULT_SHEET_NAME))?;
        tracing::info!("Exported to Excel: {}", path.display());
        Ok(Some(path.to_path_buf()))
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (data, sheet_name);
        error!(
            "Excel export unavailable (built without the `excel` feature), skipping {}",
            path.display()
        );
        Ok(None)
    }
}

#[cfg(feature = "excel")]
mod writer {
    use crate::export::{Cell, Exportable, Table};
    use crate::{Error, Result};
    use rust_xlsxwriter::{Format, Workbook, Worksheet};
    use std::fs;
    use std::path::Path;

    pub(super) fn write_workbook(data: &Exportable, path: &Path, sheet_name: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        match data {
            Exportable::Single(table) => {
                let worksheet = workbook.add_worksheet();
                worksheet.set_name(sheet_name)?;
                write_sheet(worksheet, table)?;
            }
            Exportable::Named(tables) => {
                for (name, table) in tables {
                    let worksheet = workbook.add_worksheet();
                    worksheet.set_name(name.as_str())?;
                    write_sheet(worksheet, table)?;
                }
            }
        }
        workbook.save(path)?;
        Ok(())
    }

    fn write_sheet(worksheet: &mut Worksheet, table: &Table) -> Result<()> {
        let header = Format::new().set_bold();
        for (col, name) in table.columns().iter().enumerate() {
            worksheet.write_string_with_format(0, column_number(col)?, name.as_str(), &header)?;
        }

        for (idx, row) in table.rows().iter().enumerate() {
            let row_num = u32::try_from(idx + 1)
                .map_err(|_| Error::internal("Too many rows for a worksheet"))?;
            for (col, cell) in row.iter().enumerate() {
                let col = column_number(col)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Bool(b) => {
                        worksheet.write_boolean(row_num, col, *b)?;
                    }
                    Cell::Int(i) => {
                        worksheet.write_number(row_num, col, *i as f64)?;
                    }
                    Cell::Float(x) => {
                        worksheet.write_number(row_num, col, *x)?;
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(row_num, col, s.as_str())?;
                    }
                }
            }
        }
        Ok(())
    }

    fn column_number(col: usize) -> Result<u16> {
        u16::try_from(col).map_err(|_| Error::internal("Too many columns for a worksheet"))
    }
}
