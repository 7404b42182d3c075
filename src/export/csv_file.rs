use super::Table;
use crate::Result;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// Writes one header row plus one line per table row. Parent directories
/// are created as needed.
pub fn export_to_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    write_csv(table, file)?;

    info!("Exported to CSV: {}", path.display());
    Ok(())
}

pub fn write_csv(table: &Table, output: impl io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    if table.columns().is_empty() {
        writer.flush()?;
        return Ok(());
    }

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
