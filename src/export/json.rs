use super::Exportable;
use crate::Result;
use serde_json::{Map, Value};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// A single table becomes an array of row objects; a named collection
/// becomes an object of such arrays.
pub fn to_json_value(data: &Exportable) -> Value {
    match data {
        Exportable::Single(table) => Value::Array(table.to_json_records()),
        Exportable::Named(tables) => {
            let object: Map<String, Value> = tables
                .iter()
                .map(|(name, table)| (name.clone(), Value::Array(table.to_json_records())))
                .collect();
            Value::Object(object)
        }
    }
}

pub fn export_to_json(data: &Exportable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(writer, &to_json_value(data))?;
    info!("Exported to JSON: {}", path.display());
    Ok(())
}
