use super::PredictionOutput;
use crate::export::{Cell, Table};

pub const COMPARISON_COLUMNS: [&str; 4] = ["metric", "reference", "alternate", "difference"];

/// Builds a reference-vs-alternate table with one row per track present in
/// both outputs. Values are track means; `difference` is alternate minus
/// reference.
pub fn compare_outputs(reference: &PredictionOutput, alternate: &PredictionOutput) -> Table {
    let mut table = Table::new(COMPARISON_COLUMNS);

    for name in reference.tracks.keys() {
        if !alternate.tracks.contains_key(name) {
            continue;
        }
        let ref_mean = reference.track_mean(name);
        let alt_mean = alternate.track_mean(name);
        let difference = match (ref_mean, alt_mean) {
            (Some(r), Some(a)) => Cell::Float(a - r),
            _ => Cell::Empty,
        };
        table.push_unchecked(vec![
            Cell::Text(name.clone()),
            ref_mean.map(Cell::Float).unwrap_or(Cell::Empty),
            alt_mean.map(Cell::Float).unwrap_or(Cell::Empty),
            difference,
        ]);
    }

    table
}
