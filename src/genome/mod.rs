mod compare;
mod loader;
mod types;

pub use compare::{COMPARISON_COLUMNS, compare_outputs};
pub use loader::{load_intervals_from_csv, load_variants_from_csv, read_intervals, read_variants};
pub use types::*;
