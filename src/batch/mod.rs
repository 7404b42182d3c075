mod runner;
mod types;

pub use runner::BatchRunner;
pub use types::*;
