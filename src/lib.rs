pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod genome;
pub mod model;
pub mod monitor;
pub mod plot;

pub use error::{Error, Result};
