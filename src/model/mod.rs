mod client;
mod types;

#[cfg(test)]
pub use client::MockGenomeModel;
pub use client::{GenomeModel, HttpGenomeModel};
pub use types::*;
