use crate::export::ExportFormat;
use crate::genome::{Interval, OutputType};
use crate::plot::SummaryMetric;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Batch genomic predictions with usage tracking and export"
)]
pub struct Cli {
    /// Path to config file (overrides CONFIG_PATH)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Predict variant effects for every row of a variants CSV
    Variants {
        #[command(flatten)]
        input: InputArgs,

        /// Ontology term for the tissue/cell context (repeatable)
        #[arg(long = "ontology-term", value_name = "TERM")]
        ontology_terms: Vec<String>,

        /// Fixed window for every variant, as chr:start-end
        #[arg(long)]
        interval: Option<Interval>,
    },
    /// Predict sequence tracks for every row of an intervals CSV
    Intervals {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show recorded API usage
    Usage,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input CSV file
    pub csv: PathBuf,

    /// Output type to request (repeatable, default RNA_SEQ)
    #[arg(long = "output-type", value_name = "TYPE")]
    pub output_types: Vec<OutputType>,

    /// Prefix for the results directory and files
    #[arg(long, default_value = "results")]
    pub prefix: String,

    /// Results directory (overrides output.dir)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Export format (repeatable, overrides output.formats)
    #[arg(long = "format", value_enum)]
    pub formats: Vec<ExportFormat>,

    /// Do not count calls against the usage log
    #[arg(long)]
    pub no_monitor: bool,

    /// Also write a summary chart of the results
    #[arg(long, value_enum)]
    pub summary_plot: Option<SummaryMetric>,
}
