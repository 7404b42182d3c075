use anyhow::{Context, Result};
use clap::Parser;
use genome_batch::{
    batch::{BatchRunner, ResultTable, VariantBatchOptions},
    config::{self, Cli, Command, Config, InputArgs, LogFormat},
    export::{Exportable, save_results},
    genome::{load_intervals_from_csv, load_variants_from_csv},
    model::HttpGenomeModel,
    monitor::UsageMonitor,
    plot::plot_batch_summary,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })?;
    Ok(())
}

fn init_tracing(config: &Config, debug: bool) -> Result<()> {
    // Environment variable overrides --debug, which overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if debug {
            "debug".to_string()
        } else {
            config.logs.level.clone()
        }
    });

    if std::env::var("RUST_LOG").is_err() {
        validate_log_level(&log_level)?;
    }

    let filter = EnvFilter::try_new(&log_level)
        .with_context(|| format!("Invalid log filter: {log_level}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.logs.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging setup)
    let config = match config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config, cli.debug) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match cli.command {
        Command::Usage => {
            let monitor = UsageMonitor::from_config(&config.monitor)?;
            println!("{monitor}");
        }
        Command::Variants {
            input,
            ontology_terms,
            interval,
        } => {
            let variants = load_variants_from_csv(&input.csv)
                .with_context(|| format!("Failed to load variants from {}", input.csv.display()))?;
            let options = VariantBatchOptions {
                interval,
                ontology_terms,
                requested_outputs: input.output_types.clone(),
            };

            let mut runner = build_runner(&config, &input)?;
            let results = runner.run_variant_batch(&variants, &options).await;
            finish(&config, &input, runner, results)?;
        }
        Command::Intervals { input } => {
            let intervals = load_intervals_from_csv(&input.csv).with_context(|| {
                format!("Failed to load intervals from {}", input.csv.display())
            })?;

            let mut runner = build_runner(&config, &input)?;
            let results = runner
                .run_interval_batch(&intervals, &input.output_types)
                .await;
            finish(&config, &input, runner, results)?;
        }
    }

    Ok(())
}

fn build_runner(config: &Config, input: &InputArgs) -> Result<BatchRunner> {
    if config.model.api_key.is_empty() {
        warn!("No API key configured (model.api_key or GENOME_API_KEY)");
    }
    let model = HttpGenomeModel::new(config.model.clone())?;
    let runner = BatchRunner::new(Box::new(model));

    if config.monitor.enabled && !input.no_monitor {
        let monitor = UsageMonitor::from_config(&config.monitor)?;
        info!("{}", monitor);
        Ok(runner.with_monitor(monitor))
    } else {
        Ok(runner)
    }
}

fn finish(
    config: &Config,
    input: &InputArgs,
    runner: BatchRunner,
    results: ResultTable,
) -> Result<()> {
    let table = results.to_table();
    let formats = if input.formats.is_empty() {
        config.output.formats.clone()
    } else {
        input.formats.clone()
    };
    let output_dir = input.output_dir.as_deref().or(config.output.dir.as_deref());

    let result_dir = save_results(
        &Exportable::Single(table.clone()),
        &input.prefix,
        output_dir,
        &formats,
    )?;

    if let Some(metric) = input.summary_plot {
        let plot_path = result_dir.join(format!("{}_summary.svg", input.prefix));
        plot_batch_summary(&table, metric, plot_path)?;
    }

    println!(
        "{} of {} predictions succeeded; results in {}",
        results.success_count(),
        results.len(),
        result_dir.display()
    );
    if let Some(monitor) = runner.monitor() {
        println!("{monitor}");
    }
    Ok(())
}
