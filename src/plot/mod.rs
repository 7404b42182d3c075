//! SVG charts for batch results and prediction tracks.
//!
//! Rendering needs the `plotting` feature. Without it every function logs
//! an error and returns `Ok(None)`.

#[cfg(feature = "plotting")]
mod svg;

use crate::export::{Cell, Table};
use crate::genome::{Interval, Variant, VariantOutputs};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
#[cfg(not(feature = "plotting"))]
use tracing::error;
#[cfg(feature = "plotting")]
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SummaryMetric {
    /// Successful vs failed rows.
    #[default]
    Success,
    /// Rows per chromosome.
    Chromosome,
}

/// Bar labels and counts for a summary chart.
///
/// `Success` yields `Success` then `Failure` (only those present);
/// `Chromosome` yields chromosomes in name order.
pub fn summary_counts(table: &Table, metric: SummaryMetric) -> Result<Vec<(String, usize)>> {
    match metric {
        SummaryMetric::Success => {
            let column = table
                .column("success")
                .ok_or_else(|| Error::plot("Table has no 'success' column"))?;
            let (mut ok, mut failed) = (0, 0);
            for cell in column {
                match cell.as_bool() {
                    Some(true) => ok += 1,
                    _ => failed += 1,
                }
            }
            Ok([("Success", ok), ("Failure", failed)]
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(label, count)| (label.to_string(), count))
                .collect())
        }
        SummaryMetric::Chromosome => {
            let column = table
                .column("chromosome")
                .ok_or_else(|| Error::plot("Table has no 'chromosome' column"))?;
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for cell in column {
                if let Cell::Text(chromosome) = cell {
                    *counts.entry(chromosome.clone()).or_default() += 1;
                }
            }
            Ok(counts.into_iter().collect())
        }
    }
}

pub fn tracks_title(interval: &Interval) -> String {
    format!("Genomic Tracks: {interval}")
}

pub fn variant_title(variant: &Variant) -> String {
    format!(
        "Variant Effect: {}:{} {}>{}",
        variant.chromosome, variant.position, variant.reference_bases, variant.alternate_bases
    )
}

/// `len` positions spread evenly over `[interval.start, interval.end]`.
pub fn track_positions(interval: &Interval, len: usize) -> Vec<f64> {
    let start = interval.start() as f64;
    let end = interval.end() as f64;
    match len {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (len - 1) as f64;
            (0..len).map(|i| start + step * i as f64).collect()
        }
    }
}

pub fn plot_batch_summary(
    table: &Table,
    metric: SummaryMetric,
    path: impl AsRef<Path>,
) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    let counts = summary_counts(table, metric)?;
    render(path, |path| {
        #[cfg(feature = "plotting")]
        {
            let (title, x_desc) = match metric {
                SummaryMetric::Success => ("Batch Prediction Summary", "Outcome"),
                SummaryMetric::Chromosome => ("Variants by Chromosome", "Chromosome"),
            };
            svg::bar_chart(&counts, title, x_desc, path)
        }
        #[cfg(not(feature = "plotting"))]
        {
            let _ = (&counts, path);
            Ok(())
        }
    })
}

pub fn plot_tracks_overlaid(
    tracks: &BTreeMap<String, Vec<f64>>,
    interval: &Interval,
    path: impl AsRef<Path>,
    title: Option<&str>,
) -> Result<Option<PathBuf>> {
    if tracks.is_empty() {
        return Err(Error::plot("No tracks to plot"));
    }
    let title = title.map(str::to_string).unwrap_or_else(|| tracks_title(interval));
    render(path.as_ref(), |path| {
        #[cfg(feature = "plotting")]
        {
            svg::tracks_chart(tracks, interval, &title, path)
        }
        #[cfg(not(feature = "plotting"))]
        {
            let _ = (&title, path);
            Ok(())
        }
    })
}

/// Colour grid of `rows x columns` values. Every row must have the same
/// non-zero length.
pub fn plot_expression_heatmap(
    data: &[Vec<f64>],
    path: impl AsRef<Path>,
    title: &str,
) -> Result<Option<PathBuf>> {
    let width = data.first().map(Vec::len).unwrap_or(0);
    if width == 0 || data.iter().any(|row| row.len() != width) {
        return Err(Error::plot(
            "Heatmap data must be a non-empty rectangular matrix",
        ));
    }
    render(path.as_ref(), |path| {
        #[cfg(feature = "plotting")]
        {
            svg::heatmap(data, title, path)
        }
        #[cfg(not(feature = "plotting"))]
        {
            let _ = (title, path);
            Ok(())
        }
    })
}

/// Reference and alternate tracks side by side.
pub fn plot_variant_comparison(
    outputs: &VariantOutputs,
    variant: &Variant,
    interval: &Interval,
    path: impl AsRef<Path>,
    title: Option<&str>,
) -> Result<Option<PathBuf>> {
    let title = title.map(str::to_string).unwrap_or_else(|| variant_title(variant));
    render(path.as_ref(), |path| {
        #[cfg(feature = "plotting")]
        {
            svg::comparison_chart(outputs, variant, interval, &title, path)
        }
        #[cfg(not(feature = "plotting"))]
        {
            let _ = (outputs, interval, &title, path);
            Ok(())
        }
    })
}

fn render<F>(path: &Path, draw: F) -> Result<Option<PathBuf>>
where
    F: FnOnce(&Path) -> Result<()>,
{
    #[cfg(feature = "plotting")]
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        draw(path)?;
        info!("Figure saved to {}", path.display());
        Ok(Some(path.to_path_buf()))
    }

    #[cfg(not(feature = "plotting"))]
    {
        let _ = draw;
        error!(
            "Plotting unavailable (built without the `plotting` feature), skipping {}",
            path.display()
        );
        Ok(None)
    }
}
