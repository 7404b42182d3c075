use super::track_positions;
use crate::genome::{Interval, Variant, VariantOutputs};
use crate::{Error, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

const FONT: &str = "sans-serif";
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);

fn draw_err(e: impl Display) -> Error {
    Error::plot(e.to_string())
}

pub(super) fn bar_chart(
    counts: &[(String, usize)],
    title: &str,
    x_desc: &str,
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let bars = counts.len().max(1) as f64;
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..bars, 0f64..max * 1.15)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(x_desc)
        .y_desc("Count")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, (label, count))| {
            let color = match label.as_str() {
                "Success" => GREEN,
                "Failure" => RED,
                _ => STEEL_BLUE,
            };
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *count as f64)], color.filled())
        }))
        .map_err(draw_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, (label, count))| {
            Text::new(
                format!("{label}: {count}"),
                (i as f64 + 0.35, *count as f64 + max * 0.05),
                (FONT, 16),
            )
        }))
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

pub(super) fn tracks_chart(
    tracks: &BTreeMap<String, Vec<f64>>,
    interval: &Interval,
    title: &str,
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    draw_tracks(&root, tracks, interval, title)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

pub(super) fn comparison_chart(
    outputs: &VariantOutputs,
    variant: &Variant,
    interval: &Interval,
    title: &str,
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let body = root.titled(title, (FONT, 24)).map_err(draw_err)?;
    let (left, right) = body.split_horizontally(700);

    draw_tracks(
        &left,
        &outputs.reference.tracks,
        interval,
        &format!("Reference Allele ({})", variant.reference_bases),
    )?;
    draw_tracks(
        &right,
        &outputs.alternate.tracks,
        interval,
        &format!("Alternate Allele ({})", variant.alternate_bases),
    )?;

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_tracks(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    tracks: &BTreeMap<String, Vec<f64>>,
    interval: &Interval,
    caption: &str,
) -> Result<()> {
    let (y_min, y_max) = value_range(tracks.values().flatten().copied());

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (FONT, 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            interval.start() as f64..interval.end() as f64,
            y_min..y_max,
        )
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc(format!("Genomic Position ({})", interval.chromosome()))
        .y_desc("Prediction Score")
        .draw()
        .map_err(draw_err)?;

    for (i, (name, values)) in tracks.iter().enumerate() {
        let points: Vec<(f64, f64)> = track_positions(interval, values.len())
            .into_iter()
            .zip(values.iter().copied())
            .collect();
        chart
            .draw_series(LineSeries::new(points, Palette99::pick(i).stroke_width(2)))
            .map_err(draw_err)?
            .label(name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(i).stroke_width(2))
            });
    }

    if !tracks.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;
    }
    Ok(())
}

pub(super) fn heatmap(data: &[Vec<f64>], title: &str, path: &Path) -> Result<()> {
    let rows = data.len();
    let cols = data.first().map(Vec::len).unwrap_or(0);
    let (min, max) = value_range(data.iter().flatten().copied());
    let span = max - min;

    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..cols as f64, 0f64..rows as f64)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Genomic Position")
        .y_desc("Samples/Genes")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(data.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(c, value)| {
                let level = if span > 0.0 { (value - min) / span } else { 0.5 };
                // Blue for low values through to red for high ones.
                let color = HSLColor(0.66 * (1.0 - level), 0.8, 0.5);
                let top = (rows - r) as f64;
                Rectangle::new(
                    [(c as f64, top - 1.0), (c as f64 + 1.0, top)],
                    color.filled(),
                )
            })
        }))
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Finite min/max of `values`, widened so the range is never empty.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
