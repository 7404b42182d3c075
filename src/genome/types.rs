use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Width of the window predicted around a variant when no interval is given.
pub const DEFAULT_WINDOW_SIZE: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub chromosome: String,
    pub position: u64,
    pub reference_bases: String,
    pub alternate_bases: String,
}

impl Variant {
    pub fn new(
        chromosome: impl Into<String>,
        position: u64,
        reference_bases: impl Into<String>,
        alternate_bases: impl Into<String>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            reference_bases: reference_bases.into(),
            alternate_bases: alternate_bases.into(),
        }
    }

    /// Symmetric [`DEFAULT_WINDOW_SIZE`] window centred on the variant,
    /// clamped at zero.
    pub fn default_window(&self) -> Interval {
        let half = DEFAULT_WINDOW_SIZE / 2;
        Interval {
            chromosome: self.chromosome.clone(),
            start: self.position.saturating_sub(half),
            end: self.position.saturating_add(half),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}>{}",
            self.chromosome, self.position, self.reference_bases, self.alternate_bases
        )
    }
}

/// Half-open genomic range `[start, end)` on one chromosome. `end > start`
/// always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    chromosome: String,
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawInterval {
    chromosome: String,
    start: u64,
    end: u64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = Error;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.chromosome, raw.start, raw.end)
    }
}

impl Interval {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        let chromosome = chromosome.into();
        if end <= start {
            return Err(Error::InvalidInterval {
                chromosome,
                start,
                end,
            });
        }
        Ok(Self {
            chromosome,
            start,
            end,
        })
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// Parses `chr:start-end`.
impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::config(format!("Invalid interval '{s}', expected chr:start-end"));
        let (chromosome, range) = s.rsplit_once(':').ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        let start = start.trim().parse::<u64>().map_err(|_| invalid())?;
        let end = end.trim().parse::<u64>().map_err(|_| invalid())?;
        if chromosome.is_empty() {
            return Err(invalid());
        }
        Interval::new(chromosome, start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionRequest {
    Variant(Variant),
    Interval(Interval),
}

impl PredictionRequest {
    pub fn chromosome(&self) -> &str {
        match self {
            Self::Variant(variant) => &variant.chromosome,
            Self::Interval(interval) => interval.chromosome(),
        }
    }
}

impl From<Variant> for PredictionRequest {
    fn from(variant: Variant) -> Self {
        Self::Variant(variant)
    }
}

impl From<Interval> for PredictionRequest {
    fn from(interval: Interval) -> Self {
        Self::Interval(interval)
    }
}

impl fmt::Display for PredictionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variant(variant) => variant.fmt(f),
            Self::Interval(interval) => interval.fmt(f),
        }
    }
}

/// Prediction signal requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputType {
    Atac,
    Cage,
    Dnase,
    RnaSeq,
    ChipHistone,
    ChipTf,
    SpliceSites,
    SpliceSiteUsage,
    SpliceJunctions,
    ContactMaps,
    Procap,
}

impl OutputType {
    pub const ALL: [OutputType; 11] = [
        Self::Atac,
        Self::Cage,
        Self::Dnase,
        Self::RnaSeq,
        Self::ChipHistone,
        Self::ChipTf,
        Self::SpliceSites,
        Self::SpliceSiteUsage,
        Self::SpliceJunctions,
        Self::ContactMaps,
        Self::Procap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atac => "ATAC",
            Self::Cage => "CAGE",
            Self::Dnase => "DNASE",
            Self::RnaSeq => "RNA_SEQ",
            Self::ChipHistone => "CHIP_HISTONE",
            Self::ChipTf => "CHIP_TF",
            Self::SpliceSites => "SPLICE_SITES",
            Self::SpliceSiteUsage => "SPLICE_SITE_USAGE",
            Self::SpliceJunctions => "SPLICE_JUNCTIONS",
            Self::ContactMaps => "CONTACT_MAPS",
            Self::Procap => "PROCAP",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|output| output.as_str() == normalized)
            .ok_or_else(|| Error::config(format!("Unknown output type: {s}")))
    }
}

/// Named numeric tracks returned by the model for one allele or sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutput {
    #[serde(default)]
    pub tracks: BTreeMap<String, Vec<f64>>,
}

impl PredictionOutput {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Mean of a track, `None` for a missing or empty track.
    pub fn track_mean(&self, name: &str) -> Option<f64> {
        let values = self.tracks.get(name)?;
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantOutputs {
    pub reference: PredictionOutput,
    pub alternate: PredictionOutput,
}
