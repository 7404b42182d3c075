use crate::export::{Cell, Table};
use crate::genome::{Interval, OutputType, PredictionRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Success {
        /// Set for variant predictions: whether the model guarantees both a
        /// reference and an alternate output.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has_outputs: Option<bool>,
    },
    Failure {
        error: String,
    },
}

/// One row of a batch: the originating request and what happened to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub request: PredictionRequest,
    pub outcome: PredictionOutcome,
}

impl PredictionResult {
    pub fn success(request: impl Into<PredictionRequest>, has_outputs: Option<bool>) -> Self {
        Self {
            request: request.into(),
            outcome: PredictionOutcome::Success { has_outputs },
        }
    }

    pub fn failure(request: impl Into<PredictionRequest>, error: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            outcome: PredictionOutcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PredictionOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            PredictionOutcome::Failure { error } => Some(error),
            PredictionOutcome::Success { .. } => None,
        }
    }

    fn to_record(&self) -> Vec<(&'static str, Cell)> {
        let mut record = match &self.request {
            PredictionRequest::Variant(variant) => vec![
                ("chromosome", Cell::from(variant.chromosome.as_str())),
                ("position", Cell::from(variant.position)),
                ("reference", Cell::from(variant.reference_bases.as_str())),
                ("alternate", Cell::from(variant.alternate_bases.as_str())),
            ],
            PredictionRequest::Interval(interval) => vec![
                ("chromosome", Cell::from(interval.chromosome())),
                ("start", Cell::from(interval.start())),
                ("end", Cell::from(interval.end())),
                ("length", Cell::from(interval.length())),
            ],
        };

        record.push(("success", Cell::from(self.is_success())));
        match &self.outcome {
            PredictionOutcome::Success {
                has_outputs: Some(has_outputs),
            } => record.push(("has_outputs", Cell::from(*has_outputs))),
            PredictionOutcome::Success { has_outputs: None } => {}
            PredictionOutcome::Failure { error } => {
                record.push(("error", Cell::from(error.as_str())))
            }
        }
        record
    }
}

/// Batch results in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    results: Vec<PredictionResult>,
}

impl ResultTable {
    pub fn new(results: Vec<PredictionResult>) -> Self {
        Self { results }
    }

    pub(crate) fn push(&mut self, result: PredictionResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[PredictionResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PredictionResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// Flattens the results into a [`Table`]. Columns are the request fields,
    /// then `success`, then `has_outputs` / `error` when any row sets them.
    pub fn to_table(&self) -> Table {
        Table::from_records(self.results.iter().map(PredictionResult::to_record))
    }
}

impl IntoIterator for ResultTable {
    type Item = PredictionResult;
    type IntoIter = std::vec::IntoIter<PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a PredictionResult;
    type IntoIter = std::slice::Iter<'a, PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Output types requested when a caller names none.
pub const DEFAULT_OUTPUT_TYPES: &[OutputType] = &[OutputType::RnaSeq];

#[derive(Debug, Clone, PartialEq)]
pub struct VariantBatchOptions {
    /// Window used for every variant; `None` derives a default window per
    /// variant.
    pub interval: Option<Interval>,
    pub ontology_terms: Vec<String>,
    pub requested_outputs: Vec<OutputType>,
}

impl Default for VariantBatchOptions {
    fn default() -> Self {
        Self {
            interval: None,
            ontology_terms: Vec::new(),
            requested_outputs: DEFAULT_OUTPUT_TYPES.to_vec(),
        }
    }
}
