use async_trait::async_trait;
use genome_batch::{
    Error, Result,
    genome::{Interval, OutputType, PredictionOutput, Variant, VariantOutputs},
    model::{GenomeModel, ModelCapabilities},
};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

/// A call seen by [`MockGenomeModel`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Variant {
        interval: Interval,
        variant: Variant,
        ontology_terms: Vec<String>,
        requested_outputs: Vec<OutputType>,
    },
    Sequence {
        interval: Interval,
        requested_outputs: Vec<OutputType>,
    },
}

/// Mock genome model for testing
#[derive(Debug, Clone)]
pub struct MockGenomeModel {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    /// Chromosomes whose predictions fail
    pub failing_chromosomes: HashSet<String>,
    pub error: Option<String>,
    pub capabilities: ModelCapabilities,
}

impl MockGenomeModel {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_chromosomes: HashSet::new(),
            error: None,
            capabilities: ModelCapabilities::default(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn failing_on(mut self, chromosome: impl Into<String>) -> Self {
        self.failing_chromosomes.insert(chromosome.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, chromosome: &str) -> Result<()> {
        if let Some(ref error) = self.error {
            return Err(Error::model(error.clone()));
        }
        if self.failing_chromosomes.contains(chromosome) {
            return Err(Error::model(format!("unsupported chromosome {chromosome}")));
        }
        Ok(())
    }
}

impl Default for MockGenomeModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenomeModel for MockGenomeModel {
    fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    async fn predict_variant(
        &self,
        interval: &Interval,
        variant: &Variant,
        ontology_terms: &[String],
        requested_outputs: &[OutputType],
    ) -> Result<VariantOutputs> {
        self.calls.lock().unwrap().push(RecordedCall::Variant {
            interval: interval.clone(),
            variant: variant.clone(),
            ontology_terms: ontology_terms.to_vec(),
            requested_outputs: requested_outputs.to_vec(),
        });
        self.check(&variant.chromosome)?;

        Ok(VariantOutputs {
            reference: create_mock_output(&[("RNA_SEQ", vec![1.0, 2.0, 3.0])]),
            alternate: create_mock_output(&[("RNA_SEQ", vec![2.0, 3.0, 4.0])]),
        })
    }

    async fn predict_sequence(
        &self,
        interval: &Interval,
        requested_outputs: &[OutputType],
    ) -> Result<PredictionOutput> {
        self.calls.lock().unwrap().push(RecordedCall::Sequence {
            interval: interval.clone(),
            requested_outputs: requested_outputs.to_vec(),
        });
        self.check(interval.chromosome())?;

        Ok(create_mock_output(&[("RNA_SEQ", vec![0.5; 4])]))
    }
}

/// Create a prediction output from `(track, values)` pairs
pub fn create_mock_output(tracks: &[(&str, Vec<f64>)]) -> PredictionOutput {
    PredictionOutput {
        tracks: tracks
            .iter()
            .map(|(name, values)| (name.to_string(), values.clone()))
            .collect::<BTreeMap<_, _>>(),
    }
}
