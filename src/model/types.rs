use crate::genome::{Interval, OutputType, PredictionOutput, Variant, VariantOutputs};
use serde::{Deserialize, Serialize};

/// What a model handle guarantees about its responses. Read once when a
/// batch runner is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Variant predictions carry both a reference and an alternate output.
    pub paired_variant_outputs: bool,
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self {
            paired_variant_outputs: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictVariantRequest<'a> {
    pub interval: &'a Interval,
    pub variant: &'a Variant,
    pub ontology_terms: &'a [String],
    pub requested_outputs: &'a [OutputType],
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictSequenceRequest<'a> {
    pub interval: &'a Interval,
    pub requested_outputs: &'a [OutputType],
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictVariantResponse {
    #[serde(default)]
    pub reference: PredictionOutput,
    #[serde(default)]
    pub alternate: PredictionOutput,
}

impl From<PredictVariantResponse> for VariantOutputs {
    fn from(response: PredictVariantResponse) -> Self {
        Self {
            reference: response.reference,
            alternate: response.alternate,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictSequenceResponse {
    #[serde(flatten)]
    pub output: PredictionOutput,
}
