use super::types::*;
use crate::{
    Error, Result,
    config::ModelConfig,
    genome::{Interval, OutputType, PredictionOutput, Variant, VariantOutputs},
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// External genomic prediction model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenomeModel: Send + Sync {
    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::default()
    }

    async fn predict_variant(
        &self,
        interval: &Interval,
        variant: &Variant,
        ontology_terms: &[String],
        requested_outputs: &[OutputType],
    ) -> Result<VariantOutputs>;

    async fn predict_sequence(
        &self,
        interval: &Interval,
        requested_outputs: &[OutputType],
    ) -> Result<PredictionOutput>;
}

/// JSON-over-HTTP model endpoint authenticated with a bearer API key.
pub struct HttpGenomeModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGenomeModel {
    pub fn new(config: ModelConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config("model.base_url must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::model(format!(
                "{} returned {}: {}",
                endpoint,
                status,
                body.trim()
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GenomeModel for HttpGenomeModel {
    async fn predict_variant(
        &self,
        interval: &Interval,
        variant: &Variant,
        ontology_terms: &[String],
        requested_outputs: &[OutputType],
    ) -> Result<VariantOutputs> {
        let request = PredictVariantRequest {
            interval,
            variant,
            ontology_terms,
            requested_outputs,
        };
        let response: PredictVariantResponse = self.post("/v1/variant:predict", &request).await?;
        debug!(
            "Variant {} returned {} reference / {} alternate tracks",
            variant,
            response.reference.tracks.len(),
            response.alternate.tracks.len()
        );
        Ok(response.into())
    }

    async fn predict_sequence(
        &self,
        interval: &Interval,
        requested_outputs: &[OutputType],
    ) -> Result<PredictionOutput> {
        let request = PredictSequenceRequest {
            interval,
            requested_outputs,
        };
        let response: PredictSequenceResponse =
            self.post("/v1/sequence:predict", &request).await?;
        Ok(response.output)
    }
}
