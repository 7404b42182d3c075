use super::types::*;
use crate::{
    genome::{Interval, OutputType, PredictionRequest, Variant},
    model::{GenomeModel, ModelCapabilities},
    monitor::UsageMonitor,
};
use tracing::{debug, error, info};

/// Runs prediction requests one at a time against a model, recording one
/// result per request. A failing request is recorded and the batch moves
/// on; nothing is retried.
pub struct BatchRunner {
    model: Box<dyn GenomeModel>,
    capabilities: ModelCapabilities,
    monitor: Option<UsageMonitor>,
}

impl BatchRunner {
    pub fn new(model: Box<dyn GenomeModel>) -> Self {
        let capabilities = model.capabilities();
        debug!("Model capabilities: {:?}", capabilities);
        Self {
            model,
            capabilities,
            monitor: None,
        }
    }

    /// Counts every issued call against `monitor`.
    pub fn with_monitor(mut self, monitor: UsageMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn monitor(&self) -> Option<&UsageMonitor> {
        self.monitor.as_ref()
    }

    pub fn into_monitor(self) -> Option<UsageMonitor> {
        self.monitor
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    pub async fn run_variant_batch(
        &mut self,
        variants: &[Variant],
        options: &VariantBatchOptions,
    ) -> ResultTable {
        let requested_outputs = outputs_or_default(&options.requested_outputs);
        let mut results = ResultTable::default();

        for (i, variant) in variants.iter().enumerate() {
            debug!("Predicting variant {}/{}: {}", i + 1, variants.len(), variant);
            results.push(
                self.predict_variant(variant, options, requested_outputs)
                    .await,
            );
        }

        info!(
            "Completed {} variant predictions ({} successful)",
            results.len(),
            results.success_count()
        );
        results
    }

    pub async fn run_interval_batch(
        &mut self,
        intervals: &[Interval],
        requested_outputs: &[OutputType],
    ) -> ResultTable {
        let requested_outputs = outputs_or_default(requested_outputs);
        let mut results = ResultTable::default();

        for (i, interval) in intervals.iter().enumerate() {
            debug!("Predicting interval {}/{}: {}", i + 1, intervals.len(), interval);
            results.push(self.predict_sequence(interval, requested_outputs).await);
        }

        info!(
            "Completed {} sequence predictions ({} successful)",
            results.len(),
            results.success_count()
        );
        results
    }

    /// Runs a mixed list of requests in order. Variants use `options`;
    /// intervals use `options.requested_outputs`.
    pub async fn run_requests(
        &mut self,
        requests: &[PredictionRequest],
        options: &VariantBatchOptions,
    ) -> ResultTable {
        let requested_outputs = outputs_or_default(&options.requested_outputs);
        let mut results = ResultTable::default();

        for request in requests {
            let result = match request {
                PredictionRequest::Variant(variant) => {
                    self.predict_variant(variant, options, requested_outputs)
                        .await
                }
                PredictionRequest::Interval(interval) => {
                    self.predict_sequence(interval, requested_outputs).await
                }
            };
            results.push(result);
        }

        info!(
            "Completed {} predictions ({} successful)",
            results.len(),
            results.success_count()
        );
        results
    }

    async fn predict_variant(
        &mut self,
        variant: &Variant,
        options: &VariantBatchOptions,
        requested_outputs: &[OutputType],
    ) -> PredictionResult {
        let interval = match &options.interval {
            Some(interval) => interval.clone(),
            None => variant.default_window(),
        };

        let outcome = self
            .model
            .predict_variant(
                &interval,
                variant,
                &options.ontology_terms,
                requested_outputs,
            )
            .await;
        self.record_call();

        match outcome {
            Ok(_) => PredictionResult::success(
                variant.clone(),
                Some(self.capabilities.paired_variant_outputs),
            ),
            Err(e) => {
                error!(
                    "Error predicting variant {}:{}: {}",
                    variant.chromosome, variant.position, e
                );
                PredictionResult::failure(variant.clone(), e.to_string())
            }
        }
    }

    async fn predict_sequence(
        &mut self,
        interval: &Interval,
        requested_outputs: &[OutputType],
    ) -> PredictionResult {
        let outcome = self
            .model
            .predict_sequence(interval, requested_outputs)
            .await;
        self.record_call();

        match outcome {
            Ok(_) => PredictionResult::success(interval.clone(), None),
            Err(e) => {
                error!("Error predicting interval {}: {}", interval, e);
                PredictionResult::failure(interval.clone(), e.to_string())
            }
        }
    }

    fn record_call(&mut self) {
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.increment(1);
        }
    }
}

fn outputs_or_default(requested: &[OutputType]) -> &[OutputType] {
    if requested.is_empty() {
        DEFAULT_OUTPUT_TYPES
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        genome::{PredictionOutput, VariantOutputs},
        model::MockGenomeModel,
    };
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn variants() -> Vec<Variant> {
        vec![
            Variant::new("chr22", 36_201_698, "A", "C"),
            Variant::new("chr22", 36_201_699, "G", "T"),
            Variant::new("chr1", 10, "C", "T"),
        ]
    }

    fn paired_model() -> MockGenomeModel {
        let mut model = MockGenomeModel::new();
        model
            .expect_capabilities()
            .returning(ModelCapabilities::default);
        model
    }

    #[tokio::test]
    async fn test_all_successful_variants() {
        let mut model = paired_model();
        model
            .expect_predict_variant()
            .times(3)
            .returning(|_, _, _, _| Ok(VariantOutputs::default()));

        let mut runner = BatchRunner::new(Box::new(model));
        let results = runner
            .run_variant_batch(&variants(), &VariantBatchOptions::default())
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.success_count(), 3);
        for (result, variant) in results.iter().zip(variants()) {
            assert_eq!(result.request, PredictionRequest::Variant(variant));
            assert_eq!(
                result.outcome,
                PredictionOutcome::Success {
                    has_outputs: Some(true)
                }
            );
            assert!(result.error().is_none());
        }
    }

    #[tokio::test]
    async fn test_all_failing_variants_complete_the_batch() {
        let mut model = paired_model();
        model
            .expect_predict_variant()
            .times(3)
            .returning(|_, _, _, _| Err(Error::model("503 Service Unavailable")));

        let mut runner = BatchRunner::new(Box::new(model));
        let results = runner
            .run_variant_batch(&variants(), &VariantBatchOptions::default())
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.success_count(), 0);
        for result in &results {
            let error = result.error().unwrap();
            assert!(error.contains("503 Service Unavailable"));
        }
    }

    #[tokio::test]
    async fn test_default_window_derived_per_variant() {
        let seen: Arc<Mutex<Vec<Interval>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_in_mock = Arc::clone(&seen);

        let mut model = paired_model();
        model
            .expect_predict_variant()
            .returning(move |interval, _, _, outputs| {
                assert_eq!(outputs, &[OutputType::RnaSeq][..]);
                seen_in_mock.lock().unwrap().push(interval.clone());
                Ok(VariantOutputs::default())
            });

        let mut runner = BatchRunner::new(Box::new(model));
        runner
            .run_variant_batch(&variants(), &VariantBatchOptions::default())
            .await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].to_string(), "chr22:36151698-36251698");
        assert_eq!(seen[1].to_string(), "chr22:36151699-36251699");
        assert_eq!(seen[2].to_string(), "chr1:0-50010");
    }

    #[tokio::test]
    async fn test_caller_interval_and_terms_are_forwarded() {
        let fixed = Interval::new("chr22", 35_677_410, 36_725_986).unwrap();
        let expected = fixed.clone();

        let mut model = paired_model();
        model
            .expect_predict_variant()
            .times(3)
            .returning(move |interval, _, terms, outputs| {
                assert_eq!(interval, &expected);
                assert_eq!(terms, &["UBERON:0001157".to_string()][..]);
                assert_eq!(outputs, &[OutputType::Dnase][..]);
                Ok(VariantOutputs::default())
            });

        let options = VariantBatchOptions {
            interval: Some(fixed),
            ontology_terms: vec!["UBERON:0001157".to_string()],
            requested_outputs: vec![OutputType::Dnase],
        };
        let mut runner = BatchRunner::new(Box::new(model));
        let results = runner.run_variant_batch(&variants(), &options).await;
        assert_eq!(results.success_count(), 3);
    }

    #[tokio::test]
    async fn test_unpaired_model_marks_rows_without_outputs() {
        let mut model = MockGenomeModel::new();
        model.expect_capabilities().returning(|| ModelCapabilities {
            paired_variant_outputs: false,
        });
        model
            .expect_predict_variant()
            .returning(|_, _, _, _| Ok(VariantOutputs::default()));

        let mut runner = BatchRunner::new(Box::new(model));
        let results = runner
            .run_variant_batch(&variants()[..1], &VariantBatchOptions::default())
            .await;
        assert_eq!(
            results.results()[0].outcome,
            PredictionOutcome::Success {
                has_outputs: Some(false)
            }
        );
    }

    #[tokio::test]
    async fn test_monitor_counts_every_attempt() {
        let temp_dir = TempDir::new().unwrap();
        let monitor = UsageMonitor::new(100, 0.9, temp_dir.path().join("usage.log")).unwrap();

        let mut model = paired_model();
        let mut call = 0;
        model.expect_predict_variant().returning(move |_, _, _, _| {
            call += 1;
            if call == 2 {
                Err(Error::model("bad allele"))
            } else {
                Ok(VariantOutputs::default())
            }
        });

        let mut runner = BatchRunner::new(Box::new(model)).with_monitor(monitor);
        let results = runner
            .run_variant_batch(&variants(), &VariantBatchOptions::default())
            .await;

        assert_eq!(results.success_count(), 2);
        assert!(!results.results()[1].is_success());
        let monitor = runner.into_monitor().unwrap();
        assert_eq!(monitor.usage().calls, 3);
        assert_eq!(monitor.usage().remaining, 97);
    }

    #[tokio::test]
    async fn test_interval_batch_mixed_outcomes() {
        let intervals = vec![
            Interval::new("chr22", 35_677_410, 36_725_986).unwrap(),
            Interval::new("chr21", 33_000_000, 34_000_000).unwrap(),
        ];

        let mut model = paired_model();
        model
            .expect_predict_sequence()
            .times(2)
            .returning(|interval, _| {
                if interval.chromosome() == "chr21" {
                    Err(Error::model("interval too long"))
                } else {
                    Ok(PredictionOutput::default())
                }
            });

        let mut runner = BatchRunner::new(Box::new(model));
        let results = runner.run_interval_batch(&intervals, &[]).await;

        assert_eq!(results.len(), 2);
        assert!(results.results()[0].is_success());
        assert_eq!(
            results.results()[1].error(),
            Some("Model error: interval too long")
        );
        let table = results.to_table();
        assert_eq!(
            table.columns(),
            ["chromosome", "start", "end", "length", "success", "error"]
        );
    }

    #[tokio::test]
    async fn test_run_requests_keeps_input_order() {
        let requests = vec![
            PredictionRequest::from(Interval::new("chr2", 1, 100).unwrap()),
            PredictionRequest::from(Variant::new("chr3", 500, "A", "T")),
            PredictionRequest::from(Interval::new("chr4", 5, 10).unwrap()),
        ];

        let mut model = paired_model();
        model
            .expect_predict_sequence()
            .times(2)
            .returning(|_, _| Ok(PredictionOutput::default()));
        model
            .expect_predict_variant()
            .times(1)
            .returning(|_, _, _, _| Ok(VariantOutputs::default()));

        let mut runner = BatchRunner::new(Box::new(model));
        let results = runner
            .run_requests(&requests, &VariantBatchOptions::default())
            .await;

        let chromosomes: Vec<&str> = results.iter().map(|r| r.request.chromosome()).collect();
        assert_eq!(chromosomes, vec!["chr2", "chr3", "chr4"]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let mut runner = BatchRunner::new(Box::new(paired_model()));
        let results = runner
            .run_variant_batch(&[], &VariantBatchOptions::default())
            .await;
        assert!(results.is_empty());
        assert!(results.to_table().columns().is_empty());
    }
}
