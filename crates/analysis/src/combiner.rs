//! Runs an ordered list of featurizers and merges their outputs.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use textfeat_core::config::RunMode;
use textfeat_core::{CollisionPolicy, FeatureMapping, MergeReport, TextfeatConfig};
use tracing::{debug, info, instrument, warn};

use crate::document::Document;
use crate::error::AnalysisResult;
use crate::features::{Featurizer, FeaturizerRegistry};
use crate::nlp::Toolkit;

/// Combined features of one text plus the collisions seen while merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedFeatures {
    /// Union of every featurizer's keys.
    pub features: FeatureMapping,
    /// Keys emitted by more than one featurizer, in merge order.
    pub report: MergeReport,
}

/// Merges several featurizers into one flat feature mapping.
///
/// Featurizers are merged in list order under the collision policy, so
/// with the default last-write-wins policy the later featurizer owns a
/// shared key. Parallel mode changes where featurizers run, never the
/// merge order.
pub struct Combiner {
    featurizers: Vec<Arc<dyn Featurizer>>,
    policy: CollisionPolicy,
    report_collisions: bool,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Combiner {
    /// Sequential last-write-wins combiner over `featurizers`.
    pub fn new(featurizers: Vec<Arc<dyn Featurizer>>) -> Self {
        Self {
            featurizers,
            policy: CollisionPolicy::default(),
            report_collisions: false,
            pool: None,
        }
    }

    /// Combiner configured from `config`, resolving names in `registry`.
    pub fn from_config(
        config: &TextfeatConfig,
        registry: &FeaturizerRegistry,
    ) -> AnalysisResult<Self> {
        config.validate()?;

        let combiner = Self::new(registry.select(config.featurizers.enabled.as_slice())?)
            .with_policy(config.combiner.collision_policy)
            .with_collision_reporting(config.combiner.report_collisions);

        match config.combiner.run_mode {
            RunMode::Sequential => Ok(combiner),
            RunMode::Parallel => combiner.with_parallelism(config.combiner.max_workers),
        }
    }

    /// Use `policy` for colliding keys.
    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log every collision at warn level.
    pub fn with_collision_reporting(mut self, enabled: bool) -> Self {
        self.report_collisions = enabled;
        self
    }

    /// Run featurizers and batch texts on a dedicated pool of `workers` threads.
    pub fn with_parallelism(mut self, workers: usize) -> AnalysisResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("textfeat-worker-{}", idx))
            .build()
            .map_err(|e| {
                textfeat_core::Error::config(format!("Failed to start worker pool: {}", e))
            })?;

        info!("Combiner running in parallel on {} workers", workers);
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    /// Names of the featurizers in merge order.
    pub fn featurizer_names(&self) -> Vec<String> {
        self.featurizers
            .iter()
            .map(|featurizer| featurizer.name().to_string())
            .collect()
    }

    /// Collision policy in effect.
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Whether featurizers run on a worker pool.
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Combined features of `text`.
    pub fn combine(&self, text: &str, toolkit: &Toolkit) -> AnalysisResult<FeatureMapping> {
        self.combine_with_report(text, toolkit)
            .map(|combined| combined.features)
    }

    /// Combined features of `text` with the collision report.
    pub fn combine_with_report(
        &self,
        text: &str,
        toolkit: &Toolkit,
    ) -> AnalysisResult<CombinedFeatures> {
        self.combine_document(&Document::new(text, toolkit))
    }

    /// Combined features of an already annotated document.
    ///
    /// Fails with the first error in list order; no partial mapping is
    /// returned.
    #[instrument(skip_all, fields(featurizers = self.featurizers.len()))]
    pub fn combine_document(&self, doc: &Document<'_>) -> AnalysisResult<CombinedFeatures> {
        let outputs = match &self.pool {
            Some(pool) => pool
                .install(|| {
                    self.featurizers
                        .par_iter()
                        .map(|featurizer| featurizer.featurize(doc))
                        .collect::<Vec<_>>()
                })
                .into_iter()
                .collect::<AnalysisResult<Vec<_>>>()?,
            None => self
                .featurizers
                .iter()
                .map(|featurizer| featurizer.featurize(doc))
                .collect::<AnalysisResult<Vec<_>>>()?,
        };

        let mut combined = CombinedFeatures::default();
        let mut owners = BTreeMap::new();

        for (featurizer, features) in self.featurizers.iter().zip(outputs) {
            debug!(
                "Featurizer {} produced {} features",
                featurizer.name(),
                features.len()
            );

            let report =
                combined
                    .features
                    .merge(features, featurizer.name(), &mut owners, self.policy)?;
            if self.report_collisions {
                for collision in &report.collisions {
                    warn!("Feature collision: {}", collision);
                }
            }
            combined.report.extend(report);
        }

        Ok(combined)
    }

    /// Combined features of every text, in input order.
    ///
    /// Each text succeeds or fails on its own. Texts are spread over the
    /// worker pool in parallel mode.
    pub fn featurize_batch<S>(
        &self,
        texts: &[S],
        toolkit: &Toolkit,
    ) -> Vec<AnalysisResult<FeatureMapping>>
    where
        S: AsRef<str> + Sync,
    {
        debug!("Featurizing batch of {} texts", texts.len());
        match &self.pool {
            Some(pool) => pool.install(|| {
                texts
                    .par_iter()
                    .map(|text| self.combine(text.as_ref(), toolkit))
                    .collect()
            }),
            None => texts
                .iter()
                .map(|text| self.combine(text.as_ref(), toolkit))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Combiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combiner")
            .field("featurizers", &self.featurizer_names())
            .field("policy", &self.policy)
            .field("report_collisions", &self.report_collisions)
            .field("parallel", &self.is_parallel())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use textfeat_core::FeatureValue;

    struct Failing;

    impl Featurizer for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn featurize(&self, _doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
            Err(AnalysisError::Toolkit("tagger offline".to_string()))
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Featurizer for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn description(&self) -> &str {
            "counts calls"
        }

        fn featurize(&self, _doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(FeatureMapping::new())
        }
    }

    fn toolkit() -> Toolkit {
        Toolkit::with_defaults().expect("toolkit")
    }

    #[test]
    fn default_config_runs_bow_length_and_readability() {
        let combiner =
            Combiner::from_config(&TextfeatConfig::default(), &FeaturizerRegistry::new())
                .expect("combiner");
        assert_eq!(
            combiner.featurizer_names(),
            vec!["bow_binary", "length", "readability"]
        );
        assert!(!combiner.is_parallel());
        assert_eq!(combiner.policy(), CollisionPolicy::LastWriteWins);

        let features = combiner.combine("Cats sleep.", &toolkit()).expect("combine");
        assert_eq!(features.get("cats"), Some(&FeatureValue::Flag(true)));
        assert_eq!(features.get("sent_length"), Some(&FeatureValue::Count(3)));
        let grade = features.get("fk_grade").map(FeatureValue::as_f64).unwrap_or(0.0);
        assert!((grade - -3.01).abs() < 1e-9);
    }

    #[test]
    fn parallel_config_builds_a_pool() {
        let mut config = TextfeatConfig::default();
        config.combiner.run_mode = RunMode::Parallel;
        config.combiner.max_workers = 2;
        let combiner =
            Combiner::from_config(&config, &FeaturizerRegistry::new()).expect("combiner");
        assert!(combiner.is_parallel());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = TextfeatConfig::default();
        config.featurizers.enabled = vec!["length".to_string(), "irony".to_string()];
        let err = Combiner::from_config(&config, &FeaturizerRegistry::new())
            .err()
            .expect("unknown featurizer");
        assert!(matches!(err, AnalysisError::UnknownFeaturizer(_)));

        config.featurizers.enabled.clear();
        let err = Combiner::from_config(&config, &FeaturizerRegistry::new())
            .err()
            .expect("empty selection");
        assert!(matches!(err, AnalysisError::Core(_)));
    }

    #[test]
    fn failing_featurizer_fails_the_text() {
        let featurizers = FeaturizerRegistry::new()
            .select(&["length", "readability"])
            .expect("select");
        let combiner = Combiner::new(featurizers);
        let err = combiner.combine("", &toolkit()).expect_err("degenerate");
        assert!(matches!(err, AnalysisError::Degenerate { .. }));
    }

    #[test]
    fn sequential_run_stops_at_first_failure() {
        let counting = Arc::new(Counting::default());
        let failing: Arc<dyn Featurizer> = Arc::new(Failing);
        let featurizers = vec![failing, counting.clone() as Arc<dyn Featurizer>];
        let err = Combiner::new(featurizers)
            .combine("text", &toolkit())
            .expect_err("failing featurizer");
        assert!(matches!(err, AnalysisError::Toolkit(_)));
        assert_eq!(counting.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn degenerate_text_fails_only_itself_in_a_batch() {
        let toolkit = toolkit();
        let texts = ["Cats sleep.", "???", "Dogs run."];
        let registry = FeaturizerRegistry::new();
        let config = TextfeatConfig::default();
        let sequential = Combiner::from_config(&config, &registry).expect("combiner");
        let parallel = Combiner::from_config(&config, &registry)
            .expect("combiner")
            .with_parallelism(2)
            .expect("pool");

        for combiner in [sequential, parallel] {
            let results = combiner.featurize_batch(texts.as_slice(), &toolkit);
            assert_eq!(results.len(), 3);
            assert!(results[0].is_ok());
            assert!(matches!(results[1], Err(AnalysisError::Degenerate { .. })));
            let last = results[2].as_ref().expect("third text");
            assert_eq!(last.get("dogs"), Some(&FeatureValue::Flag(true)));
        }
    }

    #[test]
    fn batch_keeps_input_order() {
        let featurizers = FeaturizerRegistry::new()
            .select(&["length"])
            .expect("select");
        let combiner = Combiner::new(featurizers)
            .with_parallelism(2)
            .expect("pool");
        let texts = ["one", "one two", "one two three", "a b c d"];
        let lengths: Vec<f64> = combiner
            .featurize_batch(texts.as_slice(), &toolkit())
            .iter()
            .map(|result| {
                result
                    .as_ref()
                    .ok()
                    .and_then(|features| features.get("sent_length"))
                    .map(FeatureValue::as_f64)
                    .unwrap_or(0.0)
            })
            .collect();
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
