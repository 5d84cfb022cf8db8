use std::sync::Arc;

use textfeat_analysis::{
    AnalysisError, AnalysisResult, Annotations, Combiner, Document, Featurizer,
    FeaturizerRegistry, Toolkit,
};
use textfeat_core::{CollisionPolicy, FeatureMapping, FeatureValue};

/// Featurizer that emits a fixed mapping regardless of the text.
struct Static {
    name: &'static str,
    features: Vec<(&'static str, FeatureValue)>,
}

impl Static {
    fn new(name: &'static str, features: &[(&'static str, FeatureValue)]) -> Arc<dyn Featurizer> {
        Arc::new(Self {
            name,
            features: features.to_vec(),
        })
    }
}

impl Featurizer for Static {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "static test output"
    }

    fn featurize(&self, _doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        Ok(self
            .features
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect())
    }
}

/// Featurizer that fails for every text.
struct Broken;

impl Featurizer for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "always fails"
    }

    fn featurize(&self, _doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        Err(AnalysisError::Toolkit("collaborator unavailable".to_string()))
    }
}

fn toolkit() -> Toolkit {
    Toolkit::with_defaults().expect("toolkit")
}

fn pair() -> (Arc<dyn Featurizer>, Arc<dyn Featurizer>) {
    let a = Static::new(
        "a",
        &[("x", FeatureValue::Count(1)), ("only_a", FeatureValue::Flag(true))],
    );
    let b = Static::new(
        "b",
        &[("x", FeatureValue::Count(2)), ("only_b", FeatureValue::Score(0.5))],
    );
    (a, b)
}

#[test]
fn later_featurizer_wins_collisions() {
    let (a, b) = pair();
    let combined = Combiner::new(vec![a, b])
        .combine_with_report("anything", &toolkit())
        .expect("combine");

    assert_eq!(combined.features.get("x"), Some(&FeatureValue::Count(2)));
    assert_eq!(combined.features.len(), 3);

    assert_eq!(combined.report.collisions.len(), 1);
    let collision = &combined.report.collisions[0];
    assert_eq!(collision.key, "x");
    assert_eq!(collision.previous, FeatureValue::Count(1));
    assert_eq!(collision.previous_source, "a");
    assert_eq!(collision.incoming, FeatureValue::Count(2));
    assert_eq!(collision.incoming_source, "b");
}

#[test]
fn order_changes_values_not_keys() {
    let toolkit = toolkit();
    let (a, b) = pair();

    let ab = Combiner::new(vec![a.clone(), b.clone()])
        .combine("text", &toolkit)
        .expect("combine");
    let ba = Combiner::new(vec![b, a]).combine("text", &toolkit).expect("combine");

    assert_eq!(ab.keys().collect::<Vec<_>>(), ba.keys().collect::<Vec<_>>());
    assert_eq!(ab.get("x"), Some(&FeatureValue::Count(2)));
    assert_eq!(ba.get("x"), Some(&FeatureValue::Count(1)));
}

#[test]
fn first_write_wins_keeps_earliest_value() {
    let (a, b) = pair();
    let combined = Combiner::new(vec![a, b])
        .with_policy(CollisionPolicy::FirstWriteWins)
        .combine_with_report("text", &toolkit())
        .expect("combine");

    assert_eq!(combined.features.get("x"), Some(&FeatureValue::Count(1)));
    assert_eq!(combined.report.collisions.len(), 1);
}

#[test]
fn error_policy_rejects_collisions() {
    let (a, b) = pair();
    let err = Combiner::new(vec![a, b])
        .with_policy(CollisionPolicy::Error)
        .combine("text", &toolkit())
        .expect_err("collision");

    let message = err.to_string();
    assert!(message.contains("'x'"), "{}", message);
    assert!(matches!(err, AnalysisError::Core(_)));
}

#[test]
fn disjoint_outputs_merge_cleanly() {
    let a = Static::new("a", &[("left", FeatureValue::Count(1))]);
    let b = Static::new("b", &[("right", FeatureValue::Count(1))]);
    let combined = Combiner::new(vec![a, b])
        .with_collision_reporting(true)
        .combine_with_report("text", &toolkit())
        .expect("combine");

    assert!(combined.report.is_clean());
    assert_eq!(combined.features.len(), 2);
}

#[test]
fn any_failure_fails_the_whole_text() {
    let (a, _) = pair();
    let combiner = Combiner::new(vec![a, Arc::new(Broken)]);
    let err = combiner.combine("text", &toolkit()).expect_err("broken");
    assert!(matches!(err, AnalysisError::Toolkit(_)));
}

#[test]
fn parallel_matches_sequential() {
    let toolkit = toolkit();
    let registry = FeaturizerRegistry::new();
    let names = [
        "bow_binary",
        "bow_count",
        "length",
        "question_words",
        "pos_counts",
        "content_words",
        "bigrams",
        "sentiment_polarity",
    ];
    let (a, b) = pair();
    let mut featurizers = registry.select(&names).expect("select");
    featurizers.push(a);
    featurizers.push(b);

    let sequential = Combiner::new(featurizers.clone());
    let parallel = Combiner::new(featurizers)
        .with_parallelism(4)
        .expect("pool");

    for text in [
        "What is the meaning of life?",
        "Why didn't you tell me? I would have helped!",
        "",
    ] {
        let expected = sequential
            .combine_with_report(text, &toolkit)
            .expect("sequential");
        let actual = parallel
            .combine_with_report(text, &toolkit)
            .expect("parallel");
        assert_eq!(actual, expected, "{}", text);
    }
}

#[test]
fn batch_matches_per_text_combination() {
    let toolkit = toolkit();
    let featurizers = FeaturizerRegistry::new()
        .select(&["bow_count", "length", "readability"])
        .expect("select");
    let combiner = Combiner::new(featurizers);

    let texts = vec!["Cats sleep.".to_string(), "Do dogs dream?".to_string()];
    let batch = combiner.featurize_batch(&texts[..], &toolkit);
    assert_eq!(batch.len(), 2);
    for (text, result) in texts.iter().zip(batch) {
        let features = result.expect("batch entry");
        assert_eq!(combiner.combine(text, &toolkit).expect("combine"), features);
    }
}

#[test]
fn combined_mapping_serializes_as_flat_object() {
    let featurizers = FeaturizerRegistry::new()
        .select(&["bow_binary", "length"])
        .expect("select");
    let features = Combiner::new(featurizers)
        .combine("Cats sleep.", &toolkit())
        .expect("combine");
    let json = serde_json::to_string(&features).expect("serialize");
    assert_eq!(json, r#"{".":1,"cats":1,"sent_length":3,"sleep":1}"#);
}

#[test]
fn supplied_annotations_are_shared() {
    let toolkit = toolkit();
    let featurizers = FeaturizerRegistry::new()
        .select(&["bow_binary", "length"])
        .expect("select");
    let annotations = Annotations {
        tokens: Some(vec!["pre".to_string(), "tokenized".to_string()]),
        ..Annotations::default()
    };
    let doc = Document::with_annotations("ignored text here", &toolkit, annotations);

    let combined = Combiner::new(featurizers)
        .combine_document(&doc)
        .expect("combine");
    assert_eq!(combined.features.get("sent_length"), Some(&FeatureValue::Count(2)));
    assert!(combined.features.contains_key("tokenized"));
    assert!(!combined.features.contains_key("ignored"));
}

#[test]
fn unknown_featurizer_fails_at_selection() {
    let registry = FeaturizerRegistry::new();
    match registry.select(&["bow_binary", "emoji_density"]) {
        Err(AnalysisError::UnknownFeaturizer(name)) => assert_eq!(name, "emoji_density"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("unknown featurizer was accepted"),
    }
}
