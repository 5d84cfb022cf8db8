use std::collections::HashSet;
use textfeat_core::constants::SYN_COMPLEXITY_KEY;
use textfeat_core::{FeatureMapping, FeatureValue};
use tracing::debug;

use super::Featurizer;
use crate::document::Document;
use crate::error::{AnalysisError, AnalysisResult};
use crate::nlp::DependencyTree;

/// Verb and adjective tags counted by [`PosCountFeaturizer`].
pub const TRACKED_TAGS: [&str; 9] = ["VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "JJ", "JJR", "JJS"];

/// Counts of verb and adjective tags; all nine keys are always present.
#[derive(Debug, Clone, Default)]
pub struct PosCountFeaturizer;

impl PosCountFeaturizer {
    /// Create a new PosCountFeaturizer.
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for PosCountFeaturizer {
    fn name(&self) -> &str {
        "pos_counts"
    }

    fn description(&self) -> &str {
        "Counts of verb and adjective part-of-speech tags"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let mut features: FeatureMapping = TRACKED_TAGS
            .iter()
            .map(|tag| (tag.to_string(), FeatureValue::Count(0)))
            .collect();

        for tagged in doc.tagged()? {
            if TRACKED_TAGS.contains(&tagged.tag.as_str()) {
                features.increment(tagged.tag.as_str());
            }
        }

        Ok(features)
    }
}

/// Longest root-to-leaf path of the dependency parse under `syn_complexity`.
///
/// Depth counts nodes, so a lone root has depth 1. Only the first ROOT
/// token is walked.
#[derive(Debug, Clone, Default)]
pub struct SyntacticDepthFeaturizer;

impl SyntacticDepthFeaturizer {
    /// Create a new SyntacticDepthFeaturizer.
    pub fn new() -> Self {
        Self
    }

    fn depth(&self, tree: &DependencyTree, limit: usize) -> AnalysisResult<usize> {
        let root = tree
            .roots()
            .next()
            .ok_or_else(|| AnalysisError::malformed(self.name(), "parse has no ROOT token"))?;

        let mut visited = HashSet::from([root]);
        let mut stack = vec![(root, 1usize)];
        let mut deepest = 0;

        while let Some((idx, depth)) = stack.pop() {
            if depth > limit {
                return Err(AnalysisError::malformed(
                    self.name(),
                    format!("tree deeper than {} levels", limit),
                ));
            }
            deepest = deepest.max(depth);

            let node = tree.node(idx).ok_or_else(|| {
                AnalysisError::malformed(self.name(), format!("dangling node index {}", idx))
            })?;
            for &child in &node.children {
                if !visited.insert(child) {
                    return Err(AnalysisError::malformed(
                        self.name(),
                        format!("node {} reached twice (cycle)", child),
                    ));
                }
                stack.push((child, depth + 1));
            }
        }

        Ok(deepest)
    }
}

impl Featurizer for SyntacticDepthFeaturizer {
    fn name(&self) -> &str {
        "syntactic_depth"
    }

    fn description(&self) -> &str {
        "Depth of the dependency tree below the first root"
    }

    fn featurize(&self, doc: &Document<'_>) -> AnalysisResult<FeatureMapping> {
        let toolkit = doc.toolkit();
        let tree = toolkit.parser().parse(doc.text())?;
        let depth = self.depth(&tree, toolkit.max_tree_depth())?;
        debug!("Dependency tree of {} nodes has depth {}", tree.len(), depth);

        let mut features = FeatureMapping::new();
        features.insert(SYN_COMPLEXITY_KEY, depth as u64);
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{DependencyNode, DependencyParser, Toolkit, ROOT_RELATION};
    use std::sync::Arc;

    struct StaticParser(DependencyTree);

    impl DependencyParser for StaticParser {
        fn parse(&self, _text: &str) -> AnalysisResult<DependencyTree> {
            Ok(self.0.clone())
        }
    }

    fn node(relation: &str, head: Option<usize>, children: Vec<usize>) -> DependencyNode {
        DependencyNode {
            text: "w".to_string(),
            tag: "NN".to_string(),
            relation: relation.to_string(),
            head,
            children,
        }
    }

    fn depth_with(tree: DependencyTree, limit: usize) -> AnalysisResult<FeatureMapping> {
        let toolkit = Toolkit::builder()
            .parser(Arc::new(StaticParser(tree)))
            .max_tree_depth(limit)
            .build()
            .expect("toolkit");
        SyntacticDepthFeaturizer::new().featurize_text("ignored", &toolkit)
    }

    fn chain(len: usize) -> DependencyTree {
        DependencyTree::from_heads(
            (0..len)
                .map(|i| {
                    let relation = if i == 0 { ROOT_RELATION } else { "dep" };
                    ("w".to_string(), "NN".to_string(), relation.to_string(), i.checked_sub(1))
                })
                .collect(),
        )
    }

    #[test]
    fn pos_counts_always_has_nine_keys() {
        let toolkit = Toolkit::with_defaults().expect("toolkit");
        let features = PosCountFeaturizer::new()
            .featurize_text("Did the happiest dogs run?", &toolkit)
            .expect("featurize");
        assert_eq!(features.len(), 9);
        assert_eq!(features.get("VBD"), Some(&FeatureValue::Count(1)));
        assert_eq!(features.get("JJS"), Some(&FeatureValue::Count(1)));
        assert_eq!(features.get("VB"), Some(&FeatureValue::Count(1)));
        assert_eq!(features.get("JJR"), Some(&FeatureValue::Count(0)));
        assert!(!features.contains_key("NNS"));

        let empty = PosCountFeaturizer::new()
            .featurize_text("", &toolkit)
            .expect("featurize");
        assert_eq!(empty.len(), 9);
    }

    #[test]
    fn depth_of_parsed_question() {
        let toolkit = Toolkit::with_defaults().expect("toolkit");
        let features = SyntacticDepthFeaturizer::new()
            .featurize_text("What is the meaning of life?", &toolkit)
            .expect("featurize");
        assert_eq!(features.get(SYN_COMPLEXITY_KEY), Some(&FeatureValue::Count(4)));
    }

    #[test]
    fn lone_root_has_depth_one() {
        let features = depth_with(chain(1), 8).expect("featurize");
        assert_eq!(features.get(SYN_COMPLEXITY_KEY), Some(&FeatureValue::Count(1)));

        let features = depth_with(chain(5), 8).expect("featurize");
        assert_eq!(features.get(SYN_COMPLEXITY_KEY), Some(&FeatureValue::Count(5)));
    }

    #[test]
    fn missing_root_is_malformed() {
        let err = depth_with(DependencyTree::default(), 8).expect_err("no root");
        assert!(matches!(err, AnalysisError::MalformedInput { .. }));

        let toolkit = Toolkit::with_defaults().expect("toolkit");
        let err = SyntacticDepthFeaturizer::new()
            .featurize_text("", &toolkit)
            .expect_err("empty text");
        assert!(err.to_string().contains("no ROOT"));
    }

    #[test]
    fn cycles_are_malformed() {
        let tree = DependencyTree::new(vec![
            node(ROOT_RELATION, None, vec![1]),
            node("dep", Some(0), vec![2]),
            node("dep", Some(1), vec![1]),
        ]);
        let err = depth_with(tree, 8).expect_err("cycle");
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let err = depth_with(chain(4), 3).expect_err("too deep");
        assert!(err.to_string().contains("deeper than 3"));
        assert!(depth_with(chain(3), 3).is_ok());
    }
}
