//! Feature names and configuration defaults.

/// Key emitted by the length featurizer.
pub const SENT_LENGTH_KEY: &str = "sent_length";

/// Key emitted by the readability featurizer.
pub const FK_GRADE_KEY: &str = "fk_grade";

/// Key emitted by the syntactic depth featurizer.
pub const SYN_COMPLEXITY_KEY: &str = "syn_complexity";

/// Prefix for per-sentence sentiment keys in namespaced mode.
pub const SENTENCE_SENTIMENT_PREFIX: &str = "sentiment_sentence_";

/// Featurizers enabled when no configuration is supplied.
pub const DEFAULT_FEATURIZERS: [&str; 3] = ["bow_binary", "length", "readability"];

/// Maximum dependency tree depth walked before the tree is treated as malformed.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 256;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "TEXTFEAT_CONFIG";
