//! Feature values and feature mappings.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::merge::{Collision, CollisionPolicy, MergeReport};

/// A single numeric feature value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Integer occurrence count.
    Count(u64),
    /// Real-valued score.
    Score(f64),
    /// 0/1 indicator.
    Flag(bool),
}

impl FeatureValue {
    /// Numeric value of this feature.
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Count(n) => n as f64,
            FeatureValue::Score(s) => s,
            FeatureValue::Flag(true) => 1.0,
            FeatureValue::Flag(false) => 0.0,
        }
    }

    /// Count value, if this is a count.
    pub fn as_count(&self) -> Option<u64> {
        match *self {
            FeatureValue::Count(n) => Some(n),
            _ => None,
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            FeatureValue::Count(n) => serializer.serialize_u64(n),
            FeatureValue::Score(s) => serializer.serialize_f64(s),
            FeatureValue::Flag(b) => serializer.serialize_u8(u8::from(b)),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Count(n) => write!(f, "{}", n),
            FeatureValue::Score(s) => write!(f, "{}", s),
            FeatureValue::Flag(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

impl From<u64> for FeatureValue {
    fn from(n: u64) -> Self {
        FeatureValue::Count(n)
    }
}

impl From<f64> for FeatureValue {
    fn from(s: f64) -> Self {
        FeatureValue::Score(s)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Flag(b)
    }
}

/// Mapping from feature name to value produced for one text.
///
/// Keys are kept sorted so that serialized vectors are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMapping {
    features: BTreeMap<String, FeatureValue>,
}

impl FeatureMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FeatureValue>,
    ) -> Option<FeatureValue> {
        self.features.insert(key.into(), value.into())
    }

    /// Increment a count feature, creating it at 1 if absent.
    ///
    /// A non-count value under the same key is replaced by a count of 1.
    pub fn increment(&mut self, key: impl Into<String>) {
        let entry = self
            .features
            .entry(key.into())
            .or_insert(FeatureValue::Count(0));
        *entry = match *entry {
            FeatureValue::Count(n) => FeatureValue::Count(n + 1),
            _ => FeatureValue::Count(1),
        };
    }

    /// Look up a feature value.
    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.features.get(key)
    }

    /// Whether the mapping has a value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consume the mapping into its underlying map.
    pub fn into_inner(self) -> BTreeMap<String, FeatureValue> {
        self.features
    }

    /// Merge `other` into `self` under `policy`.
    ///
    /// `owners` records which featurizer produced each key currently in
    /// `self`; it is updated for every key written. `source` names the
    /// featurizer that produced `other`. Every collision is recorded in the
    /// returned report, whichever value wins.
    pub fn merge(
        &mut self,
        other: FeatureMapping,
        source: &str,
        owners: &mut BTreeMap<String, String>,
        policy: CollisionPolicy,
    ) -> Result<MergeReport> {
        let mut report = MergeReport::default();

        // Resolve every collision before writing so a rejected merge leaves
        // `self` and `owners` untouched.
        for (key, incoming) in other.features.iter() {
            if let Some(previous) = self.features.get(key) {
                let collision = Collision {
                    key: key.clone(),
                    previous: *previous,
                    previous_source: owners
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    incoming: *incoming,
                    incoming_source: source.to_string(),
                };
                policy.resolve(&collision)?;
                report.collisions.push(collision);
            }
        }

        for (key, incoming) in other.features {
            match self.features.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    owners.insert(slot.key().clone(), source.to_string());
                    slot.insert(incoming);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    if policy.overwrites() {
                        owners.insert(slot.key().clone(), source.to_string());
                        slot.insert(incoming);
                    }
                }
            }
        }

        Ok(report)
    }
}

impl FromIterator<(String, FeatureValue)> for FeatureMapping {
    fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureMapping {
    type Item = (String, FeatureValue);
    type IntoIter = btree_map::IntoIter<String, FeatureValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
