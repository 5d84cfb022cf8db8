//! Collision policy for merging feature mappings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::FeatureValue;

/// What happens when two featurizers emit the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later featurizer's value replaces the earlier one.
    #[default]
    LastWriteWins,
    /// The earlier featurizer's value is kept.
    FirstWriteWins,
    /// Any collision fails the merge.
    Error,
}

impl CollisionPolicy {
    /// Whether an incoming value replaces the existing one.
    pub fn overwrites(&self) -> bool {
        matches!(self, CollisionPolicy::LastWriteWins)
    }

    pub(crate) fn resolve(&self, collision: &Collision) -> Result<()> {
        match self {
            CollisionPolicy::Error => Err(Error::Collision {
                key: collision.key.clone(),
                kept: collision.previous_source.clone(),
                incoming: collision.incoming_source.clone(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::LastWriteWins => write!(f, "last_write_wins"),
            CollisionPolicy::FirstWriteWins => write!(f, "first_write_wins"),
            CollisionPolicy::Error => write!(f, "error"),
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_write_wins" | "last" => Ok(CollisionPolicy::LastWriteWins),
            "first_write_wins" | "first" => Ok(CollisionPolicy::FirstWriteWins),
            "error" => Ok(CollisionPolicy::Error),
            other => Err(Error::config(format!("unknown collision policy '{}'", other))),
        }
    }
}

/// One key written by two featurizers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collision {
    /// Feature name.
    pub key: String,
    /// Value present before the merge.
    pub previous: FeatureValue,
    /// Featurizer that produced `previous`.
    pub previous_source: String,
    /// Value offered by the merge.
    pub incoming: FeatureValue,
    /// Featurizer that produced `incoming`.
    pub incoming_source: String,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}) vs {} ({})",
            self.key, self.previous, self.previous_source, self.incoming, self.incoming_source
        )
    }
}

/// Collisions observed while merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    /// Collisions in the order they were encountered.
    pub collisions: Vec<Collision>,
}

impl MergeReport {
    /// True when no key was written twice.
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty()
    }

    /// Append another report's collisions.
    pub fn extend(&mut self, other: MergeReport) {
        self.collisions.extend(other.collisions);
    }
}
