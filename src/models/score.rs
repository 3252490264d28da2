//! Trust scores and score history.
//!
//! Scores are computed by the server and always fetched fresh.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current reliability metric for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    pub entity_id: String,
    #[serde(default)]
    pub entity_name: Option<String>,
    /// `None` until the entity has enough promises to be rated.
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub rated: bool,
    #[serde(default)]
    pub total_promises: u64,
    #[serde(default)]
    pub fulfilled_count: u64,
    #[serde(default)]
    pub broken_count: u64,
    #[serde(default)]
    pub avg_delay_hours: f64,
    #[serde(default)]
    pub category_scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub streak: i64,
    #[serde(default = "default_version")]
    pub score_version: String,
    #[serde(default)]
    pub last_updated: Option<String>,
}

fn default_level() -> String {
    "Unrated".to_string()
}

fn default_version() -> String {
    "v1".to_string()
}

/// One historical snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

/// Score history for one entity, in the order the server returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    pub entity_id: String,
    #[serde(default)]
    pub history: Vec<ScoreSnapshot>,
}

impl ScoreHistory {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Oldest-first view, assuming the server returns newest-first.
    ///
    /// The server ordering is an external contract; `history` itself is
    /// never reordered.
    pub fn chronological(&self) -> impl Iterator<Item = &ScoreSnapshot> {
        self.history.iter().rev()
    }
}
