//! Gateway result types

use jobboard_common::ScoredJob;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of search hits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Hits for the requested page, newest postings first
    pub hits: Vec<ScoredJob>,

    /// Size of the full matching set, independent of pagination
    pub total: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Value>,
}

/// Summary of the engine's cluster health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterHealth {
    /// green / yellow / red
    pub status: String,
    pub number_of_nodes: u32,
    pub active_shards: u32,
    pub relocating_shards: u32,
    pub initializing_shards: u32,
    pub unassigned_shards: u32,
}
