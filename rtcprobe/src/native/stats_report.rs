use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statistics snapshot keyed by stats object id. The coordinator does not
/// interpret the entries.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RTCStatsReport {
    pub reports: HashMap<String, serde_json::Value>,
}

impl RTCStatsReport {
    pub fn get(&self, id: &str) -> Option<&serde_json::Value> {
        self.reports.get(id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
