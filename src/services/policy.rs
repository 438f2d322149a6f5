use serde::{Deserialize, Serialize};

/// Tunable thresholds for the conflict scans and ranking entry points.
/// Defaults match the production rules; injecting a custom policy never
/// changes scan semantics, only the numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionPolicy {
    /// Gap at or under this many minutes counts as back-to-back.
    pub back_to_back_window_mins: i64,
    /// Overnight rest shorter than this many hours is flagged.
    pub min_rest_hours: i64,
    /// Alternative employees returned per suggestion pass.
    pub alternative_limit: usize,
    /// Candidates returned from the optimal-employee ranking.
    pub ranking_limit: usize,
    /// Concurrent per-candidate detect calls during ranking.
    pub detect_concurrency: usize,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            back_to_back_window_mins: 60,
            min_rest_hours: 8,
            alternative_limit: 5,
            ranking_limit: 10,
            detect_concurrency: 4,
        }
    }
}
