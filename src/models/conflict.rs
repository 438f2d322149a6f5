use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::shift::RoleCode;

/// Ordinal importance used both for detected conflicts and for suggestion
/// prioritization. Detection is never suppressed by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeConflictKind {
    Overlap,
    BackToBack,
    RestPeriod,
}

/// One detected scheduling collision against an existing assignment.
/// Built fresh on every check call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeConflict {
    pub conflicting_shift_id: String,
    pub kind: TimeConflictKind,
    pub severity: ConflictSeverity,
    pub description: String,
}

/// A missing-certification mismatch for a candidate role assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillConflict {
    pub employee_id: String,
    pub employee_name: String,
    pub role: RoleCode,
    pub missing_certifications: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    AlternativeEmployee,
    TimeAdjustment,
    RoleChange,
    SkillTraining,
}

/// One remediation option for a conflicted assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSuggestion {
    pub kind: SuggestionKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_role: Option<RoleCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_end_time: Option<NaiveTime>,
    pub priority: ConflictSeverity,
}

/// Aggregated outcome of one conflict check.
///
/// `degraded` distinguishes "genuinely no conflicts" from "a lookup failed and
/// its arm was emptied"; the advisory contract still never surfaces an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetectionResult {
    pub has_conflicts: bool,
    pub time_conflicts: Vec<TimeConflict>,
    pub skill_conflicts: Vec<SkillConflict>,
    pub suggestions: Vec<ConflictSuggestion>,
    #[serde(default)]
    pub degraded: bool,
}

impl ConflictDetectionResult {
    pub fn empty() -> Self {
        Self {
            has_conflicts: false,
            time_conflicts: Vec::new(),
            skill_conflicts: Vec::new(),
            suggestions: Vec::new(),
            degraded: false,
        }
    }

    pub fn severity_count(&self, severity: ConflictSeverity) -> usize {
        self.time_conflicts
            .iter()
            .filter(|conflict| conflict.severity == severity)
            .count()
    }
}

/// One scored candidate from the optimal-employee ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub employee_id: String,
    pub employee_name: String,
    pub score: f64,
    pub conflicts: ConflictDetectionResult,
    pub reason: String,
}
