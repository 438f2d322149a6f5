use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::task::{self, JoinError};
use tracing::{debug, warn};

use crate::db::repositories::employee_repository::EmployeeRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::conflict::{ConflictDetectionResult, ConflictSeverity, RankedCandidate};
use crate::models::employee::{EmployeeRecord, StaffTitle};
use crate::models::shift::RoleCode;
use crate::services::eligibility_service::EligibilityService;
use crate::services::policy::DetectionPolicy;
use crate::services::suggestion_service::SuggestionService;
use crate::services::time_conflict_service::TimeConflictService;

/// Stand-in shift id used when ranking candidates for a shift that does not
/// exist yet; it can never match a stored shift, so nothing is excluded.
const PLACEHOLDER_SHIFT_ID: &str = "shift-placeholder";

/// One (employee, role) pair submitted to batch detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssignment {
    pub employee_id: String,
    pub role: RoleCode,
}

/// Composes the time and eligibility checkers with the suggestion generator.
///
/// Every entry point is advisory and fail-open: a data-access failure empties
/// the affected arm and marks the result degraded instead of surfacing an
/// error to the caller.
#[derive(Clone)]
pub struct ConflictService {
    db: DbPool,
    policy: DetectionPolicy,
    time_conflicts: Arc<TimeConflictService>,
    eligibility: Arc<EligibilityService>,
    suggestions: Arc<SuggestionService>,
}

impl ConflictService {
    pub fn new(db: DbPool) -> Self {
        Self::with_policy(db, DetectionPolicy::default())
    }

    pub fn with_policy(db: DbPool, policy: DetectionPolicy) -> Self {
        let time_conflicts = Arc::new(TimeConflictService::new(db.clone(), policy.clone()));
        let eligibility = Arc::new(EligibilityService::new(db.clone()));
        let suggestions = Arc::new(SuggestionService::new(db.clone(), policy.clone()));

        Self {
            db,
            policy,
            time_conflicts,
            eligibility,
            suggestions,
        }
    }

    /// Full conflict check for one proposed assignment. The time and skill
    /// lookups have disjoint data dependencies and run concurrently; the
    /// suggestion pass waits on both.
    pub async fn detect(
        &self,
        employee_id: &str,
        shift_id: &str,
        role: RoleCode,
        shift_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> ConflictDetectionResult {
        debug!(
            target: "app::conflict",
            employee_id,
            shift_id,
            role = role.as_str(),
            shift_date,
            "detecting conflicts"
        );

        let time_task = {
            let service = Arc::clone(&self.time_conflicts);
            let employee_id = employee_id.to_string();
            let shift_id = shift_id.to_string();
            let shift_date = shift_date.to_string();
            let start_time = start_time.to_string();
            let end_time = end_time.to_string();
            task::spawn_blocking(move || {
                service.check(&employee_id, &shift_id, &shift_date, &start_time, &end_time)
            })
        };
        let skill_task = {
            let service = Arc::clone(&self.eligibility);
            let employee_id = employee_id.to_string();
            task::spawn_blocking(move || service.check(&employee_id, role))
        };

        let (time_outcome, skill_outcome) = tokio::join!(time_task, skill_task);

        let mut degraded = false;
        let time_conflicts = collect_scan(time_outcome, "time", &mut degraded);
        let skill_conflicts = collect_scan(skill_outcome, "skill", &mut degraded);

        let suggestions = if time_conflicts.is_empty() && skill_conflicts.is_empty() {
            Vec::new()
        } else {
            let outcome = {
                let service = Arc::clone(&self.suggestions);
                let time_conflicts = time_conflicts.clone();
                let skill_conflicts = skill_conflicts.clone();
                let shift_id = shift_id.to_string();
                let shift_date = shift_date.to_string();
                let start_time = start_time.to_string();
                let end_time = end_time.to_string();
                task::spawn_blocking(move || {
                    service.generate(
                        &time_conflicts,
                        &skill_conflicts,
                        &shift_id,
                        role,
                        &shift_date,
                        &start_time,
                        &end_time,
                    )
                })
                .await
            };
            collect_scan(outcome, "suggestion", &mut degraded)
        };

        let has_conflicts = !time_conflicts.is_empty() || !skill_conflicts.is_empty();
        debug!(
            target: "app::conflict",
            employee_id,
            shift_id,
            has_conflicts,
            time = time_conflicts.len(),
            skill = skill_conflicts.len(),
            suggestions = suggestions.len(),
            degraded,
            "conflict detection complete"
        );

        ConflictDetectionResult {
            has_conflicts,
            time_conflicts,
            skill_conflicts,
            suggestions,
            degraded,
        }
    }

    /// Runs one detect per proposed assignment concurrently and keys the
    /// results by employee id. A duplicated employee id keeps the result of
    /// whichever call lands last.
    pub async fn detect_batch(
        &self,
        assignments: &[BatchAssignment],
        shift_id: &str,
        shift_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> HashMap<String, ConflictDetectionResult> {
        let checks = assignments.iter().map(|assignment| async move {
            let result = self
                .detect(
                    &assignment.employee_id,
                    shift_id,
                    assignment.role,
                    shift_date,
                    start_time,
                    end_time,
                )
                .await;
            (assignment.employee_id.clone(), result)
        });

        let results = join_all(checks).await;
        debug!(
            target: "app::conflict",
            shift_id,
            count = results.len(),
            "batch detection complete"
        );

        results.into_iter().collect()
    }

    /// Ranks every eligible employee for a proposed role/window, best first.
    /// The pool query orders by seniority then name, and the sort is stable,
    /// so equal scores keep that order.
    pub async fn rank_candidates(
        &self,
        role: RoleCode,
        shift_date: &str,
        start_time: &str,
        end_time: &str,
        exclude_employee_ids: &[String],
    ) -> Vec<RankedCandidate> {
        let pool = {
            let db = self.db.clone();
            let exclude = exclude_employee_ids.to_vec();
            let outcome = task::spawn_blocking(move || {
                db.with_connection(|conn| {
                    EmployeeRepository::eligible_for_role(conn, role, &exclude)
                })
            })
            .await;

            let mut degraded = false;
            let pool = collect_scan(outcome, "candidate pool", &mut degraded);
            if degraded {
                return Vec::new();
            }
            pool
        };

        let mut candidates = Vec::with_capacity(pool.len());
        for chunk in pool.chunks(self.policy.detect_concurrency.max(1)) {
            let scored = join_all(chunk.iter().map(|employee| async move {
                let result = self
                    .detect(
                        &employee.id,
                        PLACEHOLDER_SHIFT_ID,
                        role,
                        shift_date,
                        start_time,
                        end_time,
                    )
                    .await;
                score_candidate(employee, role, result)
            }))
            .await;
            candidates.extend(scored);
        }

        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(self.policy.ranking_limit);

        debug!(
            target: "app::conflict",
            role = role.as_str(),
            shift_date,
            count = candidates.len(),
            "candidate ranking complete"
        );

        candidates
    }
}

fn collect_scan<T>(
    outcome: Result<AppResult<Vec<T>>, JoinError>,
    scan: &str,
    degraded: &mut bool,
) -> Vec<T> {
    match outcome {
        Ok(Ok(items)) => items,
        Ok(Err(error)) => {
            warn!(target: "app::conflict", scan, %error, "scan failed, treating as empty");
            *degraded = true;
            Vec::new()
        }
        Err(error) => {
            warn!(target: "app::conflict", scan, %error, "scan task aborted, treating as empty");
            *degraded = true;
            Vec::new()
        }
    }
}

fn score_candidate(
    employee: &EmployeeRecord,
    role: RoleCode,
    result: ConflictDetectionResult,
) -> RankedCandidate {
    let high = result.severity_count(ConflictSeverity::High);
    let medium = result.severity_count(ConflictSeverity::Medium);

    let mut score = employee.performance_or_default();
    score -= 2.0 * high as f64;
    score -= medium as f64;
    if !result.skill_conflicts.is_empty() {
        score -= 3.0;
    }
    if role == RoleCode::CrewChief && employee.title == StaffTitle::CrewChief {
        score += 1.0;
    }
    let score = score.max(0.0);

    RankedCandidate {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        score,
        reason: describe_fit(&result),
        conflicts: result,
    }
}

fn describe_fit(result: &ConflictDetectionResult) -> String {
    if result.degraded {
        return "availability could not be fully determined".to_string();
    }
    if !result.has_conflicts {
        return "no conflicts in the requested window".to_string();
    }

    let mut parts = Vec::new();
    let high = result.severity_count(ConflictSeverity::High);
    let medium = result.severity_count(ConflictSeverity::Medium);
    let low = result.severity_count(ConflictSeverity::Low);
    if high > 0 {
        parts.push(format!("{high} overlapping shift(s)"));
    }
    if medium > 0 {
        parts.push(format!("{medium} tight turnaround(s)"));
    }
    if low > 0 {
        parts.push(format!("{low} short rest gap(s)"));
    }
    if !result.skill_conflicts.is_empty() {
        parts.push("missing certification".to_string());
    }
    parts.join(", ")
}
