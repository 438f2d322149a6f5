use tracing::debug;

use crate::db::repositories::employee_repository::EmployeeRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::conflict::{
    ConflictSeverity, ConflictSuggestion, SkillConflict, SuggestionKind, TimeConflict,
};
use crate::models::shift::{
    format_shift_date, format_shift_time, parse_shift_date, parse_shift_time, RoleCode,
};
use crate::services::policy::DetectionPolicy;

/// Turns detected conflicts into ranked remediation options. Rules are
/// additive; with no conflicts in, nothing comes out.
#[derive(Clone)]
pub struct SuggestionService {
    db: DbPool,
    policy: DetectionPolicy,
}

impl SuggestionService {
    pub fn new(db: DbPool, policy: DetectionPolicy) -> Self {
        Self { db, policy }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        &self,
        time_conflicts: &[TimeConflict],
        skill_conflicts: &[SkillConflict],
        shift_id: &str,
        role: RoleCode,
        shift_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> AppResult<Vec<ConflictSuggestion>> {
        let date = parse_shift_date(shift_date)?;
        let start = parse_shift_time(start_time)?;
        let end = parse_shift_time(end_time)?;

        let mut suggestions = Vec::new();

        if !skill_conflicts.is_empty() {
            let alternatives = self.db.with_connection(|conn| {
                EmployeeRepository::available_for_role(
                    conn,
                    role,
                    &format_shift_date(date),
                    &format_shift_time(start),
                    &format_shift_time(end),
                    &[],
                    self.policy.alternative_limit,
                )
            })?;

            debug!(
                target: "app::conflict",
                shift_id,
                role = role.as_str(),
                count = alternatives.len(),
                "alternative employees found"
            );

            for employee in alternatives {
                suggestions.push(ConflictSuggestion {
                    kind: SuggestionKind::AlternativeEmployee,
                    description: format!(
                        "{} is certified for {} and free {}-{} on {}",
                        employee.name,
                        role.label(),
                        format_shift_time(start),
                        format_shift_time(end),
                        format_shift_date(date),
                    ),
                    employee_id: Some(employee.id),
                    employee_name: Some(employee.name),
                    suggested_role: Some(role),
                    suggested_start_time: None,
                    suggested_end_time: None,
                    priority: ConflictSeverity::High,
                });
            }
        }

        if time_conflicts
            .iter()
            .any(|conflict| conflict.severity == ConflictSeverity::High)
        {
            suggestions.push(ConflictSuggestion {
                kind: SuggestionKind::TimeAdjustment,
                description: "Adjust the start or end time to clear the overlapping shift"
                    .to_string(),
                employee_id: None,
                employee_name: None,
                suggested_role: None,
                suggested_start_time: Some(start),
                suggested_end_time: Some(end),
                priority: ConflictSeverity::High,
            });
        }

        if time_conflicts
            .iter()
            .any(|conflict| conflict.severity == ConflictSeverity::Medium)
        {
            suggestions.push(ConflictSuggestion {
                kind: SuggestionKind::TimeAdjustment,
                description: "Add buffer time between back-to-back shifts".to_string(),
                employee_id: None,
                employee_name: None,
                suggested_role: None,
                suggested_start_time: Some(start),
                suggested_end_time: Some(end),
                priority: ConflictSeverity::Medium,
            });
        }

        for conflict in skill_conflicts {
            if !matches!(
                conflict.role,
                RoleCode::CrewChief | RoleCode::ForkOperator | RoleCode::ReachForkOperator
            ) {
                continue;
            }

            suggestions.push(ConflictSuggestion {
                kind: SuggestionKind::RoleChange,
                description: format!(
                    "Reassign {} from {} to {}",
                    conflict.employee_name,
                    conflict.role.label(),
                    RoleCode::StageHand.label(),
                ),
                employee_id: Some(conflict.employee_id.clone()),
                employee_name: Some(conflict.employee_name.clone()),
                suggested_role: Some(RoleCode::StageHand),
                suggested_start_time: None,
                suggested_end_time: None,
                priority: ConflictSeverity::Medium,
            });
        }

        Ok(suggestions)
    }
}
