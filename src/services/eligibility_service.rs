use tracing::debug;

use crate::db::repositories::employee_repository::EmployeeRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::conflict::SkillConflict;
use crate::models::employee::{EmployeeRecord, StaffTitle};
use crate::models::shift::RoleCode;

/// Checks whether an employee holds the certifications a role demands.
/// The rule table is fixed at compile time; only CC and the fork-operator
/// roles gate on anything.
#[derive(Clone)]
pub struct EligibilityService {
    db: DbPool,
}

impl EligibilityService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Returns zero or one conflict; an unknown employee id yields none so an
    /// advisory check never blocks on stale references.
    pub fn check(&self, employee_id: &str, role: RoleCode) -> AppResult<Vec<SkillConflict>> {
        let employee = self
            .db
            .with_connection(|conn| EmployeeRepository::find_by_id(conn, employee_id))?;

        let Some(employee) = employee else {
            debug!(employee_id, "employee not found, skipping skill check");
            return Ok(Vec::new());
        };

        let Some(certification) = Self::missing_certification(&employee, role) else {
            return Ok(Vec::new());
        };

        debug!(
            employee_id,
            role = role.as_str(),
            certification,
            "missing certification"
        );

        Ok(vec![SkillConflict {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            role,
            missing_certifications: vec![certification.to_string()],
            reason: format!(
                "{} is not certified to work as {}",
                employee.name,
                role.label()
            ),
        }])
    }

    pub fn missing_certification(
        employee: &EmployeeRecord,
        role: RoleCode,
    ) -> Option<&'static str> {
        match role {
            RoleCode::CrewChief => {
                let qualified = employee.crew_chief_eligible
                    || matches!(
                        employee.title,
                        StaffTitle::CrewChief | StaffTitle::ManagerAdmin
                    );
                (!qualified).then_some("Crew Chief Certification")
            }
            RoleCode::ForkOperator | RoleCode::ReachForkOperator => {
                let qualified =
                    employee.fork_operator_eligible || employee.title == StaffTitle::ManagerAdmin;
                (!qualified).then_some("Fork Operator Certification")
            }
            RoleCode::StageHand | RoleCode::Rigger | RoleCode::GeneralLabor => None,
        }
    }
}
