use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Performance rating assumed when an employee has never been rated.
pub const DEFAULT_PERFORMANCE: f64 = 3.0;

/// Coarse job title, ordered by seniority for candidate ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffTitle {
    #[serde(rename = "Employee")]
    Employee,
    #[serde(rename = "Crew Chief")]
    CrewChief,
    #[serde(rename = "Manager-Admin")]
    ManagerAdmin,
}

impl StaffTitle {
    pub const fn as_str(self) -> &'static str {
        match self {
            StaffTitle::Employee => "Employee",
            StaffTitle::CrewChief => "Crew Chief",
            StaffTitle::ManagerAdmin => "Manager-Admin",
        }
    }

    /// Lower rank sorts first: Manager-Admin, then Crew Chief, then the rest.
    pub const fn seniority_rank(self) -> i64 {
        match self {
            StaffTitle::ManagerAdmin => 0,
            StaffTitle::CrewChief => 1,
            StaffTitle::Employee => 2,
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "Employee" => Ok(StaffTitle::Employee),
            "Crew Chief" => Ok(StaffTitle::CrewChief),
            "Manager-Admin" => Ok(StaffTitle::ManagerAdmin),
            other => Err(AppError::validation(format!("unknown staff title: {other}"))),
        }
    }
}

/// Scheduling-relevant view of a worker. The engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub title: StaffTitle,
    pub crew_chief_eligible: bool,
    pub fork_operator_eligible: bool,
    pub performance: Option<f64>,
    pub created_at: String,
}

impl EmployeeRecord {
    /// Rating used in candidate scoring, clamped to the 0–5 scale.
    pub fn performance_or_default(&self) -> f64 {
        self.performance.unwrap_or(DEFAULT_PERFORMANCE).clamp(0.0, 5.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreateInput {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub crew_chief_eligible: bool,
    #[serde(default)]
    pub fork_operator_eligible: bool,
    #[serde(default)]
    pub performance: Option<f64>,
}
