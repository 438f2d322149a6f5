use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_shift_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| {
        AppError::validation_with_details(
            "invalid shift date",
            json!({"value": value, "error": err.to_string()}),
        )
    })
}

pub fn parse_shift_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|err| {
            AppError::validation_with_details(
                "invalid shift time",
                json!({"value": value, "error": err.to_string()}),
            )
        })
}

pub fn format_shift_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_shift_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Worker function on a shift, stored as its short code ("CC", "SH", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCode {
    #[serde(rename = "CC")]
    CrewChief,
    #[serde(rename = "SH")]
    StageHand,
    #[serde(rename = "FO")]
    ForkOperator,
    #[serde(rename = "RFO")]
    ReachForkOperator,
    #[serde(rename = "RG")]
    Rigger,
    #[serde(rename = "GL")]
    GeneralLabor,
}

impl RoleCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            RoleCode::CrewChief => "CC",
            RoleCode::StageHand => "SH",
            RoleCode::ForkOperator => "FO",
            RoleCode::ReachForkOperator => "RFO",
            RoleCode::Rigger => "RG",
            RoleCode::GeneralLabor => "GL",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RoleCode::CrewChief => "Crew Chief",
            RoleCode::StageHand => "Stage Hand",
            RoleCode::ForkOperator => "Fork Operator",
            RoleCode::ReachForkOperator => "Reach/Rough Fork Operator",
            RoleCode::Rigger => "Rigger",
            RoleCode::GeneralLabor => "General Labor",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "CC" => Ok(RoleCode::CrewChief),
            "SH" => Ok(RoleCode::StageHand),
            "FO" => Ok(RoleCode::ForkOperator),
            "RFO" => Ok(RoleCode::ReachForkOperator),
            "RG" => Ok(RoleCode::Rigger),
            "GL" => Ok(RoleCode::GeneralLabor),
            other => Err(AppError::validation(format!("unknown role code: {other}"))),
        }
    }
}

/// Shift lifecycle status. Cancelled shifts never participate in conflict scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftStatus {
    #[serde(rename = "Upcoming")]
    Upcoming,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl ShiftStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ShiftStatus::Upcoming => "Upcoming",
            ShiftStatus::InProgress => "In Progress",
            ShiftStatus::Completed => "Completed",
            ShiftStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "Upcoming" => Ok(ShiftStatus::Upcoming),
            "In Progress" => Ok(ShiftStatus::InProgress),
            "Completed" => Ok(ShiftStatus::Completed),
            "Cancelled" => Ok(ShiftStatus::Cancelled),
            other => Err(AppError::validation(format!("unknown shift status: {other}"))),
        }
    }
}

/// Assignment status is carried for display elsewhere; conflict math ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[serde(rename = "Assigned")]
    Assigned,
    #[serde(rename = "Clocked In")]
    ClockedIn,
    #[serde(rename = "Clocked Out")]
    ClockedOut,
    #[serde(rename = "No Show")]
    NoShow,
}

impl AssignmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "Assigned",
            AssignmentStatus::ClockedIn => "Clocked In",
            AssignmentStatus::ClockedOut => "Clocked Out",
            AssignmentStatus::NoShow => "No Show",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "Assigned" => Ok(AssignmentStatus::Assigned),
            "Clocked In" => Ok(AssignmentStatus::ClockedIn),
            "Clocked Out" => Ok(AssignmentStatus::ClockedOut),
            "No Show" => Ok(AssignmentStatus::NoShow),
            other => Err(AppError::validation(format!(
                "unknown assignment status: {other}"
            ))),
        }
    }
}

/// A scheduled work interval, enriched with job/client names for descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRecord {
    pub id: String,
    pub job_id: String,
    pub job_name: String,
    pub client_name: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ShiftStatus,
    pub created_at: String,
}

/// One employee bound to one shift in one role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub id: String,
    pub shift_id: String,
    pub employee_id: String,
    pub role_code: RoleCode,
    pub status: AssignmentStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftCreateInput {
    pub job_id: String,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentCreateInput {
    pub shift_id: String,
    pub employee_id: String,
    pub role_code: String,
    #[serde(default)]
    pub status: Option<String>,
}
