pub mod conflict_service;
pub mod eligibility_service;
pub mod policy;
pub mod schedule_utils;
pub mod suggestion_service;
pub mod time_conflict_service;
