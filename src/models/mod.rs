pub mod conflict;
pub mod employee;
pub mod shift;
