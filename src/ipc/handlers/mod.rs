pub mod assignments;
pub mod attendance;
pub mod core;
pub mod dashboard;
pub mod leave;
pub mod schedule;
pub mod students;
