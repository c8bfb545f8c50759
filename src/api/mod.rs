pub mod attendance;
pub mod catalog;
pub mod earnings;
pub mod expenses;
pub mod incoming_jobs;
pub mod jobs;
pub mod operations;
pub mod payroll;
pub mod revenue;
pub mod tasks;
pub mod users;
