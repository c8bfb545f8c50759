pub mod attendance;
pub mod catalog;
pub mod daily_task;
pub mod expense;
pub mod incoming_job;
pub mod job;
pub mod job_item;
pub mod operation;
pub mod outgoing_job;
pub mod payroll;
pub mod role;
pub mod user;
