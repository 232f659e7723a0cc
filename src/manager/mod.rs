pub mod job_control;
pub mod job_registry;
