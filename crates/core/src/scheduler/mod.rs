//! Scheduler module - universe refresh, pre-warm and live sweep jobs.

mod scheduler_model;
mod scheduler_service;

pub use scheduler_model::{SchedulerConfig, SchedulerJob};
pub use scheduler_service::Scheduler;
