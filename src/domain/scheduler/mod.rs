pub mod assignment;
pub mod contention;
pub mod export;
pub mod metrics;
pub mod placement;
pub mod report;
pub mod schedule;
pub mod scheduler_config;
pub mod scheduler_type;
pub mod validation;
