pub mod schedule;
pub mod scheduler;
pub mod task_graph;
pub mod topology;
pub mod utils;
