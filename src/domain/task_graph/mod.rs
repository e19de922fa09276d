pub mod critical_path;
pub mod cycles;
pub mod dependency;
pub mod graph;
pub mod queue;
pub mod task;
