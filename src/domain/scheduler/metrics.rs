use crate::domain::scheduler::assignment::Scheduler;
use crate::domain::scheduler::schedule::Schedule;
use crate::domain::scheduler::scheduler_config::SchedulerConfig;
use crate::domain::scheduler::scheduler_type::Algorithm;
use crate::domain::task_graph::graph::TaskGraph;
use crate::domain::topology::topology::Topology;
use crate::error::Result;

/// Quality ratios of a schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleMetrics {
    pub algorithm: Algorithm,

    /// `Tn`: total schedule time.
    pub total_time: u64,

    /// `T1`: sum of all execution costs.
    pub single_processor_time: u64,

    /// `Tcp`: graph-wide critical path time.
    pub critical_time: u64,

    /// `T1 / Tn`
    pub speedup: f64,

    /// `speedup / node count`
    pub efficiency: f64,

    /// `Tcp / Tn`
    pub critical_efficiency: f64,
}

impl ScheduleMetrics {
    pub fn compute(schedule: &Schedule, graph: &TaskGraph, topology: &Topology) -> Self {
        let total_time = schedule.total_time;
        let single_processor_time = graph.single_processor_time();
        let critical_time = graph.critical_time();

        let ratio = |value: u64| if total_time == 0 { 0.0 } else { value as f64 / total_time as f64 };
        let speedup = ratio(single_processor_time);
        let efficiency = if topology.is_empty() { 0.0 } else { speedup / topology.len() as f64 };

        Self {
            algorithm: schedule.algorithm,
            total_time,
            single_processor_time,
            critical_time,
            speedup,
            efficiency,
            critical_efficiency: ratio(critical_time),
        }
    }
}

/// Schedules the same inputs with every placement and queue combination.
///
/// Every run uses `config` apart from the algorithm, including its seed, so the random runs are
/// reproducible when a seed is set.
pub fn compare_algorithms(graph: &mut TaskGraph, topology: &mut Topology, config: &SchedulerConfig) -> Result<Vec<ScheduleMetrics>> {
    let mut results = Vec::new();

    for algorithm in Algorithm::all() {
        let mut scheduler = Scheduler::new(config.with_algorithm(algorithm));
        let schedule = scheduler.schedule(graph, topology)?;
        let metrics = ScheduleMetrics::compute(&schedule, graph, topology);

        log::info!(
            "{:<30} Tn = {:>5}  Kp = {:.3}  Ke = {:.3}  Kea = {:.3}",
            algorithm.label(),
            metrics.total_time,
            metrics.speedup,
            metrics.efficiency,
            metrics.critical_efficiency
        );
        results.push(metrics);
    }
    Ok(results)
}
