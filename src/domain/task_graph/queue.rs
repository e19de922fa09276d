use std::fmt::Write;

use crate::domain::scheduler::scheduler_type::QueuePolicy;
use crate::domain::task_graph::graph::{TaskGraph, TaskKey};
use crate::domain::utils::id::TaskId;

const BLOCK_SEPARATOR: &str = "--------------------------------\n";
const QUEUE_SEPARATOR: &str = " | ";

fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole }
}

impl TaskGraph {
    /// Orders all tasks for assignment.
    ///
    /// The queue is a permutation of every task, not only of the ready ones; readiness is checked
    /// when the queue is consumed. Ties keep ascending task id order.
    /// Updates the derived `critical_path` and `priority` fields of the tasks.
    pub fn generate_queue(&mut self, policy: QueuePolicy) -> Vec<TaskId> {
        let mut queue: Vec<TaskKey> = self.keys();

        match policy {
            QueuePolicy::CriticalPath => {
                let graph_max = self.compute_critical_paths();
                for key in &queue {
                    let task = self.get_mut(*key);
                    task.priority = ratio(task.critical_path.time as f64, graph_max.time as f64)
                        + ratio(task.critical_path.task_count as f64, graph_max.task_count as f64);
                }
                queue.sort_by(|a, b| self.get(*b).priority.total_cmp(&self.get(*a).priority));
            }
            QueuePolicy::OutDegree => {
                queue.sort_by_key(|key| std::cmp::Reverse(self.get(*key).out_degree()));
            }
            QueuePolicy::ReverseCriticalPath => {
                self.compute_reverse_critical_paths();
                queue.sort_by_key(|key| self.get(*key).critical_path.time);
            }
        }

        let queue: Vec<TaskId> = queue.iter().map(|key| self.get(*key).id).collect();
        log::debug!("Generated {} queue: {:?}", policy, queue.iter().map(|id| id.value).collect::<Vec<_>>());
        queue
    }

    /// Text report of a queue produced by [`TaskGraph::generate_queue`] with the same policy.
    ///
    /// For the critical path policy the graph-wide values `T` / `N` and the per task values are
    /// listed before the ordering line.
    pub fn queue_report(&self, queue: &[TaskId], policy: QueuePolicy) -> String {
        let mut report = format!("Queue ({})\n", policy);
        report.push_str(BLOCK_SEPARATOR);

        let tasks: Vec<_> = queue.iter().filter_map(|id| self.task(*id)).collect();

        if policy == QueuePolicy::CriticalPath {
            let graph_max = self.graph_critical_path();
            let _ = writeln!(report, "T = {}", graph_max.time);
            let _ = writeln!(report, "N = {}", graph_max.task_count);
            report.push_str(BLOCK_SEPARATOR);
            for task in &tasks {
                let _ = writeln!(report, "T{} = {}", task.id, task.critical_path.time);
                let _ = writeln!(report, "N{} = {}", task.id, task.critical_path.task_count);
                report.push_str(BLOCK_SEPARATOR);
            }
        }

        let entries: Vec<String> = tasks
            .iter()
            .map(|task| match policy {
                QueuePolicy::CriticalPath => format!("G{}({:.3})", task.id, task.priority),
                QueuePolicy::OutDegree => format!("G{}({})", task.id, task.out_degree()),
                QueuePolicy::ReverseCriticalPath => format!("G{}({})", task.id, task.critical_path.time),
            })
            .collect();
        report.push_str(&entries.join(QUEUE_SEPARATOR));
        report
    }
}
