use std::fmt::Write;

use crate::domain::scheduler::metrics::ScheduleMetrics;
use crate::domain::scheduler::schedule::Schedule;
use crate::domain::topology::topology::Topology;

const BLOCK_SEPARATOR: &str = "--------------------------------\n";

/// Per node listing of a finished run: the tasks with their `[start, end)` interval and, per
/// physical link, the transmissions sent (`to`) or received (`from`).
///
/// Reads the node state of `topology`, so it must be called before the next run resets it.
pub fn schedule_report(schedule: &Schedule, topology: &Topology) -> String {
    let mut report = format!("Schedule ({}), total time = {}\n", schedule.algorithm, schedule.total_time);
    report.push_str(BLOCK_SEPARATOR);

    for node in topology.nodes() {
        let _ = writeln!(report, "Node {} (priority {}):", node.id, node.priority());
        for entry in &node.scheduled {
            let _ = writeln!(report, "  G{} [{}, {})", entry.task, entry.start, entry.end);
        }

        for link in &node.links {
            for transmission in &link.transmissions {
                let (direction, other) = if transmission.source_node == node.id && transmission.source_link == link.number {
                    ("to", transmission.dest_node)
                } else {
                    ("from", transmission.source_node)
                };
                let _ = writeln!(
                    report,
                    "  Link {}: G{} -> G{} {} node {} [{}, {})",
                    link.number, transmission.source_task, transmission.dest_task, direction, other, transmission.start, transmission.end
                );
            }
        }
        report.push_str(BLOCK_SEPARATOR);
    }
    report
}

/// Table of [`crate::domain::scheduler::metrics::compare_algorithms`] results.
pub fn comparison_report(results: &[ScheduleMetrics]) -> String {
    let mut report = format!("{:<30} {:>6} {:>8} {:>8} {:>8}\n", "Algorithm", "Tn", "Kp", "Ke", "Kea");
    for metrics in results {
        let _ = writeln!(
            report,
            "{:<30} {:>6} {:>8.3} {:>8.3} {:>8.3}",
            metrics.algorithm.label(),
            metrics.total_time,
            metrics.speedup,
            metrics.efficiency,
            metrics.critical_efficiency
        );
    }
    report
}
