use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::domain::task_graph::graph::{TaskGraph, TaskKey};
use crate::domain::utils::id::TaskId;

/// Result of [`TaskGraph::detect_cycles`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub has_cycles: bool,

    /// Every elementary cycle in forward (successor) order, beginning at its smallest task id.
    /// Cycles are listed in discovery order.
    pub cycles: Vec<Vec<TaskId>>,
}

impl CycleReport {
    /// Human readable enumeration, one `Cycle #k: id id id` line per cycle.
    pub fn describe(&self) -> String {
        let mut info = String::new();
        for (number, cycle) in self.cycles.iter().enumerate() {
            let _ = write!(info, "Cycle #{}:", number + 1);
            for id in cycle {
                let _ = write!(info, " {}", id);
            }
            info.push('\n');
        }
        info
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the current walk path.
    Gray,
    /// Fully explored.
    Black,
}

struct CycleCollector {
    cycles: Vec<Vec<TaskId>>,
    seen: HashSet<Vec<TaskId>>,
}

impl CycleCollector {
    fn record(&mut self, cycle: Vec<TaskId>) {
        if self.seen.insert(canonical(&cycle)) {
            self.cycles.push(cycle);
        }
    }
}

/// Rotation of a cycle that starts at its smallest id, used for deduplication only.
fn canonical(cycle: &[TaskId]) -> Vec<TaskId> {
    let Some(min_pos) = cycle.iter().enumerate().min_by_key(|(_, id)| **id).map(|(pos, _)| pos) else {
        return Vec::new();
    };
    let mut rotated = cycle.to_vec();
    rotated.rotate_left(min_pos);
    rotated
}

impl TaskGraph {
    /// Enumerates every elementary precedence cycle.
    ///
    /// Tasks are taken as roots in ascending id order; from each root a path walk follows the
    /// successors through tasks with a larger id only, so each cycle is reported once, starting at
    /// its smallest id. A task is excluded from a walk only while it is on the current path.
    ///
    /// The number of cycles can grow exponentially with the graph size. Use
    /// [`TaskGraph::has_cycles`] when only the answer is needed.
    pub fn detect_cycles(&self) -> CycleReport {
        let keys = self.keys();
        let mut collector = CycleCollector { cycles: Vec::new(), seen: HashSet::new() };

        for (rank, root) in keys.iter().enumerate() {
            let allowed: HashSet<TaskKey> = keys[rank..].iter().copied().collect();
            self.cycles_through(*root, &allowed, &mut collector);
        }

        let has_cycles = !collector.cycles.is_empty();
        if has_cycles {
            log::debug!("CyclicTaskGraph: {} cycle(s) detected.", collector.cycles.len());
        }

        CycleReport { has_cycles, cycles: collector.cycles }
    }

    /// Three-color depth first search over all tasks; stops at the first edge that closes a loop.
    pub fn has_cycles(&self) -> bool {
        let mut colors: HashMap<TaskKey, Color> = HashMap::new();
        self.keys().into_iter().any(|key| self.closes_loop(key, &mut colors))
    }

    fn closes_loop(&self, start: TaskKey, colors: &mut HashMap<TaskKey, Color>) -> bool {
        if colors.contains_key(&start) {
            return false;
        }

        // (task, index of the next successor to visit)
        let mut stack: Vec<(TaskKey, usize)> = vec![(start, 0)];
        colors.insert(start, Color::Gray);

        while let Some(top) = stack.last_mut() {
            let current = top.0;
            let Some(next) = self.get(current).successors.get(top.1).copied() else {
                colors.insert(current, Color::Black);
                stack.pop();
                continue;
            };
            top.1 += 1;

            match colors.get(&next) {
                None => {
                    colors.insert(next, Color::Gray);
                    stack.push((next, 0));
                }
                Some(Color::Gray) => return true,
                Some(Color::Black) => {}
            }
        }
        false
    }

    /// Records every cycle through `root` whose remaining tasks lie in `allowed`.
    fn cycles_through(&self, root: TaskKey, allowed: &HashSet<TaskKey>, collector: &mut CycleCollector) {
        // The current path and, per path position, the index of the next successor to try.
        let mut path: Vec<TaskKey> = vec![root];
        let mut cursor: Vec<usize> = vec![0];
        let mut on_path: HashSet<TaskKey> = HashSet::from([root]);

        while let Some(position) = cursor.last_mut() {
            let Some(current) = path.last().copied() else {
                break;
            };
            let Some(next) = self.get(current).successors.get(*position).copied() else {
                on_path.remove(&current);
                path.pop();
                cursor.pop();
                continue;
            };
            *position += 1;

            if next == root {
                collector.record(path.iter().map(|k| self.get(*k).id).collect());
            } else if allowed.contains(&next) && !on_path.contains(&next) {
                on_path.insert(next);
                path.push(next);
                cursor.push(0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let mut graph = TaskGraph::new();
        let a = graph.add_task(1);
        let b = graph.add_task(1);
        let c = graph.add_task(1);
        graph.add_dependency(a, b, 1).unwrap();
        graph.add_dependency(a, c, 1).unwrap();
        graph.add_dependency(b, c, 1).unwrap();

        let report = graph.detect_cycles();
        assert!(!report.has_cycles);
        assert!(!graph.has_cycles());
        assert!(report.cycles.is_empty());
        assert_eq!(report.describe(), "");
    }

    #[test]
    fn test_cycle_behind_a_source_is_found_once() {
        let mut graph = TaskGraph::new();
        let entry = graph.add_task(1);
        let a = graph.add_task(1);
        let b = graph.add_task(1);
        let exit = graph.add_task(1);
        graph.add_dependency(entry, a, 1).unwrap();
        graph.add_dependency(a, b, 1).unwrap();
        graph.add_dependency(b, a, 1).unwrap();
        graph.add_dependency(b, exit, 1).unwrap();

        let report = graph.detect_cycles();
        assert!(report.has_cycles);
        assert!(graph.has_cycles());
        assert_eq!(report.cycles, vec![vec![a, b]]);
    }

    #[test]
    fn test_isolated_cycle_next_to_boundary_tasks() {
        let mut graph = TaskGraph::new();
        let _lonely = graph.add_task(1);
        let a = graph.add_task(1);
        let b = graph.add_task(1);
        graph.add_dependency(a, b, 1).unwrap();
        graph.add_dependency(b, a, 1).unwrap();

        let report = graph.detect_cycles();
        assert!(report.has_cycles);
        assert_eq!(report.cycles, vec![vec![a, b]]);
    }

    #[test]
    fn test_cycles_sharing_an_explored_task_are_all_reported() {
        let mut graph = TaskGraph::new();
        for id in 1..=3 {
            graph.add_task_with_id(TaskId::new(id), 1).unwrap();
        }
        for (from, to) in [(2, 1), (3, 1), (3, 2), (1, 3)] {
            graph.add_dependency(TaskId::new(from), TaskId::new(to), 1).unwrap();
        }

        let report = graph.detect_cycles();
        let ids = |values: &[u32]| values.iter().copied().map(TaskId::new).collect::<Vec<_>>();
        assert_eq!(report.cycles, vec![ids(&[1, 3]), ids(&[1, 3, 2])]);
        assert_eq!(report.describe(), "Cycle #1: 1 3\nCycle #2: 1 3 2\n");
    }

    #[test]
    fn test_canonical_rotation() {
        let ids: Vec<TaskId> = [3, 1, 2].into_iter().map(TaskId::new).collect();
        assert_eq!(canonical(&ids), vec![TaskId::new(1), TaskId::new(2), TaskId::new(3)]);
    }
}
