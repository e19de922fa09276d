use std::collections::HashMap;

use crate::domain::task_graph::graph::{TaskGraph, TaskKey};
use crate::domain::task_graph::task::CriticalPath;
use crate::domain::utils::id::TaskId;
use crate::error::Result;

/// Adjacency followed when building routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDirection {
    Successors,
    Predecessors,
}

impl TaskGraph {
    fn neighbors(&self, key: TaskKey, direction: WalkDirection) -> &[TaskKey] {
        match direction {
            WalkDirection::Successors => &self.get(key).successors,
            WalkDirection::Predecessors => &self.get(key).predecessors,
        }
    }

    /// Longest route values for every task, the task itself included.
    ///
    /// The longest route starting at a task does not depend on how the task was reached, so every
    /// task is evaluated once in post order using an explicit stack.
    /// Requires an acyclic graph; a cycle is cut where the walk re-enters a task under evaluation.
    fn longest_routes(&self, direction: WalkDirection) -> HashMap<TaskKey, CriticalPath> {
        let mut memo: HashMap<TaskKey, CriticalPath> = HashMap::new();

        for root in self.keys() {
            if memo.contains_key(&root) {
                continue;
            }

            // (task, children already pushed)
            let mut stack: Vec<(TaskKey, bool)> = vec![(root, false)];
            let mut in_progress: Vec<TaskKey> = Vec::new();

            while let Some((key, expanded)) = stack.pop() {
                if memo.contains_key(&key) {
                    continue;
                }

                if !expanded {
                    if in_progress.contains(&key) {
                        continue;
                    }
                    in_progress.push(key);
                    stack.push((key, true));
                    for next in self.neighbors(key, direction) {
                        if !memo.contains_key(next) {
                            stack.push((*next, false));
                        }
                    }
                    continue;
                }

                let mut best = CriticalPath::default();
                for next in self.neighbors(key, direction) {
                    if let Some(route) = memo.get(next) {
                        best.time = best.time.max(route.time);
                        best.task_count = best.task_count.max(route.task_count);
                    }
                }

                let task = self.get(key);
                memo.insert(key, CriticalPath { time: best.time + task.cost, task_count: best.task_count + 1 });
                in_progress.retain(|k| *k != key);
            }
        }
        memo
    }

    /// Computes the successor-direction critical path of every task and stores it on the task,
    /// together with the graph-wide maxima.
    ///
    /// # Returns
    /// The graph-wide maximum critical path time and task count.
    pub fn compute_critical_paths(&mut self) -> CriticalPath {
        let routes = self.longest_routes(WalkDirection::Successors);
        let mut graph_max = CriticalPath::default();

        for (key, route) in routes {
            graph_max.time = graph_max.time.max(route.time);
            graph_max.task_count = graph_max.task_count.max(route.task_count);
            self.get_mut(key).critical_path = route;
        }

        self.critical_time = graph_max.time;
        self.critical_task_count = graph_max.task_count;
        graph_max
    }

    /// Computes the reverse critical path of every task: the longest route through its ancestors,
    /// the task itself excluded. Tasks without predecessors score zero.
    pub fn compute_reverse_critical_paths(&mut self) {
        let routes = self.longest_routes(WalkDirection::Predecessors);

        for key in self.keys() {
            let mut reverse = CriticalPath::default();
            for pred in self.neighbors(key, WalkDirection::Predecessors) {
                if let Some(route) = routes.get(pred) {
                    reverse.time = reverse.time.max(route.time);
                    reverse.task_count = reverse.task_count.max(route.task_count);
                }
            }
            self.get_mut(key).critical_path = reverse;
        }
    }

    /// Graph-wide maximum successor-direction critical path time, without touching task fields.
    pub fn critical_time(&self) -> u64 {
        self.longest_routes(WalkDirection::Successors).values().map(|r| r.time).max().unwrap_or(0)
    }

    /// Graph-wide values stored by the last [`TaskGraph::compute_critical_paths`].
    pub fn graph_critical_path(&self) -> CriticalPath {
        CriticalPath { time: self.critical_time, task_count: self.critical_task_count }
    }

    /// Enumerates every maximal route that starts at `id` and follows `direction` until a task
    /// without further neighbors is reached.
    ///
    /// The number of routes can grow exponentially with the graph size; this is meant for
    /// inspection of small graphs. The graph must be acyclic.
    pub fn routes(&self, id: TaskId, direction: WalkDirection) -> Result<Vec<Vec<TaskId>>> {
        let start = self.key(id)?;
        let mut routes = Vec::new();

        // The current route and, per route position, the index of the next neighbor to try.
        let mut route: Vec<TaskKey> = vec![start];
        let mut cursor: Vec<usize> = vec![0];

        while let Some(position) = cursor.last_mut() {
            let Some(current) = route.last().copied() else {
                break;
            };
            let neighbors = self.neighbors(current, direction);

            if neighbors.is_empty() && *position == 0 {
                routes.push(route.iter().map(|k| self.get(*k).id).collect());
                *position = 1;
            }

            match neighbors.get(*position).copied() {
                Some(next) => {
                    *position += 1;
                    route.push(next);
                    cursor.push(0);
                }
                _ => {
                    route.pop();
                    cursor.pop();
                }
            }
        }
        Ok(routes)
    }
}
