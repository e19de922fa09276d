use std::collections::{BTreeMap, HashMap, HashSet};

use slotmap::{SlotMap, new_key_type};

use crate::domain::task_graph::dependency::Dependency;
use crate::domain::task_graph::task::Task;
use crate::domain::utils::id::{IdAllocator, TaskId, TaskTag};
use crate::error::{Error, Result};

new_key_type! {
    /// Internal arena key of a task.
    pub struct TaskKey;
}

/// Directed acyclic task graph (validated before scheduling).
///
/// Tasks live in a slot map arena; the `id_index` maps the user visible [`TaskId`]
/// to the arena key and also defines the canonical iteration order (ascending id).
/// Exactly one [`Dependency`] exists per ordered pair of tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    tasks: SlotMap<TaskKey, Task>,

    /// Index lookup InternalKey (TaskKey) using the user visible id (TaskId).
    id_index: BTreeMap<TaskId, TaskKey>,

    dependencies: HashMap<(TaskKey, TaskKey), Dependency>,

    allocator: IdAllocator<TaskTag>,

    /// Graph-wide maximum critical path time of the last successor-direction computation.
    pub(crate) critical_time: u64,

    /// Graph-wide maximum critical path task count of the last successor-direction computation.
    pub(crate) critical_task_count: usize,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Adds a task with the next free id.
    pub fn add_task(&mut self, cost: u64) -> TaskId {
        let id = self.allocator.allocate();
        let key = self.tasks.insert(Task::new(id, cost));
        self.id_index.insert(id, key);
        id
    }

    /// Adds a task with an id chosen by the caller (e.g. loaded from a scenario file).
    pub fn add_task_with_id(&mut self, id: TaskId, cost: u64) -> Result<TaskId> {
        if self.id_index.contains_key(&id) {
            return Err(Error::DuplicateTask(id));
        }
        self.allocator.observe(id);
        let key = self.tasks.insert(Task::new(id, cost));
        self.id_index.insert(id, key);
        Ok(id)
    }

    /// Removes a task together with all its incident dependencies.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task> {
        let key = self.key(id)?;
        self.id_index.remove(&id);

        let task = self.tasks.remove(key).ok_or(Error::UnknownTask(id))?;

        for pred in &task.predecessors {
            if let Some(pred_task) = self.tasks.get_mut(*pred) {
                pred_task.successors.retain(|k| *k != key);
            }
            self.dependencies.remove(&(*pred, key));
        }
        for succ in &task.successors {
            if let Some(succ_task) = self.tasks.get_mut(*succ) {
                succ_task.predecessors.retain(|k| *k != key);
            }
            self.dependencies.remove(&(key, *succ));
        }

        log::debug!("Removed task {} ({} incident dependencies).", id, task.predecessors.len() + task.successors.len());
        Ok(task)
    }

    pub fn set_cost(&mut self, id: TaskId, cost: u64) -> Result<()> {
        let key = self.key(id)?;
        self.tasks[key].cost = cost;
        Ok(())
    }

    /// Adds the precedence edge `from -> to`.
    ///
    /// If the ordered pair already exists only its weight is replaced.
    pub fn add_dependency(&mut self, from: TaskId, to: TaskId, weight: u64) -> Result<()> {
        if from == to {
            return Err(Error::SelfDependency(from));
        }
        let from_key = self.key(from)?;
        let to_key = self.key(to)?;

        if let Some(existing) = self.dependencies.get_mut(&(from_key, to_key)) {
            log::warn!("DuplicateDependency: {} -> {} already exists, replacing weight {} with {}.", from, to, existing.weight, weight);
            existing.weight = weight;
            return Ok(());
        }

        self.tasks[from_key].successors.push(to_key);
        self.tasks[to_key].predecessors.push(from_key);
        self.dependencies.insert((from_key, to_key), Dependency::new(from, to, weight));
        Ok(())
    }

    pub fn remove_dependency(&mut self, from: TaskId, to: TaskId) -> Result<Dependency> {
        let from_key = self.key(from)?;
        let to_key = self.key(to)?;

        let dependency = self.dependencies.remove(&(from_key, to_key)).ok_or(Error::UnknownDependency { from, to })?;
        self.tasks[from_key].successors.retain(|k| *k != to_key);
        self.tasks[to_key].predecessors.retain(|k| *k != from_key);
        Ok(dependency)
    }

    /// Looks up the edge between a specific ancestor and dependent task.
    pub fn dependency(&self, from: TaskId, to: TaskId) -> Option<&Dependency> {
        let from_key = self.id_index.get(&from)?;
        let to_key = self.id_index.get(&to)?;
        self.dependencies.get(&(*from_key, *to_key))
    }

    /// All dependencies, ordered by (source id, destination id).
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut dependencies: Vec<Dependency> = self.dependencies.values().copied().collect();
        dependencies.sort_by_key(|d| (d.from, d.to));
        dependencies
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.id_index.get(&id).map(|key| &self.tasks[*key])
    }

    /// Tasks in ascending id order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.id_index.values().map(move |key| &self.tasks[*key])
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.id_index.keys().copied().collect()
    }

    pub fn predecessors(&self, id: TaskId) -> Result<Vec<TaskId>> {
        let key = self.key(id)?;
        Ok(self.tasks[key].predecessors.iter().map(|k| self.tasks[*k].id).collect())
    }

    pub fn successors(&self, id: TaskId) -> Result<Vec<TaskId>> {
        let key = self.key(id)?;
        Ok(self.tasks[key].successors.iter().map(|k| self.tasks[*k].id).collect())
    }

    /// Sum of all execution costs, i.e. the schedule length on a single processor.
    pub fn single_processor_time(&self) -> u64 {
        self.tasks.values().map(|t| t.cost).sum()
    }

    /// Checks whether adding `from -> to` would close a cycle.
    pub fn would_create_cycle(&self, from: TaskId, to: TaskId) -> Result<bool> {
        if from == to {
            return Ok(true);
        }
        let from_key = self.key(from)?;
        let to_key = self.key(to)?;

        // `to` reaching `from` along successors means the new edge closes a loop.
        let mut visited: HashSet<TaskKey> = HashSet::new();
        let mut stack = vec![to_key];

        while let Some(current) = stack.pop() {
            if current == from_key {
                return Ok(true);
            }
            if visited.insert(current) {
                stack.extend(self.tasks[current].successors.iter().copied());
            }
        }
        Ok(false)
    }

    /// Clears the assignment fields of every task.
    pub fn reset_assignments(&mut self) {
        for task in self.tasks.values_mut() {
            task.assignment = None;
        }
    }

    pub(crate) fn key(&self, id: TaskId) -> Result<TaskKey> {
        self.id_index.get(&id).copied().ok_or(Error::UnknownTask(id))
    }

    pub(crate) fn keys(&self) -> Vec<TaskKey> {
        self.id_index.values().copied().collect()
    }

    pub(crate) fn get(&self, key: TaskKey) -> &Task {
        &self.tasks[key]
    }

    pub(crate) fn get_mut(&mut self, key: TaskKey) -> &mut Task {
        &mut self.tasks[key]
    }

    pub(crate) fn weight(&self, from: TaskKey, to: TaskKey) -> u64 {
        self.dependencies.get(&(from, to)).map(|d| d.weight).unwrap_or(0)
    }

    pub(crate) fn predecessors_assigned(&self, key: TaskKey) -> bool {
        self.tasks[key].predecessors.iter().all(|pred| self.tasks[*pred].is_assigned())
    }
}
