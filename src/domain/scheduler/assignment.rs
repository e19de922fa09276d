use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::domain::schedule::data_transmission::DataTransmission;
use crate::domain::schedule::time_ledger::{Direction, TransferOwner};
use crate::domain::scheduler::contention;
use crate::domain::scheduler::placement;
use crate::domain::scheduler::schedule::{Schedule, TaskPlacement};
use crate::domain::scheduler::scheduler_config::SchedulerConfig;
use crate::domain::scheduler::scheduler_type::PlacementAlgorithm;
use crate::domain::scheduler::validation;
use crate::domain::task_graph::graph::{TaskGraph, TaskKey};
use crate::domain::task_graph::task::Assignment;
use crate::domain::topology::compute_node::ScheduledTask;
use crate::domain::topology::topology::{NodeKey, Topology};
use crate::domain::utils::id::TaskId;
use crate::error::{Error, Result};

/// The assignment engine.
///
/// Binds every task of a task graph to a compute node and time interval and routes the data of
/// every dependency across the physical links of the topology.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validates the inputs, generates the queue of the configured policy and schedules it.
    ///
    /// # Returns
    /// `Error::Validation` with the failing status if a precondition does not hold; nothing is
    /// scheduled in that case.
    pub fn schedule(&mut self, graph: &mut TaskGraph, topology: &mut Topology) -> Result<Schedule> {
        let status = validation::validate(graph, topology);
        if !status.is_ok() {
            log::error!("ValidationFailed: {}", status);
            return Err(Error::Validation(status));
        }

        let queue = graph.generate_queue(self.config.queue_policy);
        self.schedule_queue(graph, topology, &queue)
    }

    /// Schedules a given queue, which must be a permutation of all tasks.
    ///
    /// All scheduling state of the graph and the topology is reset first, so runs can be repeated
    /// with different parameters on the same objects.
    pub fn schedule_queue(&mut self, graph: &mut TaskGraph, topology: &mut Topology, queue: &[TaskId]) -> Result<Schedule> {
        self.config.validate()?;
        check_queue(graph, queue)?;
        topology.reset_for_run(self.config.link_count, self.config.duplex, self.config.horizon)?;
        graph.reset_assignments();

        let mut pending: Vec<TaskKey> = queue.iter().map(|id| graph.key(*id)).collect::<Result<_>>()?;
        let order: Vec<NodeKey> = topology.nodes_by_priority().iter().map(|id| topology.key(*id)).collect::<Result<_>>()?;

        log::info!(
            "Scheduling {} tasks on {} compute nodes ({}, {} link(s), {}).",
            pending.len(),
            order.len(),
            self.config.algorithm(),
            self.config.link_count,
            if self.config.duplex { "duplex" } else { "simplex" }
        );

        let mut run = Run { config: self.config, rng: &mut self.rng, graph, topology, order, placements: Vec::new(), transmissions: Vec::new() };

        while !pending.is_empty() {
            let position = pending.iter().position(|key| run.graph.predecessors_assigned(*key)).ok_or(Error::StalledQueue(pending.len()))?;
            let key = pending.remove(position);

            if run.graph.get(key).is_source() {
                run.assign_independent(key)?;
            } else {
                run.assign_dependent(key)?;
            }
        }

        let total_time = run.topology.total_schedule_time();
        log::info!("Schedule finished: total time {} tacts, {} transmissions.", total_time, run.transmissions.len());

        Ok(Schedule {
            algorithm: self.config.algorithm(),
            queue: queue.to_vec(),
            placements: run.placements,
            transmissions: run.transmissions,
            total_time,
        })
    }
}

/// A queue must name every task of the graph exactly once.
fn check_queue(graph: &TaskGraph, queue: &[TaskId]) -> Result<()> {
    if queue.len() != graph.len() {
        log::error!("InvalidQueue: {} entries for {} tasks.", queue.len(), graph.len());
        return Err(Error::QueueLength { expected: graph.len(), actual: queue.len() });
    }

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(queue.len());
    for id in queue {
        graph.key(*id)?;
        if !seen.insert(*id) {
            log::error!("InvalidQueue: task {} is queued twice.", id);
            return Err(Error::DuplicateQueueEntry(*id));
        }
    }
    Ok(())
}

/// State of one scheduling run.
struct Run<'a> {
    config: SchedulerConfig,
    rng: &'a mut StdRng,
    graph: &'a mut TaskGraph,
    topology: &'a mut Topology,

    /// Node order for placement decisions.
    order: Vec<NodeKey>,

    placements: Vec<TaskPlacement>,
    transmissions: Vec<DataTransmission>,
}

impl Run<'_> {
    fn assign_independent(&mut self, task: TaskKey) -> Result<()> {
        let choice = match self.config.placement {
            PlacementAlgorithm::Random => placement::place_source_random(self.rng, self.topology, &self.order)?,
            PlacementAlgorithm::Greedy => placement::place_source_greedy(self.topology, &self.order)?,
        };
        self.commit_task(task, choice.node, choice.start)
    }

    fn assign_dependent(&mut self, task: TaskKey) -> Result<()> {
        let target = match self.config.placement {
            PlacementAlgorithm::Random => placement::random_node(self.rng, &self.order)?,
            PlacementAlgorithm::Greedy => placement::select_best_node(self.graph, self.topology, &self.order, task, self.config.link_count)?,
        };
        self.route_and_commit(task, target)
    }

    /// Routes the input data of `task` to `target`, then places the task at the earliest tact at
    /// which all inputs arrived and the processor is free.
    fn route_and_commit(&mut self, task: TaskKey, target: NodeKey) -> Result<()> {
        let arrival = self.route_data(task, target)?;
        let cost = self.graph.get(task).cost;
        let start = self.topology.get(target).ledger.earliest_processor_slot(arrival, cost);
        self.commit_task(task, target, start)
    }

    /// Schedules the hop transmissions of every input of `task`.
    ///
    /// # Returns
    /// The latest arrival over all inputs.
    fn route_data(&mut self, task: TaskKey, target: NodeKey) -> Result<u64> {
        let dest_task = self.graph.get(task).id;
        let predecessors = self.graph.get(task).predecessors.clone();
        let mut arrival = 0;

        for pred in predecessors {
            let pred_task = self.graph.get(pred);
            let source_task = pred_task.id;
            let assignment = pred_task.assignment.ok_or(Error::UnassignedPredecessor(source_task))?;
            let weight = self.graph.weight(pred, task);

            let path = self.topology.shortest_path_keys(self.topology.key(assignment.node)?, target)?;

            let mut ready = assignment.end;
            for hop in path.windows(2) {
                ready = self.send_hop(hop[0], hop[1], ready, weight, source_task, dest_task)?;
            }
            arrival = arrival.max(ready);
        }
        Ok(arrival)
    }

    /// Books one hop on a link pair found by the contention resolver.
    ///
    /// # Returns
    /// The end of the transmission.
    fn send_hop(&mut self, from: NodeKey, to: NodeKey, ready: u64, weight: u64, source_task: TaskId, dest_task: TaskId) -> Result<u64> {
        let slot = contention::resolve(&self.topology.get(from).ledger, &self.topology.get(to).ledger, ready, weight)?;

        let transmission = DataTransmission {
            source_task,
            dest_task,
            source_node: self.topology.get(from).id,
            dest_node: self.topology.get(to).id,
            start: slot.start,
            end: slot.start + weight,
            source_link: slot.source_link,
            dest_link: slot.dest_link,
        };
        let owner = TransferOwner { source_task, dest_task };

        let sender = self.topology.get_mut(from);
        sender.ledger.book_link(slot.source_link, Direction::Outbound, slot.start, weight, owner)?;
        if let Some(link) = sender.links.get_mut(slot.source_link) {
            link.transmissions.push(transmission);
        }

        let receiver = self.topology.get_mut(to);
        receiver.ledger.book_link(slot.dest_link, Direction::Inbound, slot.start, weight, owner)?;
        if let Some(link) = receiver.links.get_mut(slot.dest_link) {
            link.transmissions.push(transmission);
        }

        log::debug!(
            "Transmission {} -> {}: node {} (link {}) -> node {} (link {}) [{}, {})",
            source_task,
            dest_task,
            transmission.source_node,
            slot.source_link,
            transmission.dest_node,
            slot.dest_link,
            transmission.start,
            transmission.end
        );

        self.transmissions.push(transmission);
        Ok(transmission.end)
    }

    fn commit_task(&mut self, task: TaskKey, node: NodeKey, start: u64) -> Result<()> {
        let task_id = self.graph.get(task).id;
        let end = start + self.graph.get(task).cost;

        let compute_node = self.topology.get_mut(node);
        compute_node.ledger.book_processor(task_id, start, end - start)?;
        compute_node.insert_scheduled(ScheduledTask { task: task_id, start, end });
        let node_id = compute_node.id;

        self.graph.get_mut(task).assignment = Some(Assignment { node: node_id, start, end });
        self.placements.push(TaskPlacement { task: task_id, node: node_id, start, end });

        log::debug!("Task {} assigned to node {} [{}, {})", task_id, node_id, start, end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduler::scheduler_type::QueuePolicy;
    use crate::domain::utils::id::NodeId;

    fn greedy_config() -> SchedulerConfig {
        SchedulerConfig { placement: PlacementAlgorithm::Greedy, queue_policy: QueuePolicy::CriticalPath, ..SchedulerConfig::default() }
    }

    #[test]
    fn test_transmission_delays_a_task_on_another_node() {
        let mut graph = TaskGraph::new();
        let first = graph.add_task(5);
        let second = graph.add_task(3);
        graph.add_dependency(first, second, 2).unwrap();
        let mut topology = Topology::fully_connected(2);
        topology.reset_for_run(1, false, Some(5000)).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let order = vec![topology.key(NodeId::new(0)).unwrap(), topology.key(NodeId::new(1)).unwrap()];
        let mut run = Run { config: greedy_config(), rng: &mut rng, graph: &mut graph, topology: &mut topology, order: order.clone(), placements: Vec::new(), transmissions: Vec::new() };

        let first_key = run.graph.key(first).unwrap();
        let second_key = run.graph.key(second).unwrap();
        run.commit_task(first_key, order[0], 0).unwrap();
        run.route_and_commit(second_key, order[1]).unwrap();

        assert_eq!(run.transmissions.len(), 1);
        let transmission = run.transmissions[0];
        assert_eq!((transmission.start, transmission.end), (5, 7));
        assert_eq!((transmission.source_node, transmission.dest_node), (NodeId::new(0), NodeId::new(1)));
        assert_eq!(run.placements[1], TaskPlacement { task: second, node: NodeId::new(1), start: 7, end: 10 });

        // Both endpoints record the hop on the chosen link.
        assert_eq!(run.topology.get(order[0]).links[0].transmissions.len(), 1);
        assert_eq!(run.topology.get(order[1]).links[0].transmissions.len(), 1);
        assert_eq!(run.topology.get(order[1]).ledger.tact(6).links[0].direction(), Some(Direction::Inbound));
    }

    #[test]
    fn test_dependent_task_waits_for_busy_processor() {
        let mut graph = TaskGraph::new();
        let a = graph.add_task(2);
        let b = graph.add_task(4);
        let c = graph.add_task(1);
        graph.add_dependency(a, c, 0).unwrap();
        let mut topology = Topology::fully_connected(1);
        topology.reset_for_run(1, false, None).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let order = vec![topology.key(NodeId::new(0)).unwrap()];
        let mut run = Run { config: greedy_config(), rng: &mut rng, graph: &mut graph, topology: &mut topology, order: order.clone(), placements: Vec::new(), transmissions: Vec::new() };

        let (a_key, b_key, c_key) = (run.graph.key(a).unwrap(), run.graph.key(b).unwrap(), run.graph.key(c).unwrap());
        run.commit_task(a_key, order[0], 0).unwrap();
        run.commit_task(b_key, order[0], 2).unwrap();
        run.route_and_commit(c_key, order[0]).unwrap();

        assert_eq!(run.graph.get(c_key).assignment, Some(Assignment { node: NodeId::new(0), start: 6, end: 7 }));
        assert!(run.transmissions.is_empty());
    }

    #[test]
    fn test_stalled_queue_is_reported() {
        // Only a cyclic graph, which bypasses validation here, can stall a complete queue.
        let mut graph = TaskGraph::new();
        let a = graph.add_task(1);
        let b = graph.add_task(1);
        graph.add_dependency(a, b, 1).unwrap();
        graph.add_dependency(b, a, 1).unwrap();
        let mut topology = Topology::fully_connected(1);

        let mut scheduler = Scheduler::new(greedy_config());
        let result = scheduler.schedule_queue(&mut graph, &mut topology, &[a, b]);
        assert!(matches!(result, Err(Error::StalledQueue(2))));
    }

    #[test]
    fn test_queue_must_name_every_task_once() {
        let mut graph = TaskGraph::new();
        let a = graph.add_task(1);
        let b = graph.add_task(1);
        let mut topology = Topology::fully_connected(1);
        let mut scheduler = Scheduler::new(greedy_config());

        let short = scheduler.schedule_queue(&mut graph, &mut topology, &[a]);
        assert!(matches!(short, Err(Error::QueueLength { expected: 2, actual: 1 })));

        let repeated = scheduler.schedule_queue(&mut graph, &mut topology, &[b, b]);
        assert!(matches!(repeated, Err(Error::DuplicateQueueEntry(id)) if id == b));

        let unknown = scheduler.schedule_queue(&mut graph, &mut topology, &[a, TaskId::new(9)]);
        assert!(matches!(unknown, Err(Error::UnknownTask(_))));
    }
}
