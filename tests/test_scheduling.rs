use tact_scheduler::domain::scheduler::assignment::Scheduler;
use tact_scheduler::domain::scheduler::metrics::compare_algorithms;
use tact_scheduler::domain::scheduler::report::{comparison_report, schedule_report};
use tact_scheduler::domain::scheduler::schedule::Schedule;
use tact_scheduler::domain::scheduler::scheduler_config::SchedulerConfig;
use tact_scheduler::domain::scheduler::scheduler_type::{PlacementAlgorithm, QueuePolicy};
use tact_scheduler::domain::scheduler::validation::ValidationStatus;
use tact_scheduler::domain::task_graph::graph::TaskGraph;
use tact_scheduler::domain::topology::topology::Topology;
use tact_scheduler::domain::utils::id::{NodeId, TaskId};
use tact_scheduler::error::Error;

fn t(value: u32) -> TaskId {
    TaskId::new(value)
}

fn n(value: u32) -> NodeId {
    NodeId::new(value)
}

fn graph_of(tasks: &[(u32, u64)], dependencies: &[(u32, u32, u64)]) -> TaskGraph {
    let mut graph = TaskGraph::new();
    for (id, cost) in tasks {
        graph.add_task_with_id(t(*id), *cost).unwrap();
    }
    for (from, to, weight) in dependencies {
        graph.add_dependency(t(*from), t(*to), *weight).unwrap();
    }
    graph
}

fn config(placement: PlacementAlgorithm) -> SchedulerConfig {
    SchedulerConfig { placement, queue_policy: QueuePolicy::CriticalPath, link_count: 1, duplex: false, horizon: None, seed: Some(42) }
}

/// A layered graph with fan out and fan in on a ring of four nodes.
fn layered_scenario() -> (TaskGraph, Topology) {
    let graph = graph_of(
        &[(1, 4), (2, 3), (3, 2), (4, 5), (5, 1), (6, 3), (7, 2), (8, 4)],
        &[(1, 3, 2), (1, 4, 1), (2, 4, 3), (2, 5, 2), (3, 6, 1), (4, 6, 2), (4, 7, 4), (5, 7, 1), (6, 8, 2), (7, 8, 3)],
    );

    let mut topology = Topology::new();
    for id in 0..4 {
        topology.add_node_with_id(n(id)).unwrap();
    }
    topology.connect(n(0), n(1)).unwrap();
    topology.connect(n(1), n(2)).unwrap();
    topology.connect(n(2), n(3)).unwrap();
    topology.connect(n(3), n(0)).unwrap();

    (graph, topology)
}

/// Properties every schedule has to satisfy, independent of the algorithm.
fn assert_valid_schedule(schedule: &Schedule, graph: &TaskGraph, topology: &Topology, duplex: bool) {
    assert_eq!(schedule.placements.len(), graph.len());

    for task in graph.tasks() {
        let placement = schedule.placement(task.id).expect("every task is placed");
        assert_eq!(placement.end - placement.start, task.cost, "task {} runs for its cost", task.id);
        assert_eq!(task.start_time(), Some(placement.start));
        assert_eq!(task.end_time(), Some(placement.end));
        assert_eq!(task.assigned_node(), Some(placement.node));
    }

    for node in topology.nodes() {
        let placements = schedule.node_placements(node.id);
        for pair in placements.windows(2) {
            assert!(pair[0].end <= pair[1].start, "tasks {} and {} overlap on node {}", pair[0].task, pair[1].task, node.id);
        }

        let scheduled: Vec<(u64, u64)> = node.scheduled.iter().map(|s| (s.start, s.end)).collect();
        let mut sorted = scheduled.clone();
        sorted.sort();
        assert_eq!(scheduled, sorted, "node {} keeps its tasks sorted by start", node.id);
    }

    for dependency in graph.dependencies() {
        let from = schedule.placement(dependency.from).unwrap();
        let to = schedule.placement(dependency.to).unwrap();
        assert!(from.end <= to.start, "{} must finish before {} starts", dependency.from, dependency.to);

        if from.node != to.node {
            let hops = schedule.transmissions_between(dependency.from, dependency.to);
            assert_eq!(hops.len(), topology.hop_count(from.node, to.node).unwrap());
            assert_eq!(hops[0].source_node, from.node);
            assert_eq!(hops[hops.len() - 1].dest_node, to.node);
            assert!(hops[0].start >= from.end);
            for pair in hops.windows(2) {
                assert_eq!(pair[0].dest_node, pair[1].source_node);
                assert!(pair[0].end <= pair[1].start);
            }
            for hop in &hops {
                assert_eq!(hop.duration(), dependency.weight);
            }
            assert!(schedule.arrival(dependency.from, dependency.to).unwrap() <= to.start);
        }
    }

    // Overlapping transfers never share a link end. Duplex links allow one sender and one receiver.
    for (i, a) in schedule.transmissions.iter().enumerate() {
        for b in schedule.transmissions.iter().skip(i + 1) {
            if a.duration() == 0 || b.duration() == 0 || !a.overlaps(b) {
                continue;
            }
            // (node, link, sending)
            let a_ends = [(a.source_node, a.source_link, true), (a.dest_node, a.dest_link, false)];
            let b_ends = [(b.source_node, b.source_link, true), (b.dest_node, b.dest_link, false)];
            for (node, link, sending) in a_ends {
                for (other_node, other_link, other_sending) in b_ends {
                    if (node, link) == (other_node, other_link) {
                        assert!(duplex && sending != other_sending, "transfers {:?} and {:?} share link {} of node {}", a, b, link, node);
                    }
                }
            }
        }
    }

    let max_end = schedule.placements.iter().map(|p| p.end).max().unwrap();
    assert_eq!(schedule.total_time, max_end);
    assert_eq!(topology.total_schedule_time(), max_end);
}

#[test]
fn test_single_node_chain() {
    let mut graph = graph_of(&[(1, 3), (2, 2), (3, 1)], &[(1, 2, 4), (2, 3, 4)]);
    let mut topology = Topology::fully_connected(1);

    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));
    let schedule = scheduler.schedule(&mut graph, &mut topology).unwrap();

    let intervals: Vec<(u64, u64)> = [1, 2, 3].iter().map(|id| schedule.placement(t(*id)).map(|p| (p.start, p.end)).unwrap()).collect();
    assert_eq!(intervals, vec![(0, 3), (3, 5), (5, 6)]);
    assert!(schedule.transmissions.is_empty());
    assert_eq!(schedule.total_time, 6);
    assert_valid_schedule(&schedule, &graph, &topology, false);
}

#[test]
fn test_two_nodes_with_a_transfer() {
    let mut graph = graph_of(&[(1, 5), (2, 3), (3, 5)], &[(1, 2, 2), (3, 2, 2)]);
    let mut topology = Topology::fully_connected(2);

    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));
    let schedule = scheduler.schedule_queue(&mut graph, &mut topology, &[t(1), t(3), t(2)]).unwrap();

    // Sources take the idle nodes, the last one in node order first.
    assert_eq!(schedule.placement(t(1)).unwrap().node, n(1));
    assert_eq!(schedule.placement(t(3)).unwrap().node, n(0));

    let joined = schedule.placement(t(2)).unwrap();
    assert_eq!((joined.node, joined.start, joined.end), (n(0), 7, 10));

    assert_eq!(schedule.transmissions.len(), 1);
    let transfer = schedule.transmissions[0];
    assert_eq!((transfer.source_task, transfer.dest_task), (t(1), t(2)));
    assert_eq!((transfer.source_node, transfer.dest_node), (n(1), n(0)));
    assert_eq!((transfer.start, transfer.end), (5, 7));
    assert_eq!(schedule.total_time, 10);
    assert_valid_schedule(&schedule, &graph, &topology, false);
}

/// Two transfers cross between two nodes at the same time: simplex links serialize them.
fn crossing_scenario() -> (TaskGraph, Topology) {
    let graph = graph_of(&[(1, 5), (2, 5), (3, 2), (4, 2)], &[(1, 3, 1), (2, 3, 4), (1, 4, 4), (2, 4, 1)]);
    (graph, Topology::fully_connected(2))
}

#[test]
fn test_simplex_links_serialize_opposite_transfers() {
    let (mut graph, mut topology) = crossing_scenario();
    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));
    let schedule = scheduler.schedule_queue(&mut graph, &mut topology, &[t(1), t(2), t(3), t(4)]).unwrap();

    assert_eq!(schedule.arrival(t(1), t(3)), Some(6));
    assert_eq!(schedule.arrival(t(2), t(4)), Some(7));
    assert_eq!(schedule.placement(t(4)).map(|p| (p.node, p.start)), Some((n(1), 7)));
    assert_eq!(schedule.total_time, 9);
    assert_valid_schedule(&schedule, &graph, &topology, false);
}

#[test]
fn test_duplex_links_carry_opposite_transfers_together() {
    let (mut graph, mut topology) = crossing_scenario();
    let mut scheduler = Scheduler::new(SchedulerConfig { duplex: true, ..config(PlacementAlgorithm::Greedy) });
    let schedule = scheduler.schedule_queue(&mut graph, &mut topology, &[t(1), t(2), t(3), t(4)]).unwrap();

    assert_eq!(schedule.arrival(t(1), t(3)), Some(6));
    assert_eq!(schedule.arrival(t(2), t(4)), Some(6));
    assert_eq!(schedule.placement(t(4)).map(|p| (p.node, p.start)), Some((n(1), 6)));
    assert_eq!(schedule.total_time, 8);
    assert_valid_schedule(&schedule, &graph, &topology, true);
}

#[test]
fn test_every_algorithm_produces_a_valid_schedule() {
    for placement in PlacementAlgorithm::ALL {
        for queue_policy in QueuePolicy::ALL {
            for link_count in [1, 2] {
                for duplex in [false, true] {
                    let (mut graph, mut topology) = layered_scenario();
                    let mut scheduler = Scheduler::new(SchedulerConfig { queue_policy, link_count, duplex, ..config(placement) });
                    let schedule = scheduler.schedule(&mut graph, &mut topology).unwrap();
                    assert_valid_schedule(&schedule, &graph, &topology, duplex);
                }
            }
        }
    }
}

#[test]
fn test_seeded_random_runs_are_reproducible() {
    let (mut graph, mut topology) = layered_scenario();

    let first = Scheduler::new(config(PlacementAlgorithm::Random)).schedule(&mut graph, &mut topology).unwrap();
    let second = Scheduler::new(config(PlacementAlgorithm::Random)).schedule(&mut graph, &mut topology).unwrap();

    assert_eq!(first.placements, second.placements);
    assert_eq!(first.transmissions, second.transmissions);
}

#[test]
fn test_repeated_runs_start_from_a_clean_state() {
    let (mut graph, mut topology) = layered_scenario();
    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));

    let first = scheduler.schedule(&mut graph, &mut topology).unwrap();
    let second = scheduler.schedule(&mut graph, &mut topology).unwrap();

    assert_eq!(first.placements, second.placements);
    assert_eq!(first.total_time, second.total_time);
    let scheduled: usize = topology.nodes().map(|node| node.scheduled.len()).sum();
    assert_eq!(scheduled, graph.len());
    assert_eq!(topology.transmissions().len(), second.transmissions.len());
}

#[test]
fn test_horizon_is_enforced() {
    let mut graph = graph_of(&[(1, 3), (2, 4)], &[(1, 2, 1)]);
    let mut topology = Topology::fully_connected(1);
    let mut scheduler = Scheduler::new(SchedulerConfig { horizon: Some(5), ..config(PlacementAlgorithm::Greedy) });

    let result = scheduler.schedule(&mut graph, &mut topology);
    assert!(matches!(result, Err(Error::HorizonExceeded { horizon: 5, requested: 7 })));
}

#[test]
fn test_preconditions_are_checked_before_scheduling() {
    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));

    let mut empty = TaskGraph::new();
    let result = scheduler.schedule(&mut empty, &mut Topology::fully_connected(2));
    assert!(matches!(result, Err(Error::Validation(ValidationStatus::EmptyTaskGraph))));

    let mut cyclic = graph_of(&[(1, 1), (2, 1)], &[(1, 2, 1), (2, 1, 1)]);
    let result = scheduler.schedule(&mut cyclic, &mut Topology::fully_connected(2));
    assert!(matches!(result, Err(Error::Validation(ValidationStatus::CyclicTaskGraph))));

    let mut graph = graph_of(&[(1, 1)], &[]);
    let result = scheduler.schedule(&mut graph, &mut Topology::new());
    assert!(matches!(result, Err(Error::Validation(ValidationStatus::EmptyTopology))));

    let mut disconnected = Topology::new();
    disconnected.add_node();
    disconnected.add_node();
    let result = scheduler.schedule(&mut graph, &mut disconnected);
    assert!(matches!(result, Err(Error::Validation(ValidationStatus::DisconnectedTopology))));
    assert!(!graph.task(t(1)).unwrap().is_assigned());
}

#[test]
fn test_queue_that_is_not_a_permutation_is_rejected() {
    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));

    let mut single = graph_of(&[(1, 3)], &[]);
    let mut topology = Topology::fully_connected(2);
    let result = scheduler.schedule_queue(&mut single, &mut topology, &[t(1), t(1)]);
    assert!(matches!(result, Err(Error::QueueLength { expected: 1, actual: 2 })));

    let mut pair = graph_of(&[(1, 3), (2, 2)], &[]);
    let result = scheduler.schedule_queue(&mut pair, &mut topology, &[t(1)]);
    assert!(matches!(result, Err(Error::QueueLength { expected: 2, actual: 1 })));

    let result = scheduler.schedule_queue(&mut pair, &mut topology, &[t(2), t(2)]);
    assert!(matches!(result, Err(Error::DuplicateQueueEntry(id)) if id == t(2)));

    assert!(pair.tasks().all(|task| !task.is_assigned()));
    assert!(topology.nodes().all(|node| node.scheduled.is_empty()));
}

#[test]
fn test_zero_links_are_rejected() {
    let mut graph = graph_of(&[(1, 1)], &[]);
    let mut topology = Topology::fully_connected(1);
    let mut scheduler = Scheduler::new(SchedulerConfig { link_count: 0, ..config(PlacementAlgorithm::Greedy) });

    assert!(scheduler.schedule(&mut graph, &mut topology).is_err());
}

#[test]
fn test_reports_of_a_run() {
    let mut graph = graph_of(&[(1, 5), (2, 3), (3, 5)], &[(1, 2, 2), (3, 2, 2)]);
    let mut topology = Topology::fully_connected(2);

    let mut scheduler = Scheduler::new(config(PlacementAlgorithm::Greedy));
    let schedule = scheduler.schedule_queue(&mut graph, &mut topology, &[t(1), t(3), t(2)]).unwrap();
    let report = schedule_report(&schedule, &topology);

    assert!(report.contains("Node 0 (priority 1):\n  G3 [0, 5)\n  G2 [7, 10)\n"));
    assert!(report.contains("  Link 0: G1 -> G2 to node 0 [5, 7)\n"));
    assert!(report.contains("  Link 0: G1 -> G2 from node 1 [5, 7)\n"));

    let results = compare_algorithms(&mut graph, &mut topology, &config(PlacementAlgorithm::Greedy)).unwrap();
    assert_eq!(results.len(), 6);
    let table = comparison_report(&results);
    assert_eq!(table.lines().count(), 7);
    for metrics in &results {
        assert_eq!(metrics.single_processor_time, 13);
        assert!((metrics.speedup - 13.0 / metrics.total_time as f64).abs() < 1e-9);
    }
}
